//! JSON front end
//!
//! - [`token`]: logos tokenizer
//! - [`grammar`]: rule table for the grammar engine
//! - [`actions`]: the four actions folding matches into [`crate::node::Node`]s
//! - [`parser`]: [`JsonParser`] and [`parse_text`]

pub mod actions;
pub mod grammar;
pub mod parser;
pub mod token;

pub use actions::Fragment;
pub use parser::{parse_text, JsonParser, ParseError};
pub use token::JsonToken;
