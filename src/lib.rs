//! # jsonfold
//!
//! Reentrant semantic actions that fold grammar matches into a JSON value
//! tree.
//!
//! The crate is layered leaf-first:
//!
//! - [`node`]: the [`Node`] value tree, independent of parsing
//! - [`actions`]: the reentrant action framework, one slot stack per rule
//! - [`grammar`]: a declarative backtracking grammar engine over token streams
//! - [`json`]: JSON tokens, grammar, actions and the [`JsonParser`] driver
//! - [`writer`]: JSON text output through serde_json
//! - [`config`]: layered TOML configuration
//!
//! ```text
//! let node = jsonfold::parse_text(r#"{"a": 1, "b": [true, false, null]}"#)?;
//! assert_eq!(node.key_at(0)?, Some("a"));
//! println!("{}", node.to_string_compacted()?);
//! ```
//!
//! ## Testing
//!
//! Tree assertions go through the fluent helpers in [`testing`].

pub mod actions;
pub mod config;
pub mod grammar;
pub mod json;
pub mod location;
pub mod node;
pub mod testing;
pub mod writer;

pub use json::{parse_text, JsonParser, ParseError};
pub use node::{Kind, Node, NodeError, Value};
