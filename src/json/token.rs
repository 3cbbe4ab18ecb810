//! JSON tokens
//!
//! Tokens are produced by a vanilla logos lexer. Insignificant whitespace is
//! skipped; every other byte of the input must belong to a token.

use logos::Logos;

use crate::grammar::{Lexeme, Terminal};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum JsonToken {
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    #[token("true")]
    #[token("false")]
    Boolean,

    #[token("null")]
    Null,

    // Only the escapes JSON defines; raw control characters are not allowed
    #[regex(r#""([^"\\\x00-\x1F]|\\(["\\/bfnrt]|u[0-9a-fA-F]{4}))*""#)]
    String,

    #[regex(r"-?(0|[1-9][0-9]*)\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"-?(0|[1-9][0-9]*)[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"-?(0|[1-9][0-9]*)")]
    Int,

    // Bare identifier, accepted as an object key
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    SimpleString,
}

impl Terminal for JsonToken {
    fn name(&self) -> Option<&'static str> {
        match self {
            JsonToken::Boolean => Some("Boolean"),
            JsonToken::Null => Some("Null"),
            JsonToken::String => Some("String"),
            JsonToken::Float => Some("Float"),
            JsonToken::Int => Some("Int"),
            JsonToken::SimpleString => Some("SimpleString"),
            _ => None,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            JsonToken::OpenBrace => "'{'",
            JsonToken::CloseBrace => "'}'",
            JsonToken::OpenBracket => "'['",
            JsonToken::CloseBracket => "']'",
            JsonToken::Colon => "':'",
            JsonToken::Comma => "','",
            JsonToken::Boolean => "boolean",
            JsonToken::Null => "null",
            JsonToken::String => "string",
            JsonToken::Float => "float",
            JsonToken::Int => "integer",
            JsonToken::SimpleString => "identifier",
        }
    }
}

/// Input no token matches
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized input {text:?} at byte {offset}")]
pub struct LexError {
    pub offset: usize,
    pub text: String,
}

/// Decode a `String` token's text into the characters it stands for.
///
/// Quotes are dropped and every escape sequence is resolved, including
/// `\uXXXX` surrogate pairs. A lone surrogate is the only way a lexed
/// string can still fail here.
pub fn decode_string(literal: &str) -> Result<String, serde_json::Error> {
    serde_json::from_str(literal)
}

/// Tokenize `source`, keeping each token's byte range.
pub fn lex(source: &str) -> Result<Vec<Lexeme<JsonToken>>, LexError> {
    let mut lexer = JsonToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(Lexeme::new(token, lexer.span())),
            Err(()) => {
                return Err(LexError {
                    offset: lexer.span().start,
                    text: lexer.slice().to_string(),
                })
            }
        }
    }

    Ok(tokens)
}
