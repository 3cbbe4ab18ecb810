//! Parse driver
//!
//! Ties the three stages together: logos tokens, grammar matching from the
//! entry rule, and replay through the JSON actions. A [`JsonParser`] keeps
//! its action slot stacks between documents, so parsing many documents with
//! one parser allocates slots only for nesting deeper than any seen before.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::actions::{ActionError, ActionSet, ConfigurationError};
use crate::config::ParserConfig;
use crate::grammar::{Grammar, MatchError};
use crate::location::{Position, SourceLocation};
use crate::node::Node;

use super::actions::{install, Fragment};
use super::grammar::json_grammar;
use super::token::{lex, JsonToken};

/// Why a document could not be turned into a tree
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {}, column {}: unrecognized input {text:?}", .position.line + 1, .position.column + 1)]
    Lex { position: Position, text: String },

    #[error("line {}, column {}: expected {expected} but found {found}", .position.line + 1, .position.column + 1)]
    Syntax {
        position: Position,
        expected: String,
        found: String,
    },

    #[error("line {}, column {}: nesting deeper than {limit} rules", .position.line + 1, .position.column + 1)]
    TooDeep { position: Position, limit: usize },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Config(#[from] ConfigurationError),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Where in the source the error points, for errors tied to a position
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Lex { position, .. }
            | ParseError::Syntax { position, .. }
            | ParseError::TooDeep { position, .. } => Some(*position),
            _ => None,
        }
    }

    fn from_match(err: MatchError, source: &str) -> Self {
        let locate = |offset| SourceLocation::new(source).byte_to_position(offset);
        match err {
            MatchError::Syntax {
                offset,
                expected,
                found,
            } => ParseError::Syntax {
                position: locate(offset),
                expected: expected.join(" or "),
                found,
            },
            MatchError::TooDeep { offset, limit } => ParseError::TooDeep {
                position: locate(offset),
                limit,
            },
            MatchError::UnknownRule(rule) => ConfigurationError::UnknownEntryRule(rule).into(),
        }
    }
}

/// Reusable JSON parser
pub struct JsonParser {
    grammar: Grammar<JsonToken>,
    actions: ActionSet<Fragment>,
    entry: String,
}

impl JsonParser {
    /// Parser with the default configuration: whole documents must be Objects.
    pub fn new() -> Result<Self, ConfigurationError> {
        Self::with_config(&ParserConfig::default())
    }

    pub fn with_config(config: &ParserConfig) -> Result<Self, ConfigurationError> {
        let grammar = json_grammar(config.unquoted_keys).with_max_depth(config.max_depth);
        grammar.validate()?;

        let mut actions = ActionSet::new();
        install(&mut actions)?;

        if let Some(rule) = actions.rules().find(|rule| !grammar.has_rule(rule)) {
            return Err(ConfigurationError::UnknownRule(rule.to_string()));
        }
        if !grammar.has_rule(&config.entry_rule) {
            return Err(ConfigurationError::UnknownEntryRule(config.entry_rule.clone()));
        }
        if !actions.contains(&config.entry_rule) {
            return Err(ConfigurationError::EntryWithoutAction(config.entry_rule.clone()));
        }

        debug!(
            entry = %config.entry_rule,
            max_depth = config.max_depth,
            unquoted_keys = config.unquoted_keys,
            "json parser ready"
        );

        Ok(Self {
            grammar,
            actions,
            entry: config.entry_rule.clone(),
        })
    }

    pub fn entry_rule(&self) -> &str {
        &self.entry
    }

    pub fn grammar(&self) -> &Grammar<JsonToken> {
        &self.grammar
    }

    /// Parse a complete document.
    pub fn parse(&mut self, source: &str) -> Result<Node, ParseError> {
        let tokens = lex(source).map_err(|err| ParseError::Lex {
            position: SourceLocation::new(source).byte_to_position(err.offset),
            text: err.text,
        })?;

        let tree = self
            .grammar
            .parse(&self.entry, source, &tokens)
            .map_err(|err| ParseError::from_match(err, source))?;

        let node = self
            .actions
            .apply(&tree)?
            .map(Fragment::into_node)
            .ok_or_else(|| ConfigurationError::EntryWithoutAction(self.entry.clone()))?;

        debug!(
            entry = %self.entry,
            bytes = source.len(),
            kind = %node.kind(),
            "parsed document"
        );
        Ok(node)
    }

    /// Read a file and parse its content.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<Node, ParseError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&source)
    }

    /// Slot count of `rule`'s action: the deepest nesting of that rule seen so far
    pub fn high_water_mark(&self, rule: &str) -> usize {
        self.actions.high_water_mark(rule)
    }

    /// In-progress invocations of `rule`; zero whenever no parse is running
    pub fn depth(&self, rule: &str) -> usize {
        self.actions.depth(rule)
    }
}

/// Parse a JSON object document with the default configuration.
pub fn parse_text(content: &str) -> Result<Node, ParseError> {
    JsonParser::new()?.parse(content)
}
