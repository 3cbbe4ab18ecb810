//! Declarative grammar engine
//!
//! A grammar is data: a table of named rules, each a [`Pattern`] over the
//! terminals of a token stream. The engine walks the table with a
//! backtracking recursive-descent matcher and produces a [`ParseNode`] tree.
//! Actions never run during matching; the finished tree is replayed through
//! an [`crate::actions::ActionSet`] afterwards, so a failed alternative never
//! leaves half-built values behind.
//!
//! ```text
//!   source --logos--> [Lexeme] --Grammar::parse--> ParseNode --ActionSet::apply--> value
//! ```
//!
//! Terminals that carry a name (see [`Terminal::name`]) appear in the tree
//! as leaves so actions can read their text; punctuation is matched and
//! dropped.

pub mod engine;
pub mod pattern;
pub mod tree;

pub use engine::MatchError;
pub use pattern::Pattern;
pub use tree::ParseNode;

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::actions::ConfigurationError;

/// Default limit on rule nesting while matching.
///
/// Matching and replay both recurse once per nested rule; at this depth they
/// stay well inside a 2 MiB thread stack. JSON nests two or three rules per
/// level, so this admits 63 nested arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A token kind a grammar can match on
pub trait Terminal: Copy + Eq + fmt::Debug {
    /// Rule name the token gets in parse trees, `None` for tokens that are
    /// matched but not kept
    fn name(&self) -> Option<&'static str>;

    /// How the token is shown in "expected ..." messages
    fn describe(&self) -> &'static str;
}

/// A token with its byte range in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme<T> {
    pub token: T,
    pub span: Range<usize>,
}

impl<T> Lexeme<T> {
    pub fn new(token: T, span: Range<usize>) -> Self {
        Self { token, span }
    }
}

/// Named rules over terminals of type `T`
#[derive(Debug, Clone)]
pub struct Grammar<T> {
    rules: Vec<(String, Pattern<T>)>,
    index: HashMap<String, usize>,
    max_depth: usize,
}

impl<T: Terminal> Grammar<T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            index: HashMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Declare `name`; a later declaration of the same name replaces it.
    pub fn rule(mut self, name: impl Into<String>, pattern: Pattern<T>) -> Self {
        let name = name.into();
        match self.index.get(&name) {
            Some(&at) => self.rules[at].1 = pattern,
            None => {
                self.index.insert(name.clone(), self.rules.len());
                self.rules.push((name, pattern));
            }
        }
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Rule names in declaration order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    /// Check that every rule reference resolves.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (name, pattern) in &self.rules {
            for reference in pattern.references() {
                if !self.has_rule(reference) {
                    return Err(ConfigurationError::UndefinedReference {
                        rule: name.clone(),
                        reference: reference.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<(&str, &Pattern<T>)> {
        self.index
            .get(name)
            .map(|&at| (self.rules[at].0.as_str(), &self.rules[at].1))
    }
}

impl<T: Terminal> Default for Grammar<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Terminal> fmt::Display for Grammar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rules.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, pattern) in &self.rules {
            writeln!(f, "{:<width$} = {}", name, pattern, width = width)?;
        }
        Ok(())
    }
}
