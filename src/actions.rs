//! Reentrant semantic actions
//!
//! A grammar engine reports, for every rule it matched, the completed child
//! matches in left-to-right order. An [`Action`] folds those child matches
//! into one value per rule invocation.
//!
//! The same rule can be entered again before its outer invocation has
//! finished (an Array inside an Array). Each registered action therefore owns
//! a stack of slots ([`ActionPool`]): every invocation acquires the first free
//! slot, accumulates into it and releases it on `finish`. Slots are reset
//! rather than freed, so the stack length is the deepest nesting the rule has
//! seen so far.
//!
//! ```text
//!   [ [ [] ] ]          Array pool
//!   ^ acquire  -> slot 0  (in use)
//!     ^ acquire  -> slot 1  (in use)
//!       ^ acquire  -> slot 2  (new, in use)
//!       finish   -> slot 2  (free)
//!     finish     -> slot 1  (free)
//!   finish       -> slot 0  (free)      high water mark: 3
//! ```
//!
//! Parts are created lazily from an explicit factory given at registration,
//! see [`Part`]. [`ActionSet`] maps rule names to pools and replays a parse
//! tree through them.

pub mod part;
pub mod pool;
pub mod set;

pub use part::Part;
pub use pool::{ActionPool, Handler, Slot, SlotId};
pub use set::{ActionId, ActionSet};

use std::ops::Range;

use crate::node::NodeError;

/// A completed child match, as seen by the parent rule's action
#[derive(Debug, Clone, PartialEq)]
pub struct Matched<'a, V> {
    rule: &'a str,
    text: &'a str,
    span: Range<usize>,
    value: Option<V>,
}

impl<'a, V> Matched<'a, V> {
    pub fn new(rule: &'a str, text: &'a str, span: Range<usize>, value: Option<V>) -> Self {
        Self {
            rule,
            text,
            span,
            value,
        }
    }

    /// Name of the rule or terminal that matched
    pub fn rule(&self) -> &'a str {
        self.rule
    }

    /// Raw source text of the match
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Finished value of the child's own action, if the child rule has one
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn take_value(&mut self) -> Option<V> {
        self.value.take()
    }

    pub fn into_value(self) -> Option<V> {
        self.value
    }
}

/// Per-rule semantic action.
///
/// `Value` is the type flowing between all actions of one set; `Part` is what
/// this action accumulates and hands back on `finish`.
pub trait Action {
    type Value;
    type Part: Into<Self::Value>;

    /// Called once per completed child match, in grammar order.
    fn matched(
        &mut self,
        part: &mut Part<Self::Part>,
        child: Matched<'_, Self::Value>,
    ) -> Result<(), ActionError> {
        let _ = (part, child);
        Ok(())
    }

    /// Drop per-invocation state before the slot is reused.
    fn clear(&mut self) {}
}

/// Misconfiguration detected while assembling a grammar and its actions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("an action is already registered for rule {0:?}")]
    DuplicateAction(String),

    #[error("action registered for rule {0:?}, which the grammar does not declare")]
    UnknownRule(String),

    #[error("entry rule {0:?} is not declared by the grammar")]
    UnknownEntryRule(String),

    #[error("entry rule {0:?} has no action to produce a value")]
    EntryWithoutAction(String),

    #[error("rule {rule:?} refers to undeclared rule {reference:?}")]
    UndefinedReference { rule: String, reference: String },
}

/// Failure raised by an action while folding child matches
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("invalid {rule} literal {text:?}: {reason}")]
    InvalidLiteral {
        rule: String,
        text: String,
        reason: String,
    },

    #[error("{rule} received a value before its key")]
    MissingKey { rule: String },

    #[error("slot {slot} of rule {rule:?} is not in use")]
    InactiveSlot { rule: String, slot: usize },

    #[error(transparent)]
    Node(#[from] NodeError),
}
