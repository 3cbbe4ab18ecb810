//! Semantic actions building [`Node`] trees from JSON matches
//!
//! | Rule   | Part     | Children it reacts to                    |
//! |--------|----------|------------------------------------------|
//! | Object | `Node`   | `Pair`: insert the keyed member          |
//! | Pair   | `Node`   | key terminal, then `Value`               |
//! | Array  | `Node`   | `Value`: append the element              |
//! | Value  | Fragment | one literal terminal, `Object` or `Array`|
//!
//! Quoted strings, values and keys alike, are decoded by
//! [`decode_string`], so `\/` becomes `/` and every other escape resolves to
//! the character it names. The writer escapes them again on output.

use tracing::debug;

use crate::actions::{Action, ActionError, ActionSet, ConfigurationError, Matched, Part};
use crate::node::number::parse_decimal;
use crate::node::{Node, Value};

use super::grammar::{
    ARRAY, BOOLEAN, FLOAT, INT, NULL, OBJECT, PAIR, SIMPLE_STRING, STRING, VALUE,
};
use super::token::decode_string;

/// What JSON actions hand to each other: a finished node or a bare scalar
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Node(Node),
    Scalar(Value),
}

impl Fragment {
    /// The fragment as a node, wrapping scalars into unkeyed leaves
    pub fn into_node(self) -> Node {
        match self {
            Fragment::Node(node) => node,
            Fragment::Scalar(value) => Node::leaf(value),
        }
    }
}

impl Default for Fragment {
    fn default() -> Self {
        Fragment::Scalar(Value::Null)
    }
}

impl From<Node> for Fragment {
    fn from(node: Node) -> Self {
        Fragment::Node(node)
    }
}

fn invalid_literal(child: &Matched<'_, Fragment>, reason: impl ToString) -> ActionError {
    ActionError::InvalidLiteral {
        rule: child.rule().to_string(),
        text: child.text().to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct ObjectAction;

impl Action for ObjectAction {
    type Value = Fragment;
    type Part = Node;

    fn matched(&mut self, part: &mut Part<Node>, child: Matched<'_, Fragment>) -> Result<(), ActionError> {
        if child.rule() != PAIR {
            return Ok(());
        }

        let member = child.into_value().unwrap_or_default().into_node();
        let key = match member.key() {
            Some(key) => key.to_string(),
            None => {
                return Err(ActionError::MissingKey {
                    rule: OBJECT.to_string(),
                })
            }
        };

        if part.get().insert(key.as_str(), member)?.is_some() {
            debug!(key = %key, "duplicate object key replaced in place");
        }
        Ok(())
    }
}

/// Holds the key until the pair's value arrives
#[derive(Debug, Default)]
pub struct PairAction {
    key: Option<String>,
}

impl Action for PairAction {
    type Value = Fragment;
    type Part = Node;

    fn matched(&mut self, part: &mut Part<Node>, child: Matched<'_, Fragment>) -> Result<(), ActionError> {
        match child.rule() {
            STRING => {
                let key = decode_string(child.text()).map_err(|e| invalid_literal(&child, e))?;
                self.key = Some(key);
            }
            SIMPLE_STRING => self.key = Some(child.text().to_string()),
            VALUE => {
                let key = self.key.take().ok_or_else(|| ActionError::MissingKey {
                    rule: PAIR.to_string(),
                })?;
                let value = child.into_value().unwrap_or_default();
                part.set(value.into_node().with_key(key));
            }
            _ => {}
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.key = None;
    }
}

#[derive(Debug, Default)]
pub struct ArrayAction;

impl Action for ArrayAction {
    type Value = Fragment;
    type Part = Node;

    fn matched(&mut self, part: &mut Part<Node>, child: Matched<'_, Fragment>) -> Result<(), ActionError> {
        if child.rule() == VALUE {
            let element = child.into_value().unwrap_or_default().into_node();
            part.get().push(element)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ValueAction;

impl Action for ValueAction {
    type Value = Fragment;
    type Part = Fragment;

    fn matched(
        &mut self,
        part: &mut Part<Fragment>,
        child: Matched<'_, Fragment>,
    ) -> Result<(), ActionError> {
        let scalar = match child.rule() {
            INT | FLOAT => {
                let number = parse_decimal(child.text()).map_err(|e| invalid_literal(&child, e))?;
                Value::Number(number)
            }
            STRING => {
                let text = decode_string(child.text()).map_err(|e| invalid_literal(&child, e))?;
                Value::String(text)
            }
            BOOLEAN => {
                let flag = child
                    .text()
                    .parse::<bool>()
                    .map_err(|e| invalid_literal(&child, e))?;
                Value::Boolean(flag)
            }
            NULL => Value::Null,
            OBJECT | ARRAY => {
                if let Some(node) = child.into_value() {
                    part.set(node);
                }
                return Ok(());
            }
            _ => return Ok(()),
        };

        part.set(Fragment::Scalar(scalar));
        Ok(())
    }
}

/// Register the four JSON actions.
pub fn install(actions: &mut ActionSet<Fragment>) -> Result<(), ConfigurationError> {
    actions.register(OBJECT, ObjectAction::default, Node::object)?;
    actions.register(PAIR, PairAction::default, Node::new)?;
    actions.register(ARRAY, ArrayAction::default, Node::array)?;
    actions.register(VALUE, ValueAction::default, Fragment::default)?;
    Ok(())
}
