//! JSON value tree
//!
//! A [`Node`] is one element of a JSON document: an optional member key plus
//! a [`Value`] payload. Composite payloads own their children in order, so a
//! tree is a plain owned structure with no sharing between parents.
//!
//! Invariants carried by the types:
//! - leaves (String/Number/Boolean/Null) never hold children
//! - composites (Object/Array) never hold a scalar
//! - Object members have unique keys; inserting an existing key replaces
//!   the member in place
//! - Array elements carry no key
//!
//! Numbers are exact decimals, see [`number`].

pub mod native;
pub mod number;

use rust_decimal::Decimal;
use std::fmt;
use std::slice;

use crate::writer::Writer;

/// The six JSON kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl Kind {
    /// Whether nodes of this kind hold children
    pub fn is_composite(self) -> bool {
        matches!(self, Kind::Object | Kind::Array)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Object => "Object",
            Kind::Array => "Array",
            Kind::String => "String",
            Kind::Number => "Number",
            Kind::Boolean => "Boolean",
            Kind::Null => "Null",
        };
        f.write_str(name)
    }
}

/// Errors raised by tree construction and access
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    #[error("index {index} out of bounds for node with {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("no member with key {0:?}")]
    KeyNotFound(String),

    #[error("expected {expected} node, found {found}")]
    KindMismatch { expected: Kind, found: Kind },

    #[error("key {key:?} already belongs to the member at index {index}")]
    DuplicateKey { key: String, index: usize },
}

/// Payload of a node
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Number(Decimal),
    String(String),
    Array(Vec<Node>),
    Object(Vec<Node>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Number(value)
    }
}

macro_rules! integer_values {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Number(Decimal::from(value))
                }
            }

            impl From<$t> for Node {
                fn from(value: $t) -> Self {
                    Node::leaf(value)
                }
            }
        )*
    };
}

integer_values!(i32, i64, u32, u64);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// A JSON value with an optional member key
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    key: Option<String>,
    value: Value,
}

impl Node {
    /// An unkeyed Null node
    pub fn new() -> Self {
        Self::default()
    }

    /// An unkeyed node holding `value`
    pub fn leaf(value: impl Into<Value>) -> Self {
        Self {
            key: None,
            value: value.into(),
        }
    }

    /// A keyed node holding `value`
    pub fn keyed(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: Some(key.into()),
            value: value.into(),
        }
    }

    /// An empty Object
    pub fn object() -> Self {
        Self::leaf(Value::Object(Vec::new()))
    }

    /// An empty Array
    pub fn array() -> Self {
        Self::leaf(Value::Array(Vec::new()))
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    pub fn clear_key(&mut self) {
        self.key = None;
    }

    /// Consume the node and return it with `key` stamped on, replacing any previous key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.set_key(key);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_string(&self) -> bool {
        self.kind() == Kind::String
    }

    pub fn is_number(&self) -> bool {
        self.kind() == Kind::Number
    }

    pub fn is_boolean(&self) -> bool {
        self.kind() == Kind::Boolean
    }

    pub fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match &self.value {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &self.value {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Children of a composite node, empty for leaves
    pub fn children(&self) -> &[Node] {
        match &self.value {
            Value::Object(items) | Value::Array(items) => items,
            _ => &[],
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, Node> {
        self.children().iter()
    }

    /// Number of children (0 for leaves)
    pub fn len(&self) -> usize {
        self.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Node, NodeError> {
        let children = self.children();
        children.get(index).ok_or(NodeError::IndexOutOfBounds {
            index,
            len: children.len(),
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Node, NodeError> {
        let len = self.len();
        match &mut self.value {
            Value::Object(items) | Value::Array(items) => items
                .get_mut(index)
                .ok_or(NodeError::IndexOutOfBounds { index, len }),
            _ => Err(NodeError::IndexOutOfBounds { index, len }),
        }
    }

    /// Key of the child at `index`; `None` for array elements
    pub fn key_at(&self, index: usize) -> Result<Option<&str>, NodeError> {
        self.get(index).map(Node::key)
    }

    /// Position of the member keyed `key`
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.children()
            .iter()
            .position(|child| child.key() == Some(key))
    }

    pub fn get_key(&self, key: &str) -> Result<&Node, NodeError> {
        self.index_of(key)
            .map(|index| &self.children()[index])
            .ok_or_else(|| NodeError::KeyNotFound(key.to_string()))
    }

    /// Value of the member keyed `key`, if present
    pub fn value_for(&self, key: &str) -> Option<&Value> {
        self.get_key(key).ok().map(Node::value)
    }

    /// String value of the member keyed `key`, if present and a String
    pub fn string_for(&self, key: &str) -> Option<&str> {
        self.get_key(key).ok().and_then(Node::as_str)
    }

    /// Insert an object member.
    ///
    /// An existing member with the same key is replaced at its position and
    /// returned; otherwise the member is appended. The node becomes an Object
    /// if it is Null or an empty composite; any other kind is rejected.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Node>,
    ) -> Result<Option<Node>, NodeError> {
        let member = value.into().with_key(key);
        let members = self.children_as(Kind::Object)?;

        match members.iter().position(|m| m.key == member.key) {
            Some(index) => Ok(Some(std::mem::replace(&mut members[index], member))),
            None => {
                members.push(member);
                Ok(None)
            }
        }
    }

    /// Append an array element, dropping any key it carried.
    ///
    /// Kind forcing follows [`Node::insert`].
    pub fn push(&mut self, value: impl Into<Node>) -> Result<(), NodeError> {
        let mut element = value.into();
        element.clear_key();
        self.children_as(Kind::Array)?.push(element);
        Ok(())
    }

    /// Remove and return the child at `index`
    pub fn remove(&mut self, index: usize) -> Result<Node, NodeError> {
        let len = self.len();
        match &mut self.value {
            Value::Object(items) | Value::Array(items) if index < len => Ok(items.remove(index)),
            _ => Err(NodeError::IndexOutOfBounds { index, len }),
        }
    }

    /// Replace the child at `index`, returning the previous child.
    ///
    /// In an Object the replacement inherits the old key when it has none.
    /// A key already used by another member is rejected.
    pub fn set(&mut self, index: usize, node: Node) -> Result<Node, NodeError> {
        let is_object = self.is_object();
        if let (true, Some(key)) = (is_object, node.key()) {
            match self.index_of(key) {
                Some(other) if other != index => {
                    return Err(NodeError::DuplicateKey {
                        key: key.to_string(),
                        index: other,
                    })
                }
                _ => {}
            }
        }
        let slot = self.get_mut(index)?;
        let mut node = node;
        if is_object && node.key.is_none() {
            node.key = slot.key.clone();
        } else if !is_object {
            node.key = None;
        }
        Ok(std::mem::replace(slot, node))
    }

    /// Render as compact JSON text
    pub fn to_string_compacted(&self) -> Result<String, serde_json::Error> {
        Writer::new().compacted(true).write(self)
    }

    fn children_as(&mut self, kind: Kind) -> Result<&mut Vec<Node>, NodeError> {
        let found = self.kind();
        if found != kind {
            let convertible = match &self.value {
                Value::Null => true,
                Value::Object(items) | Value::Array(items) => items.is_empty(),
                _ => false,
            };
            if !convertible {
                return Err(NodeError::KindMismatch {
                    expected: kind,
                    found,
                });
            }
            self.value = match kind {
                Kind::Object => Value::Object(Vec::new()),
                _ => Value::Array(Vec::new()),
            };
        }

        match &mut self.value {
            Value::Object(items) | Value::Array(items) => Ok(items),
            _ => Err(NodeError::KindMismatch {
                expected: kind,
                found,
            }),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::leaf(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::leaf(value)
    }
}

impl From<Decimal> for Node {
    fn from(value: Decimal) -> Self {
        Node::leaf(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::leaf(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::leaf(value)
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pretty JSON text
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = Writer::new().write(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_null() {
        let node = Node::new();
        assert_eq!(node.kind(), Kind::Null);
        assert_eq!(node.key(), None);
        assert_eq!(node.len(), 0);
    }

    #[test]
    fn test_insert_converts_null_to_object() {
        let mut node = Node::new();
        assert_eq!(node.insert("a", 1).unwrap(), None);
        assert!(node.is_object());
        assert_eq!(node.key_at(0).unwrap(), Some("a"));
    }

    #[test]
    fn test_insert_duplicate_replaces_in_place() {
        let mut node = Node::object();
        node.insert("x", 1).unwrap();
        node.insert("y", true).unwrap();
        let replaced = node.insert("x", "two").unwrap();

        assert_eq!(replaced, Some(Node::keyed("x", 1)));
        assert_eq!(node.len(), 2);
        assert_eq!(node.key_at(0).unwrap(), Some("x"));
        assert_eq!(node.get(0).unwrap().as_str(), Some("two"));
        assert_eq!(node.key_at(1).unwrap(), Some("y"));
    }

    #[test]
    fn test_insert_overwrites_value_key() {
        let mut node = Node::object();
        node.insert("outer", Node::keyed("inner", 3)).unwrap();
        assert_eq!(node.get(0).unwrap().key(), Some("outer"));
    }

    #[test]
    fn test_push_converts_empty_object_to_array() {
        let mut node = Node::object();
        node.push(Node::keyed("dropped", false)).unwrap();
        assert!(node.is_array());
        assert_eq!(node.key_at(0).unwrap(), None);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let mut node = Node::leaf("text");
        assert_eq!(
            node.push(1),
            Err(NodeError::KindMismatch {
                expected: Kind::Array,
                found: Kind::String
            })
        );

        let mut array = Node::array();
        array.push(1).unwrap();
        assert_eq!(
            array.insert("k", 1),
            Err(NodeError::KindMismatch {
                expected: Kind::Object,
                found: Kind::Array
            })
        );
    }

    #[test]
    fn test_positional_access_errors() {
        let mut node = Node::array();
        node.push(true).unwrap();

        assert_eq!(
            node.get(3),
            Err(NodeError::IndexOutOfBounds { index: 3, len: 1 })
        );
        assert_eq!(
            node.remove(1),
            Err(NodeError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(
            Node::leaf(5).key_at(0),
            Err(NodeError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_remove_returns_child() {
        let mut node = Node::object();
        node.insert("a", 1).unwrap();
        node.insert("b", 2).unwrap();

        let removed = node.remove(0).unwrap();
        assert_eq!(removed, Node::keyed("a", 1));
        assert_eq!(node.len(), 1);
        assert_eq!(node.index_of("b"), Some(0));
    }

    #[test]
    fn test_key_lookup() {
        let mut node = Node::object();
        node.insert("name", "jsonfold").unwrap();

        assert_eq!(node.string_for("name"), Some("jsonfold"));
        assert_eq!(node.value_for("missing"), None);
        assert_eq!(
            node.get_key("missing"),
            Err(NodeError::KeyNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_set_keeps_member_key() {
        let mut node = Node::object();
        node.insert("a", 1).unwrap();
        let old = node.set(0, Node::leaf(9)).unwrap();

        assert_eq!(old, Node::keyed("a", 1));
        assert_eq!(node.get(0).unwrap(), &Node::keyed("a", 9));
    }

    #[test]
    fn test_set_rejects_key_of_another_member() {
        let mut node = Node::object();
        node.insert("a", 1).unwrap();
        node.insert("b", 2).unwrap();

        assert_eq!(
            node.set(1, Node::keyed("a", 3)),
            Err(NodeError::DuplicateKey {
                key: "a".to_string(),
                index: 0,
            })
        );
        assert_eq!(node.key_at(1).unwrap(), Some("b"));
        assert_eq!(node.to_string_compacted().unwrap(), r#"{"a":1,"b":2}"#);

        node.set(1, Node::keyed("c", 3)).unwrap();
        node.set(0, Node::keyed("a", 4)).unwrap();
        assert_eq!(node.to_string_compacted().unwrap(), r#"{"a":4,"c":3}"#);
    }

    #[test]
    fn test_structural_equality_is_order_sensitive() {
        let mut first = Node::object();
        first.insert("a", 1).unwrap();
        first.insert("b", 2).unwrap();

        let mut second = Node::object();
        second.insert("b", 2).unwrap();
        second.insert("a", 1).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.clone(), first);
        assert_ne!(Node::keyed("a", 1), Node::leaf(1));
    }
}
