//! Building trees from native Rust values
//!
//! Any `Serialize` value is first turned into a `serde_json::Value` (with
//! `preserve_order`, so map entries keep their iteration order, and
//! `arbitrary_precision`, so numbers keep their text) and then decomposed
//! into nodes. Values JSON cannot represent fail with
//! [`NodeError::UnsupportedValue`].

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::number::parse_decimal;
use super::{Node, NodeError};

impl Node {
    /// Recursively decompose a native value into a tree.
    ///
    /// Maps become Objects, sequences become Arrays, strings/numbers/booleans
    /// become leaves and unit/`None` becomes Null.
    pub fn from_native<T>(value: &T) -> Result<Node, NodeError>
    where
        T: Serialize + ?Sized,
    {
        let json =
            serde_json::to_value(value).map_err(|e| NodeError::UnsupportedValue(e.to_string()))?;
        Node::try_from(json)
    }
}

impl TryFrom<JsonValue> for Node {
    type Error = NodeError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        let node = match value {
            JsonValue::Null => Node::new(),
            JsonValue::Bool(b) => Node::leaf(b),
            JsonValue::Number(n) => {
                let text = n.to_string();
                let number = parse_decimal(&text).map_err(|e| {
                    NodeError::UnsupportedValue(format!("number {} is not exact: {}", text, e))
                })?;
                Node::leaf(number)
            }
            JsonValue::String(s) => Node::leaf(s),
            JsonValue::Array(items) => {
                let mut node = Node::array();
                for item in items {
                    node.push(Node::try_from(item)?)?;
                }
                node
            }
            JsonValue::Object(map) => {
                let mut node = Node::object();
                for (key, item) in map {
                    node.insert(key, Node::try_from(item)?)?;
                }
                node
            }
        };
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Kind;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Endpoint {
        name: String,
        port: u16,
        secure: bool,
        tags: Vec<&'static str>,
        fallback: Option<String>,
    }

    #[test]
    fn test_struct_becomes_object_in_field_order() {
        let endpoint = Endpoint {
            name: "api".to_string(),
            port: 8080,
            secure: true,
            tags: vec!["a", "b"],
            fallback: None,
        };
        let node = Node::from_native(&endpoint).unwrap();

        assert_eq!(node.kind(), Kind::Object);
        let keys: Vec<_> = node.iter().filter_map(Node::key).collect();
        assert_eq!(keys, ["name", "port", "secure", "tags", "fallback"]);
        assert_eq!(node.string_for("name"), Some("api"));
        assert_eq!(
            node.get_key("port").unwrap().as_number(),
            Some(Decimal::from(8080))
        );
        assert_eq!(node.get_key("tags").unwrap().len(), 2);
        assert!(node.get_key("fallback").unwrap().is_null());
    }

    #[test]
    fn test_scalars() {
        assert_eq!(Node::from_native(&true).unwrap(), Node::leaf(true));
        assert_eq!(Node::from_native("hi").unwrap(), Node::leaf("hi"));
        assert_eq!(Node::from_native(&()).unwrap(), Node::new());
        assert_eq!(
            Node::from_native(&1.25f64).unwrap(),
            Node::leaf(Decimal::new(125, 2))
        );
    }

    #[test]
    fn test_nested_sequences() {
        let node = Node::from_native(&vec![vec![1, 2], vec![]]).unwrap();
        assert!(node.is_array());
        assert_eq!(node.get(0).unwrap().len(), 2);
        assert!(node.get(1).unwrap().is_array());
    }

    #[test]
    fn test_non_string_map_keys_are_unsupported() {
        let mut map = BTreeMap::new();
        map.insert((1u8, 2u8), "pair");

        assert!(matches!(
            Node::from_native(&map),
            Err(NodeError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_out_of_range_number_is_unsupported() {
        assert!(matches!(
            Node::from_native(&1e300f64),
            Err(NodeError::UnsupportedValue(_))
        ));
    }
}
