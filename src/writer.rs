//! JSON text output
//!
//! Trees are rendered by converting them to `serde_json::Value` and handing
//! that to serde_json's serializer. Member order is kept (`preserve_order`)
//! and numbers are written from their exact decimal text
//! (`arbitrary_precision`), so a parsed document prints back with the digits
//! it was written with.

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter, Serializer};
use serde_json::{Map, Number, Value as JsonValue};
use std::str::FromStr;

use crate::config::WriterConfig;
use crate::node::{Node, Value};

/// Renders trees as JSON text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Writer {
    compacted: bool,
    indent: String,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Pretty output with a two-space indent
    pub fn new() -> Self {
        Self {
            compacted: false,
            indent: "  ".to_string(),
        }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self {
            compacted: config.compacted,
            indent: config.indent.clone(),
        }
    }

    pub fn compacted(mut self, compacted: bool) -> Self {
        self.compacted = compacted;
        self
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn is_compacted(&self) -> bool {
        self.compacted
    }

    pub fn write(&self, node: &Node) -> Result<String, serde_json::Error> {
        let value = to_json_value(node)?;
        let mut out = Vec::new();

        if self.compacted {
            let mut ser = Serializer::with_formatter(&mut out, CompactFormatter);
            value.serialize(&mut ser)?;
        } else {
            let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
            let mut ser = Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut ser)?;
        }

        String::from_utf8(out).map_err(serde_json::Error::custom)
    }
}

/// Convert a tree to a `serde_json::Value`.
///
/// Member keys of the root are ignored; an Object child without a key is
/// written under the empty key.
pub fn to_json_value(node: &Node) -> Result<JsonValue, serde_json::Error> {
    let value = match node.value() {
        Value::Null => JsonValue::Null,
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::Number(Number::from_str(&n.to_string())?),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(to_json_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(members) => {
            let mut map = Map::with_capacity(members.len());
            for member in members {
                map.insert(
                    member.key().unwrap_or_default().to_string(),
                    to_json_value(member)?,
                );
            }
            JsonValue::Object(map)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample() -> Node {
        let mut flags = Node::array();
        flags.push(true).unwrap();
        flags.push(Node::new()).unwrap();

        let mut root = Node::object();
        root.insert("b", Decimal::new(150, 2)).unwrap();
        root.insert("a", flags).unwrap();
        root
    }

    #[test]
    fn test_compact_output_keeps_member_order() {
        let text = Writer::new().compacted(true).write(&sample()).unwrap();
        assert_eq!(text, r#"{"b":1.50,"a":[true,null]}"#);
    }

    #[test]
    fn test_pretty_output_uses_indent() {
        let text = Writer::new().indent("\t").write(&sample()).unwrap();
        assert_eq!(text, "{\n\t\"b\": 1.50,\n\t\"a\": [\n\t\ttrue,\n\t\tnull\n\t]\n}");
    }

    #[test]
    fn test_leaf_roots() {
        let writer = Writer::new().compacted(true);
        assert_eq!(writer.write(&Node::new()).unwrap(), "null");
        assert_eq!(writer.write(&Node::leaf("q\"t")).unwrap(), r#""q\"t""#);
        assert_eq!(writer.write(&Node::object()).unwrap(), "{}");
    }

    #[test]
    fn test_display_is_pretty() {
        let mut node = Node::object();
        node.insert("k", 1).unwrap();
        assert_eq!(node.to_string(), "{\n  \"k\": 1\n}");
        assert_eq!(node.to_string_compacted().unwrap(), r#"{"k":1}"#);
    }
}
