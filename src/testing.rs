//! Fluent assertion API for value trees
//!
//! ```text
//! assert_node(&doc)
//!     .object()
//!     .keys(&["a", "b"])
//!     .member("b", |b| {
//!         b.array().child_count(3).child(0, |c| {
//!             c.boolean(true);
//!         });
//!     });
//! ```
//!
//! Every failure message starts with the path of the node it is about,
//! e.g. `$.b[0]: expected Boolean, found Null`.

use rust_decimal::Decimal;

use crate::node::{Kind, Node};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder rooted at `node`
pub fn assert_node(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: "$".to_string(),
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(self, expected: Kind) -> Self {
        assert_eq!(
            self.node.kind(),
            expected,
            "{}: expected {}, found {}",
            self.context,
            expected,
            self.node.kind()
        );
        self
    }

    pub fn object(self) -> Self {
        self.kind(Kind::Object)
    }

    pub fn array(self) -> Self {
        self.kind(Kind::Array)
    }

    pub fn null(self) -> Self {
        self.kind(Kind::Null)
    }

    pub fn key(self, expected: &str) -> Self {
        assert_eq!(
            self.node.key(),
            Some(expected),
            "{}: expected key {:?}, found {:?}",
            self.context,
            expected,
            self.node.key()
        );
        self
    }

    pub fn no_key(self) -> Self {
        assert_eq!(
            self.node.key(),
            None,
            "{}: expected no key, found {:?}",
            self.context,
            self.node.key()
        );
        self
    }

    pub fn string(self, expected: &str) -> Self {
        let this = self.kind(Kind::String);
        assert_eq!(
            this.node.as_str(),
            Some(expected),
            "{}: string value differs",
            this.context
        );
        this
    }

    /// Assert a Number equal to the decimal literal `expected`
    pub fn number(self, expected: &str) -> Self {
        let this = self.kind(Kind::Number);
        let expected_value: Decimal = expected
            .parse()
            .unwrap_or_else(|e| panic!("{}: bad expected number {:?}: {}", this.context, expected, e));
        assert_eq!(
            this.node.as_number(),
            Some(expected_value),
            "{}: number value differs",
            this.context
        );
        this
    }

    pub fn boolean(self, expected: bool) -> Self {
        let this = self.kind(Kind::Boolean);
        assert_eq!(
            this.node.as_bool(),
            Some(expected),
            "{}: boolean value differs",
            this.context
        );
        this
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.node.len();
        assert_eq!(
            actual, expected,
            "{}: expected {} children, found {}",
            self.context, expected, actual
        );
        self
    }

    /// Object member keys, in order
    pub fn keys(self, expected: &[&str]) -> Self {
        let actual: Vec<_> = self.node.iter().map(|child| child.key()).collect();
        let wanted: Vec<_> = expected.iter().map(|key| Some(*key)).collect();
        assert_eq!(actual, wanted, "{}: member keys differ", self.context);
        self
    }

    /// Assert on the child at `index`
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let child = match self.node.get(index) {
            Ok(child) => child,
            Err(e) => panic!("{}: {}", self.context, e),
        };
        assertion(NodeAssertion {
            node: child,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert on the Object member keyed `key`
    pub fn member<F>(self, key: &str, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let member = match self.node.get_key(key) {
            Ok(member) => member,
            Err(e) => panic!("{}: {}", self.context, e),
        };
        assertion(NodeAssertion {
            node: member,
            context: format!("{}.{}", self.context, key),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut flags = Node::array();
        flags.push(true).unwrap();
        flags.push(Node::new()).unwrap();

        let mut root = Node::object();
        root.insert("a", 1).unwrap();
        root.insert("b", flags).unwrap();
        root
    }

    #[test]
    fn test_passing_chain() {
        assert_node(&sample())
            .object()
            .child_count(2)
            .keys(&["a", "b"])
            .member("a", |a| {
                a.key("a").number("1");
            })
            .member("b", |b| {
                b.array()
                    .child(0, |c| {
                        c.no_key().boolean(true);
                    })
                    .child(1, |c| {
                        c.null();
                    });
            });
    }

    #[test]
    #[should_panic(expected = "$.b[1]: expected Boolean, found Null")]
    fn test_failure_names_path() {
        assert_node(&sample()).member("b", |b| {
            b.child(1, |c| {
                c.boolean(false);
            });
        });
    }

    #[test]
    #[should_panic(expected = "no member with key \"zzz\"")]
    fn test_missing_member() {
        assert_node(&sample()).member("zzz", |_| {});
    }
}
