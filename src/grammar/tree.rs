//! Parse trees

use std::ops::Range;

/// One matched rule or named terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode<'a> {
    rule: &'a str,
    text: &'a str,
    span: Range<usize>,
    children: Vec<ParseNode<'a>>,
}

impl<'a> ParseNode<'a> {
    pub fn new(rule: &'a str, text: &'a str, span: Range<usize>, children: Vec<ParseNode<'a>>) -> Self {
        Self {
            rule,
            text,
            span,
            children,
        }
    }

    pub fn rule(&self) -> &'a str {
        self.rule
    }

    /// Source text covered by the match
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn children(&self) -> &[ParseNode<'a>] {
        &self.children
    }

    /// Deepest chain of nested nodes, counting this one
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(ParseNode::height).max().unwrap_or(0)
    }

    /// Number of nodes named `rule` in this subtree
    pub fn count(&self, rule: &str) -> usize {
        let own = usize::from(self.rule == rule);
        own + self.children.iter().map(|child| child.count(rule)).sum::<usize>()
    }
}
