//! Rule bodies

use std::fmt;

use super::Terminal;

/// Right-hand side of a grammar rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern<T> {
    /// One token of the given kind
    Token(T),
    /// A reference to another rule by name
    Rule(String),
    /// All items, in order
    Seq(Vec<Pattern<T>>),
    /// The first alternative that matches
    Choice(Vec<Pattern<T>>),
    /// Zero or one
    Optional(Box<Pattern<T>>),
    /// Zero or more, greedy
    Repeat(Box<Pattern<T>>),
}

impl<T: Clone> Pattern<T> {
    pub fn token(token: T) -> Self {
        Pattern::Token(token)
    }

    pub fn rule(name: impl Into<String>) -> Self {
        Pattern::Rule(name.into())
    }

    pub fn seq(items: Vec<Pattern<T>>) -> Self {
        Pattern::Seq(items)
    }

    pub fn choice(alternatives: Vec<Pattern<T>>) -> Self {
        Pattern::Choice(alternatives)
    }

    pub fn optional(pattern: Pattern<T>) -> Self {
        Pattern::Optional(Box::new(pattern))
    }

    pub fn repeat(pattern: Pattern<T>) -> Self {
        Pattern::Repeat(Box::new(pattern))
    }

    /// `[ item { sep item } ]`
    pub fn separated(item: Pattern<T>, separator: T) -> Self {
        Pattern::optional(Pattern::seq(vec![
            item.clone(),
            Pattern::repeat(Pattern::seq(vec![Pattern::token(separator), item])),
        ]))
    }

    /// Names of all rules this pattern refers to
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Token(_) => {}
            Pattern::Rule(name) => out.push(name),
            Pattern::Seq(items) | Pattern::Choice(items) => {
                for item in items {
                    item.collect_references(out);
                }
            }
            Pattern::Optional(inner) | Pattern::Repeat(inner) => inner.collect_references(out),
        }
    }
}

/// EBNF-style rendering
impl<T: Terminal> fmt::Display for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Token(token) => f.write_str(token.describe()),
            Pattern::Rule(name) => f.write_str(name),
            Pattern::Seq(items) => write_joined(f, items, " ", true),
            Pattern::Choice(items) => write_joined(f, items, " | ", false),
            Pattern::Optional(inner) => write!(f, "[ {} ]", inner),
            Pattern::Repeat(inner) => write!(f, "{{ {} }}", inner),
        }
    }
}

fn write_joined<T: Terminal>(
    f: &mut fmt::Formatter<'_>,
    items: &[Pattern<T>],
    separator: &str,
    group_choices: bool,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        match item {
            Pattern::Choice(_) if group_choices => write!(f, "( {} )", item)?,
            _ => write!(f, "{}", item)?,
        }
    }
    Ok(())
}
