//! Backtracking recursive-descent matcher
//!
//! Choices are ordered: the first alternative that matches wins, and the
//! matcher never revisits it. Repetition is greedy. A failed alternative
//! truncates the children it pushed, so the tree only ever contains nodes of
//! successful matches.
//!
//! On failure the matcher reports the furthest token position any terminal
//! was tried at, together with every terminal expected there.

use tracing::debug;

use super::{Grammar, Lexeme, ParseNode, Pattern, Terminal};

const END_OF_INPUT: &str = "end of input";

/// Why a token stream did not match the entry rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("expected {} but found {found}", .expected.join(" or "))]
    Syntax {
        offset: usize,
        expected: Vec<String>,
        found: String,
    },

    #[error("rules nested deeper than {limit}")]
    TooDeep { offset: usize, limit: usize },

    #[error("no rule named {0:?}")]
    UnknownRule(String),
}

impl MatchError {
    /// Byte offset the error points at, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            MatchError::Syntax { offset, .. } | MatchError::TooDeep { offset, .. } => Some(*offset),
            MatchError::UnknownRule(_) => None,
        }
    }
}

impl<T: Terminal> Grammar<T> {
    /// Match `tokens` against `entry`, which must consume all of them.
    pub fn parse<'a>(
        &'a self,
        entry: &str,
        source: &'a str,
        tokens: &[Lexeme<T>],
    ) -> Result<ParseNode<'a>, MatchError> {
        let mut matcher = Matcher::new(self, source, tokens);

        match matcher.match_rule(entry, 0)? {
            Some((node, end)) if end == tokens.len() => {
                debug!(rule = entry, tokens = tokens.len(), "matched entry rule");
                Ok(node)
            }
            Some((_, end)) => {
                matcher.expect(end, END_OF_INPUT);
                Err(matcher.syntax_error())
            }
            None => Err(matcher.syntax_error()),
        }
    }
}

struct Matcher<'a, 't, T> {
    grammar: &'a Grammar<T>,
    source: &'a str,
    tokens: &'t [Lexeme<T>],
    depth: usize,
    furthest: usize,
    expected: Vec<&'static str>,
}

impl<'a, 't, T: Terminal> Matcher<'a, 't, T> {
    fn new(grammar: &'a Grammar<T>, source: &'a str, tokens: &'t [Lexeme<T>]) -> Self {
        Self {
            grammar,
            source,
            tokens,
            depth: 0,
            furthest: 0,
            expected: Vec::new(),
        }
    }

    /// Match rule `name` at token `pos`, returning its node and the position after it.
    fn match_rule(
        &mut self,
        name: &str,
        pos: usize,
    ) -> Result<Option<(ParseNode<'a>, usize)>, MatchError> {
        let grammar = self.grammar;
        let (name, pattern) = grammar
            .lookup(name)
            .ok_or_else(|| MatchError::UnknownRule(name.to_string()))?;

        if self.depth >= grammar.max_depth() {
            return Err(MatchError::TooDeep {
                offset: self.offset_at(pos),
                limit: grammar.max_depth(),
            });
        }

        self.depth += 1;
        let mut children = Vec::new();
        let matched = self.match_pattern(pattern, pos, &mut children);
        self.depth -= 1;

        let source = self.source;
        Ok(matched?.map(|end| {
            let span = self.span_between(pos, end);
            let node = ParseNode::new(name, &source[span.clone()], span, children);
            (node, end)
        }))
    }

    fn match_pattern(
        &mut self,
        pattern: &'a Pattern<T>,
        pos: usize,
        out: &mut Vec<ParseNode<'a>>,
    ) -> Result<Option<usize>, MatchError> {
        match pattern {
            Pattern::Token(token) => Ok(self.match_token(*token, pos, out)),
            Pattern::Rule(name) => Ok(self.match_rule(name, pos)?.map(|(node, end)| {
                out.push(node);
                end
            })),
            Pattern::Seq(items) => {
                let mark = out.len();
                let mut cur = pos;
                for item in items {
                    match self.match_pattern(item, cur, out)? {
                        Some(next) => cur = next,
                        None => {
                            out.truncate(mark);
                            return Ok(None);
                        }
                    }
                }
                Ok(Some(cur))
            }
            Pattern::Choice(alternatives) => {
                for alternative in alternatives {
                    let mark = out.len();
                    if let Some(next) = self.match_pattern(alternative, pos, out)? {
                        return Ok(Some(next));
                    }
                    out.truncate(mark);
                }
                Ok(None)
            }
            Pattern::Optional(inner) => {
                let mark = out.len();
                match self.match_pattern(inner, pos, out)? {
                    Some(next) => Ok(Some(next)),
                    None => {
                        out.truncate(mark);
                        Ok(Some(pos))
                    }
                }
            }
            Pattern::Repeat(inner) => {
                let mut cur = pos;
                loop {
                    let mark = out.len();
                    match self.match_pattern(inner, cur, out)? {
                        // an empty match would repeat forever
                        Some(next) if next > cur => cur = next,
                        _ => {
                            out.truncate(mark);
                            return Ok(Some(cur));
                        }
                    }
                }
            }
        }
    }

    fn match_token(&mut self, token: T, pos: usize, out: &mut Vec<ParseNode<'a>>) -> Option<usize> {
        match self.tokens.get(pos) {
            Some(lexeme) if lexeme.token == token => {
                if let Some(name) = token.name() {
                    let source = self.source;
                    let span = lexeme.span.clone();
                    out.push(ParseNode::new(name, &source[span.clone()], span, Vec::new()));
                }
                Some(pos + 1)
            }
            _ => {
                self.expect(pos, token.describe());
                None
            }
        }
    }

    fn expect(&mut self, pos: usize, what: &'static str) {
        if pos > self.furthest {
            self.furthest = pos;
            self.expected.clear();
        }
        if pos == self.furthest && !self.expected.contains(&what) {
            self.expected.push(what);
        }
    }

    fn syntax_error(&self) -> MatchError {
        let found = match self.tokens.get(self.furthest) {
            Some(lexeme) => format!("{:?}", &self.source[lexeme.span.clone()]),
            None => END_OF_INPUT.to_string(),
        };
        MatchError::Syntax {
            offset: self.offset_at(self.furthest),
            expected: self.expected.iter().map(|s| s.to_string()).collect(),
            found,
        }
    }

    /// Byte offset of token `pos`, or the end of the source past the last token
    fn offset_at(&self, pos: usize) -> usize {
        self.tokens
            .get(pos)
            .map_or(self.source.len(), |lexeme| lexeme.span.start)
    }

    /// Byte range covered by tokens `start..end`
    fn span_between(&self, start: usize, end: usize) -> std::ops::Range<usize> {
        if end > start {
            self.tokens[start].span.start..self.tokens[end - 1].span.end
        } else {
            let at = self.offset_at(start);
            at..at
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::tests::{lex, list_grammar, Tok};

    #[test]
    fn test_nested_lists() {
        let source = "(a (b) c)";
        let tokens = lex(source);
        let grammar = list_grammar();
        let tree = grammar.parse("List", source, &tokens).unwrap();

        assert_eq!(tree.rule(), "List");
        assert_eq!(tree.text(), source);
        assert_eq!(tree.span(), 0..9);

        let items: Vec<_> = tree.children().iter().map(|c| c.rule()).collect();
        assert_eq!(items, ["Item", "Item", "Item"]);

        let nested = &tree.children()[1].children()[0];
        assert_eq!(nested.rule(), "List");
        assert_eq!(nested.text(), "(b)");
        assert_eq!(tree.count("Atom"), 3);
    }

    #[test]
    fn test_punctuation_is_not_kept() {
        let source = "()";
        let tokens = lex(source);
        let grammar = list_grammar();
        let tree = grammar.parse("List", source, &tokens).unwrap();
        assert!(tree.children().is_empty());
    }

    #[test]
    fn test_unclosed_list_reports_expected_tokens() {
        let source = "(a";
        let tokens = lex(source);
        let grammar = list_grammar();
        let err = grammar.parse("List", source, &tokens).unwrap_err();

        assert_eq!(
            err,
            MatchError::Syntax {
                offset: 2,
                expected: vec!["'('".to_string(), "atom".to_string(), "')'".to_string()],
                found: "end of input".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "expected '(' or atom or ')' but found end of input"
        );
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        let source = "(a) b";
        let tokens = lex(source);
        let grammar = list_grammar();
        let err = grammar.parse("List", source, &tokens).unwrap_err();

        assert_eq!(
            err,
            MatchError::Syntax {
                offset: 4,
                expected: vec!["end of input".to_string()],
                found: "\"b\"".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let grammar = list_grammar();
        let err = grammar.parse("List", "", &[]).unwrap_err();
        assert_eq!(err.offset(), Some(0));
        assert!(err.to_string().ends_with("but found end of input"));
    }

    #[test]
    fn test_depth_limit() {
        let source = "((((a))))";
        let tokens = lex(source);
        let grammar = list_grammar().with_max_depth(4);
        let err = grammar.parse("List", source, &tokens).unwrap_err();
        assert!(matches!(err, MatchError::TooDeep { limit: 4, .. }));

        let grammar = list_grammar().with_max_depth(64);
        assert!(grammar.parse("List", source, &tokens).is_ok());
    }

    #[test]
    fn test_unknown_entry_rule() {
        let grammar = list_grammar();
        assert_eq!(
            grammar.parse("Nope", "", &[]),
            Err(MatchError::UnknownRule("Nope".to_string()))
        );
    }

    #[test]
    fn test_optional_and_separated() {
        let grammar: Grammar<Tok> = Grammar::new().rule(
            "Atoms",
            Pattern::seq(vec![
                Pattern::token(Tok::Open),
                Pattern::separated(Pattern::token(Tok::Atom), Tok::Close),
                Pattern::optional(Pattern::token(Tok::Open)),
            ]),
        );
        // "(" then atoms separated by ")" then an optional "("
        let source = "(a)b)c(";
        let tokens = lex(source);
        let tree = grammar.parse("Atoms", source, &tokens).unwrap();
        assert_eq!(tree.count("Atom"), 3);

        let source = "(";
        let tokens = lex(source);
        let tree = grammar.parse("Atoms", source, &tokens).unwrap();
        assert!(tree.children().is_empty());
    }
}
