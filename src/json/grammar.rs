//! The JSON grammar
//!
//! ```text
//! Object = "{" [ Pair { "," Pair } ] "}"
//! Pair   = ( String | SimpleString ) ":" Value
//! Array  = "[" [ Value { "," Value } ] "]"
//! Value  = Object | Array | String | Float | Int | Boolean | Null
//! ```
//!
//! With unquoted keys disabled, `Pair` only accepts a `String` key.

use crate::grammar::{Grammar, Pattern};

use super::token::JsonToken;

pub const OBJECT: &str = "Object";
pub const PAIR: &str = "Pair";
pub const ARRAY: &str = "Array";
pub const VALUE: &str = "Value";

pub const STRING: &str = "String";
pub const SIMPLE_STRING: &str = "SimpleString";
pub const FLOAT: &str = "Float";
pub const INT: &str = "Int";
pub const BOOLEAN: &str = "Boolean";
pub const NULL: &str = "Null";

pub fn json_grammar(unquoted_keys: bool) -> Grammar<JsonToken> {
    let key = if unquoted_keys {
        Pattern::choice(vec![
            Pattern::token(JsonToken::String),
            Pattern::token(JsonToken::SimpleString),
        ])
    } else {
        Pattern::token(JsonToken::String)
    };

    Grammar::new()
        .rule(
            OBJECT,
            Pattern::seq(vec![
                Pattern::token(JsonToken::OpenBrace),
                Pattern::separated(Pattern::rule(PAIR), JsonToken::Comma),
                Pattern::token(JsonToken::CloseBrace),
            ]),
        )
        .rule(
            PAIR,
            Pattern::seq(vec![
                key,
                Pattern::token(JsonToken::Colon),
                Pattern::rule(VALUE),
            ]),
        )
        .rule(
            ARRAY,
            Pattern::seq(vec![
                Pattern::token(JsonToken::OpenBracket),
                Pattern::separated(Pattern::rule(VALUE), JsonToken::Comma),
                Pattern::token(JsonToken::CloseBracket),
            ]),
        )
        .rule(
            VALUE,
            Pattern::choice(vec![
                Pattern::rule(OBJECT),
                Pattern::rule(ARRAY),
                Pattern::token(JsonToken::String),
                Pattern::token(JsonToken::Float),
                Pattern::token(JsonToken::Int),
                Pattern::token(JsonToken::Boolean),
                Pattern::token(JsonToken::Null),
            ]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::token::lex;

    #[test]
    fn test_grammar_is_closed() {
        assert_eq!(json_grammar(true).validate(), Ok(()));
        assert_eq!(json_grammar(false).validate(), Ok(()));
    }

    #[test]
    fn test_rendered_grammar() {
        let expected = "\
Object = '{' [ Pair { ',' Pair } ] '}'
Pair   = ( string | identifier ) ':' Value
Array  = '[' [ Value { ',' Value } ] ']'
Value  = Object | Array | string | float | integer | boolean | null
";
        assert_eq!(json_grammar(true).to_string(), expected);
    }

    #[test]
    fn test_pair_tree_shape() {
        let source = r#"{a: [1, 2.5]}"#;
        let tokens = lex(source).unwrap();
        let grammar = json_grammar(true);
        let tree = grammar.parse(OBJECT, source, &tokens).unwrap();

        let pair = &tree.children()[0];
        assert_eq!(pair.rule(), PAIR);
        let rules: Vec<_> = pair.children().iter().map(|c| c.rule()).collect();
        assert_eq!(rules, [SIMPLE_STRING, VALUE]);

        let array = &pair.children()[1].children()[0];
        assert_eq!(array.rule(), ARRAY);
        assert_eq!(array.text(), "[1, 2.5]");
        assert_eq!(array.count(INT), 1);
        assert_eq!(array.count(FLOAT), 1);
    }

    #[test]
    fn test_quoted_keys_only() {
        let source = "{a: 1}";
        let tokens = lex(source).unwrap();
        let grammar = json_grammar(false);
        assert!(grammar.parse(OBJECT, source, &tokens).is_err());
    }
}
