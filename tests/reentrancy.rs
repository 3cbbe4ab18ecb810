//! Nested invocations of the same rule must not share accumulation state

use jsonfold::config::ParserConfig;
use jsonfold::json::grammar::{ARRAY, OBJECT, PAIR, VALUE};
use jsonfold::testing::assert_node;
use jsonfold::{JsonParser, Node};

fn parser_for(entry: &str) -> JsonParser {
    let config = ParserConfig {
        entry_rule: entry.to_string(),
        ..ParserConfig::default()
    };
    JsonParser::with_config(&config).unwrap()
}

/// Depth of the chain of first children, counting `node`
fn nesting(node: &Node) -> usize {
    match node.get(0) {
        Ok(child) => 1 + nesting(child),
        Err(_) => 1,
    }
}

#[test]
fn test_five_nested_empty_arrays() {
    let mut parser = parser_for(ARRAY);
    let node = parser.parse("[[[[[]]]]]").unwrap();

    assert_eq!(nesting(&node), 5);
    let mut level = &node;
    for _ in 0..4 {
        assert_node(level).array().child_count(1);
        level = level.get(0).unwrap();
    }
    assert_node(level).array().child_count(0);

    assert_eq!(parser.high_water_mark(ARRAY), 5);
    assert_eq!(parser.depth(ARRAY), 0);
}

#[test]
fn test_siblings_after_nested_match_land_in_outer_array() {
    let mut parser = parser_for(ARRAY);
    let node = parser.parse("[1, [2, [3], 4], 5]").unwrap();

    assert_node(&node)
        .child_count(3)
        .child(0, |c| {
            c.number("1");
        })
        .child(1, |c| {
            c.array()
                .child_count(3)
                .child(0, |d| {
                    d.number("2");
                })
                .child(1, |d| {
                    d.array().child_count(1);
                })
                .child(2, |d| {
                    d.number("4");
                });
        })
        .child(2, |c| {
            c.number("5");
        });
}

#[test]
fn test_objects_inside_arrays_inside_objects() {
    let mut parser = parser_for(OBJECT);
    let node = parser
        .parse(r#"{"a": [{"b": [{"c": 1}, {"d": 2}]}], "e": 3}"#)
        .unwrap();

    assert_node(&node).keys(&["a", "e"]).member("a", |a| {
        a.child(0, |inner| {
            inner.keys(&["b"]).member("b", |b| {
                b.child_count(2)
                    .child(0, |c| {
                        c.keys(&["c"]);
                    })
                    .child(1, |d| {
                        d.keys(&["d"]);
                    });
            });
        });
    });

    assert_eq!(parser.high_water_mark(OBJECT), 3);
    assert_eq!(parser.high_water_mark(ARRAY), 2);
    assert_eq!(parser.high_water_mark(PAIR), 3);
    for rule in [OBJECT, PAIR, ARRAY, VALUE] {
        assert_eq!(parser.depth(rule), 0, "{rule} left a slot in use");
    }
}

#[test]
fn test_slot_stack_is_reused_across_documents() {
    let mut parser = parser_for(ARRAY);
    parser.parse("[[[]]]").unwrap();
    assert_eq!(parser.high_water_mark(ARRAY), 3);

    let node = parser.parse("[[], []]").unwrap();
    assert_eq!(node.len(), 2);
    assert_eq!(parser.high_water_mark(ARRAY), 3);

    parser.parse("[[[[]]]]").unwrap();
    assert_eq!(parser.high_water_mark(ARRAY), 4);
}

#[test]
fn test_failed_parse_leaves_no_slot_in_use() {
    let mut parser = parser_for(ARRAY);
    assert!(parser.parse("[[1], [1e999]]").is_err());

    for rule in [ARRAY, VALUE] {
        assert_eq!(parser.depth(rule), 0);
    }

    let node = parser.parse("[[1], [2]]").unwrap();
    assert_node(&node).child(1, |c| {
        c.child(0, |n| {
            n.number("2");
        });
    });
}

#[test]
fn test_pending_key_does_not_leak_between_pairs() {
    let mut parser = parser_for(OBJECT);
    let node = parser.parse(r#"{"outer": {"inner": 1}, "next": 2}"#).unwrap();

    assert_node(&node)
        .keys(&["outer", "next"])
        .member("outer", |o| {
            o.key("outer").keys(&["inner"]);
        })
        .member("next", |n| {
            n.key("next").number("2");
        });
}
