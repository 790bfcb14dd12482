use agent_toon::loads;
use serde_json::{json, Value};

/// Helper: decode and wrap the mapping for comparison against `json!`.
fn decoded(toon: &str) -> Value {
    Value::Object(loads(toon))
}

fn assert_decodes(toon: &str, expected: Value) {
    let actual = decoded(toon);
    assert_eq!(
        actual, expected,
        "Decode mismatch:\n  input:    {toon:?}\n  actual:   {actual}\n  expected: {expected}"
    );
}

// ============================================================================
// Empty input
// ============================================================================

#[test]
fn decode_empty_string() {
    assert_decodes("", json!({}));
}

#[test]
fn decode_whitespace_only() {
    assert_decodes("   \n\n", json!({}));
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn decode_scalar_types() {
    assert_decodes(
        "a: 1\nb: 2.5\nc: true\nd: false\ne: hello",
        json!({"a": 1, "b": 2.5, "c": true, "d": false, "e": "hello"}),
    );
}

#[test]
fn decode_booleans_case_insensitive() {
    assert_decodes("x: TRUE\ny: False", json!({"x": true, "y": false}));
}

#[test]
fn decode_negative_integer() {
    assert_decodes("delta: -7", json!({"delta": -7}));
}

#[test]
fn decode_dotted_non_number_stays_string() {
    assert_decodes("version: 1.2.3", json!({"version": "1.2.3"}));
}

#[test]
fn decode_exponent_without_dot_stays_string() {
    assert_decodes("x: 1e5", json!({"x": "1e5"}));
}

#[test]
fn decode_u64_beyond_i64() {
    assert_decodes(
        "big: 18446744073709551615",
        json!({"big": u64::MAX}),
    );
}

#[test]
fn decode_integer_overflow_stays_string() {
    assert_decodes(
        "huge: 18446744073709551616",
        json!({"huge": "18446744073709551616"}),
    );
}

#[test]
fn decode_splits_on_first_colon_only() {
    assert_decodes(
        "url: http://example.io:8080/path",
        json!({"url": "http://example.io:8080/path"}),
    );
}

#[test]
fn decode_quoted_values_are_strings() {
    assert_decodes(
        r##"code: "42"
flag: "true"
empty: ""
escaped: "say \"hi\"""##,
        json!({"code": "42", "flag": "true", "empty": "", "escaped": "say \"hi\""}),
    );
}

#[test]
fn decode_prose_with_quoted_words_is_kept_verbatim() {
    assert_decodes(
        r#"quote: "Fast" is better than "cheap""#,
        json!({"quote": r#""Fast" is better than "cheap""#}),
    );
}

#[test]
fn decode_value_with_inner_spaces_is_trimmed() {
    assert_decodes("title:    Habit tracker   ", json!({"title": "Habit tracker"}));
}

// ============================================================================
// Nested mappings
// ============================================================================

#[test]
fn decode_nested_mapping() {
    assert_decodes(
        "launch:\n  quarter: 3\n  confirmed: false",
        json!({"launch": {"quarter": 3, "confirmed": false}}),
    );
}

#[test]
fn decode_sibling_after_nested_block_attaches_to_root() {
    assert_decodes(
        "outer:\n  inner: 1\nsibling: 2",
        json!({"outer": {"inner": 1}, "sibling": 2}),
    );
}

#[test]
fn decode_multiple_levels_close_at_once() {
    assert_decodes(
        "a:\n  b:\n    c:\n      d: 1\ne: 2",
        json!({"a": {"b": {"c": {"d": 1}}}, "e": 2}),
    );
}

#[test]
fn decode_irregular_indentation() {
    // Children only need to be deeper than their parent.
    assert_decodes(
        "a:\n     b: 1\n     c: 2\nd: 3",
        json!({"a": {"b": 1, "c": 2}, "d": 3}),
    );
}

#[test]
fn decode_bare_key_without_children_is_empty_mapping() {
    assert_decodes("meta:", json!({"meta": {}}));
    assert_decodes("meta:\nnext: 1", json!({"meta": {}, "next": 1}));
}

#[test]
fn decode_indented_first_line() {
    assert_decodes("  a: 1\n  b: 2", json!({"a": 1, "b": 2}));
}

#[test]
fn decode_crlf_line_endings() {
    assert_decodes("a: 1\r\nb:\r\n  c: x\r\n", json!({"a": 1, "b": {"c": "x"}}));
}

#[test]
fn decode_duplicate_key_overwrites_in_place() {
    let doc = loads("a: 1\nb: 2\na: 3");
    let keys: Vec<&String> = doc.keys().collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(doc["a"], 3);
}

// ============================================================================
// Scalar lists
// ============================================================================

#[test]
fn decode_scalar_list() {
    assert_decodes("tags:\n  - red\n  - green", json!({"tags": ["red", "green"]}));
}

#[test]
fn decode_scalar_list_items_are_coerced() {
    assert_decodes(
        "values:\n  - 1\n  - 2.5\n  - true\n  - plain text",
        json!({"values": [1, 2.5, true, "plain text"]}),
    );
}

#[test]
fn decode_empty_list_literal() {
    assert_decodes("items: []", json!({"items": []}));
}

#[test]
fn decode_nested_lists_and_siblings() {
    assert_decodes(
        "analysis:\n  tech_stack:\n    frontend:\n      - Item 1\n    backend:\n      - Item 2",
        json!({"analysis": {"tech_stack": {"frontend": ["Item 1"], "backend": ["Item 2"]}}}),
    );
}

#[test]
fn decode_list_item_with_colon_is_a_string() {
    assert_decodes(
        "steps:\n  - note: keep this\n  - done",
        json!({"steps": ["note: keep this", "done"]}),
    );
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn decode_pipe_table() {
    assert_decodes(
        "items:\n  name | score\n  Alpha | 10\n  Beta | 20",
        json!({"items": [
            {"name": "Alpha", "score": 10},
            {"name": "Beta", "score": 20}
        ]}),
    );
}

#[test]
fn decode_comma_table() {
    assert_decodes(
        "items:\n  name, score, active\n  Alpha, 1.5, true",
        json!({"items": [{"name": "Alpha", "score": 1.5, "active": true}]}),
    );
}

#[test]
fn decode_comma_table_keeps_pipes_in_values() {
    // No `|` in the header, so `|` inside a row is plain text.
    assert_decodes(
        "rows:\n  name, note\n  A, x|y",
        json!({"rows": [{"name": "A", "note": "x|y"}]}),
    );
}

#[test]
fn decode_quoted_cell_may_contain_delimiter() {
    assert_decodes(
        "rows:\n  name | note\n  A | \"x | y\"",
        json!({"rows": [{"name": "A", "note": "x | y"}]}),
    );
}

#[test]
fn decode_table_followed_by_root_sibling() {
    assert_decodes(
        "items:\n  a | b\n  1 | 2\nnext: ok",
        json!({"items": [{"a": 1, "b": 2}], "next": "ok"}),
    );
}

#[test]
fn decode_table_inside_mapping_closed_by_sibling_key() {
    assert_decodes(
        "analysis:\n  tech_stack:\n    frontend:\n      - Item 1\n      - Item 2\n  technical_challenges:\n    title | severity\n    Sync | High\n  owner: Dana",
        json!({"analysis": {
            "tech_stack": {"frontend": ["Item 1", "Item 2"]},
            "technical_challenges": [{"title": "Sync", "severity": "High"}],
            "owner": "Dana"
        }}),
    );
}

#[test]
fn decode_blank_lines_do_not_close_table() {
    assert_decodes(
        "items:\n  a | b\n\n  1 | 2\n     \n  3 | 4",
        json!({"items": [{"a": 1, "b": 2}, {"a": 3, "b": 4}]}),
    );
}

#[test]
fn decode_short_row_omits_missing_fields() {
    assert_decodes(
        "items:\n  a | b | c\n  1 | 2",
        json!({"items": [{"a": 1, "b": 2}]}),
    );
}

#[test]
fn decode_long_row_drops_extra_fields() {
    assert_decodes(
        "items:\n  a | b\n  1 | 2 | 3 | 4",
        json!({"items": [{"a": 1, "b": 2}]}),
    );
}

#[test]
fn decode_table_with_header_only_is_empty_list() {
    assert_decodes("items:\n  a | b", json!({"items": []}));
}

#[test]
fn decode_each_table_detects_its_own_delimiter() {
    assert_decodes(
        "first:\n  a | b\n  1 | 2\nsecond:\n  a, b\n  3, 4",
        json!({
            "first": [{"a": 1, "b": 2}],
            "second": [{"a": 3, "b": 4}]
        }),
    );
}

// ============================================================================
// Tolerance
// ============================================================================

#[test]
fn decode_ignores_prose_lines() {
    assert_decodes(
        "Here is the result\nkey: value\nThanks",
        json!({"key": "value"}),
    );
}

#[test]
fn decode_ignores_list_item_at_root() {
    assert_decodes("- stray\nkey: 1", json!({"key": 1}));
}

#[test]
fn decode_ignores_list_item_in_populated_mapping() {
    assert_decodes("meta:\n  a: 1\n  - stray", json!({"meta": {"a": 1}}));
}

#[test]
fn decode_ignores_key_inside_scalar_list() {
    assert_decodes("tags:\n  - a\n  b: 1\nnext: 2", json!({"tags": ["a"], "next": 2}));
}

#[test]
fn decode_is_idempotent() {
    let text = "a: 1\nitems:\n  x | y\n  1 | two\ntags:\n  - p\n  - q\nnested:\n  k: v";
    assert_eq!(loads(text), loads(text));
}

#[test]
fn decode_very_deep_nesting_does_not_panic() {
    let text: String = (0..500)
        .map(|depth| format!("{}k{depth}:\n", " ".repeat(depth)))
        .collect();
    let doc = loads(&text);
    assert!(doc.contains_key("k0"));
}

#[test]
fn decode_lines_below_depth_cap_are_skipped() {
    let mut text: String = (0..130)
        .map(|depth| format!("{}k{depth}:\n", " ".repeat(depth)))
        .collect();
    text.push_str(&format!("{}leaf: 1\n", " ".repeat(130)));
    text.push_str("after: 2\n");
    let doc = decoded(&text);

    let mut node = &doc["k0"];
    for depth in 1..=127 {
        node = &node[format!("k{depth}")];
    }
    assert_eq!(node, &json!({"k128": {}}));
    assert_eq!(doc["after"], 2);
}
