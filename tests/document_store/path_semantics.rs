//! Path Semantics
//!
//! Strict reads report addressing failures, lenient reads turn them into
//! absence, and writes create whatever containers are missing but never
//! coerce a scalar into a container.

use crate::test_utils::*;
use serde_json::json;

// =============================================================================
// Auto-vivification
// =============================================================================

#[test]
fn test_put_vivifies_objects_arrays_and_padding() {
    init_tracing();
    let mut d = Document::new();
    d.put("a.b[2].c", 5).unwrap();

    assert_eq!(d, doc(json!({"a": {"b": [null, null, {"c": 5}]}})));
    assert_path(&d, "a.b[2].c", json!(5));
}

#[test]
fn test_put_extends_existing_array() {
    let mut d = doc(json!({"list": [{"id": 0}]}));
    d.put("list[1].id", 1).unwrap();
    d.put("list[3].id", 3).unwrap();
    assert_eq!(
        d.get_key("list").unwrap(),
        &value(json!([{"id": 0}, {"id": 1}, null, {"id": 3}]))
    );
}

#[test]
fn test_put_into_existing_array_element() {
    let mut d = doc(json!({"list": [{"id": 0}]}));
    d.put("list[0].name", "first").unwrap();
    assert_path(&d, "list[0]", json!({"id": 0, "name": "first"}));
}

#[test]
fn test_put_over_padded_null_element() {
    let mut d = Document::new();
    d.put("list[2]", "x").unwrap();
    // A padded null is vivified like an absent slot
    d.put("list[0].k", 1).unwrap();
    assert_path(&d, "list", json!([{"k": 1}, null, "x"]));
}

#[test]
fn test_map_key_segments() {
    let mut d = Document::new();
    d.put("headers[\"Content-Type\"]", "text/plain").unwrap();
    d.put("headers['X-Trace-Id']", "abc").unwrap();

    let headers = d.get_key("headers").unwrap().as_document().unwrap();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get_key("X-Trace-Id"), Some(&Value::from("abc")));
    assert_path(&d, "headers[\"Content-Type\"]", json!("text/plain"));
    assert_path(&d, "headers['Content-Type']", json!("text/plain"));
}

#[test]
fn test_dot_always_splits() {
    let mut d = Document::new();
    // Quotes do not protect a dot: this is two segments
    d.put("m['a.b']", 1).unwrap();
    assert!(d.get_key("m").is_none());
    let outer = d.get_key("m['a").unwrap().as_document().unwrap();
    assert_eq!(outer.get_key("b']"), Some(&Value::Int(1)));
}

#[test]
fn test_whitespace_inside_brackets() {
    let mut d = Document::new();
    d.put("list[ 1 ]", true).unwrap();
    d.put("m[ 'k' ]", false).unwrap();
    assert_path(&d, "list[1]", json!(true));
    assert_path(&d, "m.k", json!(false));
}

#[test]
fn test_unrecognised_brackets_are_literal_keys() {
    let mut d = Document::new();
    d.put("weird[abc]", 1).unwrap();
    d.put("mixed[\"a']", 2).unwrap();
    assert!(d.contains_key("weird[abc]"));
    assert!(d.contains_key("mixed[\"a']"));
    assert_path(&d, "weird[abc]", json!(1));
}

#[test]
fn test_put_returns_previous_value() {
    let mut d = Document::new();
    assert_eq!(d.put("a.b", 1).unwrap(), None);
    assert_eq!(d.put("a.b", 2).unwrap(), Some(Value::Int(1)));
    assert_eq!(d.put("list[0]", "x").unwrap(), None);
    assert_eq!(d.put("list[0]", "y").unwrap(), Some(Value::from("x")));
    assert_eq!(d.put("m['k']", 1).unwrap(), None);
    assert_eq!(d.put("m['k']", 2).unwrap(), Some(Value::Int(1)));
}

// =============================================================================
// Addressing errors
// =============================================================================

#[test]
fn test_scalar_in_path_is_addressing_error() {
    let d = doc(json!({"a": {"b": "scalar"}}));
    assert_unaddressable(&d, "a.b.c");
}

#[test]
fn test_read_index_out_of_range() {
    let d = doc(json!({"list": [1, 2]}));
    assert_path(&d, "list[1]", json!(2));
    assert_unaddressable(&d, "list[2]");
}

#[test]
fn test_index_into_non_array() {
    let d = doc(json!({"obj": {"k": 1}, "s": "text"}));
    assert_unaddressable(&d, "obj[0]");
    assert_unaddressable(&d, "s[0]");
}

#[test]
fn test_missing_terminal_is_absent_in_both_modes() {
    let d = doc(json!({"a": {}}));
    assert_eq!(d.get("a.missing").unwrap(), None);
    assert_eq!(d.get_with("a.missing", Traversal::Lenient).unwrap(), None);
    assert!(!d.contains("a.missing"));
}

#[test]
fn test_missing_intermediate_strict_vs_lenient() {
    let d = doc(json!({"a": {}}));
    assert!(d.get("a.b.c").unwrap_err().is_addressing());
    assert_eq!(d.get_with("a.b.c", Traversal::Lenient).unwrap(), None);
}

#[test]
fn test_error_names_failing_segment() {
    let d = doc(json!({"a": {"b": 7}}));
    match d.get("a.b.c") {
        Err(Error::Addressing { path, segment, .. }) => {
            assert_eq!(path, "a.b.c");
            assert_eq!(segment, "b");
        }
        other => panic!("expected addressing error, got {:?}", other),
    }
}

#[test]
fn test_write_through_scalar_fails_without_coercion() {
    let mut d = doc(json!({"a": 1, "list": [1]}));
    assert!(d.put("a.b", 2).unwrap_err().is_addressing());
    assert!(d.put("list[0].k", 2).unwrap_err().is_addressing());
    assert!(d.put("a[0]", 2).unwrap_err().is_addressing());
    assert!(d.put("a['k']", 2).unwrap_err().is_addressing());
    assert_eq!(d, doc(json!({"a": 1, "list": [1]})));
}

#[test]
fn test_contains_is_false_for_null() {
    let mut d = Document::new();
    d.put("list[3]", 1).unwrap();
    assert!(d.contains("list[3]"));
    assert!(!d.contains("list[0]"));
    assert_path(&d, "list[0]", json!(null));
}

// =============================================================================
// Limits and strict parsing
// =============================================================================

#[test]
fn test_limits_reject_before_mutation() {
    let mut d = Document::with_limits(Limits::with_small_limits());
    assert!(matches!(
        d.put("list[101]", 1),
        Err(Error::Limit(LimitError::IndexTooLarge { index: 101, .. }))
    ));
    assert!(d.is_empty());

    let mut deep = Value::Int(0);
    for _ in 0..5 {
        deep = Value::Array(vec![deep]);
    }
    assert!(matches!(
        d.put("deep", deep),
        Err(Error::Limit(LimitError::NestingTooDeep { .. }))
    ));
}

#[test]
fn test_strict_parse_rejects_what_lenient_accepts() {
    assert!(Path::parse_strict("a..b").is_err());
    assert!(Path::parse_strict("a[x]").is_err());
    assert_eq!(Path::parse("a[x]").segments(), &[PathSegment::Key("a[x]".into())]);

    let parsed = Path::parse_strict("a.b[2].c['k']").unwrap();
    assert_eq!(parsed.to_string(), "a.b[2].c[\"k\"]");
}

#[test]
fn test_remove_path() {
    let mut d = doc(json!({"a": {"list": [1, 2, 3]}}));
    assert_eq!(d.remove_path("a.list[1]"), Some(Value::Int(2)));
    assert_path(&d, "a.list", json!([1, 3]));
    assert_eq!(d.remove_path("a.b.c"), None);
}
