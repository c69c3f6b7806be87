//! Test utilities for the document store suite
//!
//! Provides builders for documents and values, tracing setup, and proptest
//! strategies.

pub use ctxdoc::*;
use proptest::prelude::*;

// =============================================================================
// Setup
// =============================================================================

/// Route `tracing` output to the test harness (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Builders
// =============================================================================

/// Build a value from a JSON literal
pub fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Build a document from a JSON object literal
pub fn doc(json: serde_json::Value) -> Document {
    match Value::from(json) {
        Value::Object(d) => d,
        other => panic!("expected a JSON object, got {}", other.type_name()),
    }
}

/// Build an array from a JSON array literal
pub fn list(json: serde_json::Value) -> Vec<Value> {
    match Value::from(json) {
        Value::Array(items) => items,
        other => panic!("expected a JSON array, got {}", other.type_name()),
    }
}

// =============================================================================
// Assertions
// =============================================================================

/// Assert a strict read resolves to `expected`
pub fn assert_path(doc: &Document, path: &str, expected: serde_json::Value) {
    let actual = doc
        .get(path)
        .unwrap_or_else(|e| panic!("get({}) failed: {}", path, e));
    assert_eq!(actual, Some(&value(expected)), "at path {}", path);
}

/// Assert a strict read fails with an addressing error and a lenient one is absent
pub fn assert_unaddressable(doc: &Document, path: &str) {
    match doc.get(path) {
        Err(e) => assert!(e.is_addressing(), "unexpected error at {}: {}", path, e),
        Ok(v) => panic!("expected addressing error at {}, got {:?}", path, v),
    }
    assert_eq!(doc.find(path), None);
    assert!(!doc.contains(path));
}

// =============================================================================
// Strategies
// =============================================================================

/// Plain keys: no separators, never reserved
pub fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}".prop_filter("reserved key", |k| !RESERVED_KEYS.contains(&k.as_str()))
}

/// Literal map keys, including ones that read as compound paths
pub fn arb_literal_key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_key(),
        1 => (arb_key(), arb_key()).prop_map(|(a, b)| format!("{}.{}", a, b)),
        1 => (arb_key(), 0usize..4).prop_map(|(a, i)| format!("{}[{}]", a, i)),
        1 => (arb_key(), arb_key()).prop_map(|(a, k)| format!("{}['{}']", a, k)),
    ]
    .prop_filter("reserved key", |k| !RESERVED_KEYS.contains(&k.as_str()))
}

/// Leaf values that survive a text round trip
pub fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-10_000i32..10_000).prop_map(|n| Value::Float(f64::from(n) + 0.25)),
        "[ -~]{0,12}".prop_map(Value::String),
    ]
}

/// Nested values without bytes
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec((arb_literal_key(), inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Documents built from literal keys, some of them dotted or bracketed
pub fn arb_document() -> impl Strategy<Value = Document> {
    prop::collection::vec((arb_literal_key(), arb_value()), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

/// Path expressions mixing keys and small indexes
pub fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec((arb_key(), prop::option::of(0usize..4)), 1..5).prop_map(|segments| {
        segments
            .into_iter()
            .map(|(name, index)| match index {
                Some(i) => format!("{}[{}]", name, i),
                None => name,
            })
            .collect::<Vec<_>>()
            .join(".")
    })
}
