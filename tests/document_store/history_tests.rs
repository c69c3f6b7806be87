//! History Tracking
//!
//! Only top-level `put`/`put_all` on the document that owns the tracker are
//! recorded, and only for plain keys. Compound and bracketed paths write
//! without recording.

use crate::test_utils::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn test_latest_transition_per_key() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.put("k", 1).unwrap();
    d.put("k", 2).unwrap();

    let history = d.history().unwrap();
    assert_eq!(history.len(), 1);
    let entry = history.get("k").unwrap();
    assert_eq!(entry.old, Some(Value::Int(1)));
    assert_eq!(entry.new, Value::Int(2));
}

#[test]
fn test_first_write_has_no_old_value() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.put("a", "x").unwrap();
    assert_eq!(d.history().unwrap().get("a").unwrap().old, None);
}

#[test]
fn test_put_all_records_each_key() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.put_all(vec![("a", 1), ("b.c", 2), ("l[0]", 3), ("m['k']", 4), ("z", 5)]).unwrap();
    let keys: Vec<&str> = d.history().unwrap().entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "z"]);
    assert_path(&d, "b.c", json!(2));
    assert_path(&d, "m.k", json!(4));
}

#[test]
fn test_compound_put_does_not_record() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.put("a.b[1].c", 1).unwrap();
    d.put("m['k']", 2).unwrap();
    assert!(d.history().unwrap().is_empty());

    // A later top-level write to the vivified root does record
    d.put("a", 3).unwrap();
    let entry = d.history().unwrap().get("a").unwrap();
    assert_eq!(entry.new, Value::Int(3));
    assert!(entry.old.is_some());
}

#[test]
fn test_only_root_records() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.put("outer", doc(json!({"inner": 1}))).unwrap();

    let outer = d.get_key_mut("outer").unwrap().as_document_mut().unwrap();
    assert!(outer.history().is_none());
    outer.put("direct", 2).unwrap();

    let history = d.history().unwrap();
    assert_eq!(history.len(), 1);
    assert!(history.get("outer.direct").is_none());
}

#[test]
fn test_merge_raw_insert_and_parse_paths() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.merge(&doc(json!({"merged": 1})));
    d.insert("raw", 1);
    assert!(d.history().unwrap().is_empty());

    d.from_text(r#"{"parsed_in": 1}"#).unwrap();
    assert!(d.history().unwrap().get("parsed_in").is_some());
}

#[test]
fn test_failed_put_not_recorded() {
    let mut d = Document::with_history(HistoryPolicy::unbounded());
    d.put("s", "scalar").unwrap();
    assert!(d.put("s.x", 1).is_err());
    assert_eq!(d.history().unwrap().len(), 1);
}

#[test]
fn test_capacity_bounds_history_not_data() {
    let mut d = Document::with_history(HistoryPolicy::unbounded().with_max_entries(2));
    for key in ["a", "b", "c"] {
        d.put(key, 1).unwrap();
    }
    let history = d.history().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.get("a").is_none());
    // Live data is untouched by eviction
    assert_path(&d, "a", json!(1));
}

#[test]
fn test_ttl_expiry() {
    let policy = HistoryPolicy::unbounded().with_ttl(Duration::from_millis(100));
    let mut tracker = HistoryTracker::new(policy);
    let t0 = Timestamp::from_millis(1_000);
    tracker.record_at("k", None, Value::Int(1), t0);

    assert!(tracker.get_at("k", Timestamp::from_millis(1_100)).is_some());
    assert!(tracker.get_at("k", Timestamp::from_millis(1_101)).is_none());
    assert_eq!(tracker.evict_expired(Timestamp::from_millis(1_200)), 1);
}

#[test]
fn test_history_from_config() {
    let config = CtxConfig::from_toml_str("[history]\nenabled = true\nmax_entries = 1\n").unwrap();
    let mut d = Document::with_config(&config);
    d.put("a", 1).unwrap();
    d.put("b", 1).unwrap();
    let history = d.history().unwrap();
    assert_eq!(history.policy().max_entries, Some(1));
    assert!(history.get("b").is_some());
    assert!(history.get("a").is_none());
}
