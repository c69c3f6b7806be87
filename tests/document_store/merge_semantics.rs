//! Merge Semantics
//!
//! Overwrite replaces scalars and appends list tails by index; add-new-only
//! keeps every existing value and appends only list elements not already
//! present. Maps always gain new keys under either policy.

use crate::test_utils::*;
use serde_json::json;

#[test]
fn test_merge_overwrite() {
    let mut dest = doc(json!({"x": 1, "y": {"p": 1}}));
    dest.merge(&doc(json!({"x": 2, "y": {"q": 2}})));
    assert_eq!(dest, doc(json!({"x": 2, "y": {"p": 1, "q": 2}})));
}

#[test]
fn test_merge_add_new_only() {
    let mut dest = doc(json!({"x": 1, "y": {"p": 1}}));
    dest.merge_with(&doc(json!({"x": 2, "y": {"q": 2}})), MergePolicy::AddNewOnly);
    assert_eq!(dest, doc(json!({"x": 1, "y": {"p": 1, "q": 2}})));
}

#[test]
fn test_list_merge_overwrite() {
    let mut dest = list(json!([1, 2]));
    merge_list(&mut dest, &list(json!([9, 9, 9])), MergePolicy::Overwrite);
    assert_eq!(dest, list(json!([9, 9, 9])));
}

#[test]
fn test_list_merge_add_new_only() {
    let mut dest = list(json!([1, 2]));
    merge_list(&mut dest, &list(json!([2, 3])), MergePolicy::AddNewOnly);
    assert_eq!(dest, list(json!([1, 2, 3])));
}

#[test]
fn test_tail_policies_differ() {
    // Same inputs, different tails: overwrite is index-aligned, add-new-only
    // is containment based
    let src = list(json!([5, 1, 7]));

    let mut overwrite = list(json!([1]));
    merge_list(&mut overwrite, &src, MergePolicy::Overwrite);
    assert_eq!(overwrite, list(json!([5, 1, 7])));

    let mut add_new = list(json!([1]));
    merge_list(&mut add_new, &src, MergePolicy::AddNewOnly);
    assert_eq!(add_new, list(json!([1, 5, 7])));
}

#[test]
fn test_nested_lists_inside_maps() {
    let mut dest = doc(json!({"steps": [{"name": "a"}, {"name": "b"}]}));
    dest.merge(&doc(json!({"steps": [{"ok": true}]})));
    assert_eq!(
        dest,
        doc(json!({"steps": [{"name": "a", "ok": true}, {"name": "b"}]}))
    );
}

#[test]
fn test_type_mismatch_follows_policy() {
    let src = doc(json!({"a": [1], "b": {"k": 1}, "c": 3}));

    let mut keep = doc(json!({"a": "x", "b": [1], "c": {"k": 0}}));
    keep.put_if_absent(&src);
    assert_eq!(keep, doc(json!({"a": "x", "b": [1], "c": {"k": 0}})));

    let mut replace = doc(json!({"a": "x", "b": [1], "c": {"k": 0}}));
    replace.merge(&src);
    assert_eq!(replace, src);
}

#[test]
fn test_adopted_branch_is_exploded() {
    init_tracing();
    let mut dest = doc(json!({"existing": 1}));
    dest.merge(&doc(json!({"call": {"req.method": "GET", "req.headers['Accept']": "*/*"}})));

    assert_path(&dest, "call.req.method", json!("GET"));
    assert_path(&dest, "call.req.headers.Accept", json!("*/*"));
}

#[test]
fn test_adopted_list_elements_are_exploded() {
    let mut dest = Document::new();
    dest.merge(&doc(json!({"items": [{"a.b": 1}]})));
    assert_path(&dest, "items[0].a.b", json!(1));
}

#[test]
fn test_merge_is_deep_copy() {
    let src = doc(json!({"n": {"v": 1}}));
    let mut dest = Document::new();
    dest.merge(&src);
    dest.put("n.v", 2).unwrap();
    assert_path(&src, "n.v", json!(1));
}

#[test]
fn test_merge_idempotent_on_self() {
    let original = doc(json!({"a": [1, [2, 3], {"b": null}], "c": {"d": "e"}}));
    let mut d = original.clone();
    d.merge(&original);
    assert_eq!(d, original);
    d.put_if_absent(&original);
    assert_eq!(d, original);
}

#[test]
fn test_merge_keeps_destination_order() {
    let mut dest = doc(json!({"b": 1}));
    dest.insert("a", 1);
    dest.merge(&doc(json!({"c": 1, "a": 2})));
    assert_eq!(dest.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
}
