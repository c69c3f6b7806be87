//! Recursive merge of documents and lists
//!
//! Top-level keys of the source are matched literally against the
//! destination. A key the destination lacks is adopted as a deep copy; when
//! the adopted value is an Object, its keys are written through path
//! resolution so `{"a.b": 1}` becomes `{"a": {"b": 1}}`. Values that replace
//! or extend existing destination data are copied as they are.
//!
//! Where both sides hold a value:
//!
//! | dest \ src | Object | Array | other |
//! |------------|--------|-------|-------|
//! | Object | [`merge_map`] | policy | policy |
//! | Array | policy | [`merge_list`] | policy |
//! | other | policy | policy | policy |
//!
//! "policy" means replace under [`MergePolicy::Overwrite`] and keep under
//! [`MergePolicy::AddNewOnly`]. Merge never fails and never records history.

use crate::document::Document;
use crate::path::Path;
use crate::value::Value;
use tracing::warn;

/// Conflict policy for a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Source scalars replace destination scalars; list tails are appended
    #[default]
    Overwrite,
    /// Existing destination values are kept; only absent data is added
    AddNewOnly,
}

/// Merge `src` into `dest`
pub fn merge_map(dest: &mut Document, src: &Document, policy: MergePolicy) {
    for (key, src_value) in src.iter() {
        match dest.get_key_mut(key) {
            Some(dest_value) => merge_value(dest_value, src_value, policy),
            None => {
                dest.insert(key, adopt(src_value));
            }
        }
    }
}

/// Merge `src` into `dest` element-wise
///
/// The overlapping range is merged pairwise. Past it, `Overwrite` appends
/// `src[dest.len()..]`, while `AddNewOnly` scans all of `src` and appends
/// each element not already contained in `dest`.
pub fn merge_list(dest: &mut Vec<Value>, src: &[Value], policy: MergePolicy) {
    let overlap = dest.len().min(src.len());
    for (dest_item, src_item) in dest.iter_mut().zip(src) {
        merge_value(dest_item, src_item, policy);
    }

    match policy {
        MergePolicy::Overwrite => dest.extend_from_slice(&src[overlap..]),
        MergePolicy::AddNewOnly => {
            for item in src {
                // Checked against dest as it grows
                if !dest.contains(item) {
                    dest.push(item.clone());
                }
            }
        }
    }
}

fn merge_value(dest: &mut Value, src: &Value, policy: MergePolicy) {
    match (dest, src) {
        (Value::Object(d), Value::Object(s)) => merge_map(d, s, policy),
        (Value::Array(d), Value::Array(s)) => merge_list(d, s, policy),
        (dest, src) => {
            if policy == MergePolicy::Overwrite {
                *dest = src.clone();
            }
        }
    }
}

/// Deep copy of a value entering a destination
fn adopt(value: &Value) -> Value {
    match value {
        Value::Object(doc) => Value::Object(adopt_document(doc)),
        Value::Array(items) => Value::Array(items.iter().map(adopt).collect()),
        scalar => scalar.clone(),
    }
}

fn adopt_document(src: &Document) -> Document {
    let mut out = Document::with_limits(src.limits());
    for (key, value) in src.iter() {
        let adopted = adopt(value);
        if let Err(err) = out.write(&Path::parse(key), adopted.clone()) {
            warn!(target: "ctxdoc::merge", key, error = %err, "Keeping conflicting key literal");
            out.insert(key, adopted);
        }
    }
    out
}
