//! Path-addressable document
//!
//! A [`Document`] is an ordered string-keyed map of [`Value`] cells. Besides
//! the raw map API (`get_key`, `insert`, `remove`, ...) it resolves
//! [path expressions](crate::path) for reads and writes.
//!
//! ## Reads
//!
//! | Call | Mode | Missing intermediate | Scalar where container needed | Index out of range |
//! |------|------|----------------------|-------------------------------|--------------------|
//! | [`Document::get`] | strict | `Err(Addressing)` | `Err(Addressing)` | `Err(Addressing)` |
//! | [`Document::find`] | lenient | `None` | `None` | `None` |
//! | [`Document::contains`] | lenient | `false` | `false` | `false` |
//!
//! A missing terminal key is `Ok(None)` in both modes. `contains` additionally
//! reports a stored `Null` as absent.
//!
//! ## Writes
//!
//! [`Document::put`] resolves every segment but the last strictly and
//! auto-vivifies what is missing: a missing `name` becomes an Object, a
//! missing array behind `name[i]` becomes an Array padded with `Null` up to
//! `i`, and a missing `name["k"]` object is created. A stored `Null` counts as
//! missing. A scalar where a container is required is an addressing error;
//! containers vivified before the failing segment stay in place.
//!
//! Only the document `put`/`put_all` was called on records history, and only
//! for plain top-level keys. Children vivified along the way never carry a
//! tracker.

use crate::config::CtxConfig;
use crate::error::{Error, Result};
use crate::history::{HistoryPolicy, HistoryTracker};
use crate::limits::Limits;
use crate::merge::{merge_map, MergePolicy};
use crate::path::{Path, PathSegment};
use crate::value::Value;
use rustc_hash::FxHashMap;
use tracing::debug;

/// How a read reacts to addressing failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Report addressing failures as [`Error::Addressing`]
    Strict,
    /// Report addressing failures as absence
    Lenient,
}

impl Traversal {
    fn fail<T>(self, path: &Path, segment: &PathSegment, reason: impl Into<String>) -> Result<Option<T>> {
        match self {
            Traversal::Strict => Err(Error::addressing(
                path.to_string(),
                segment.to_string(),
                reason,
            )),
            Traversal::Lenient => Ok(None),
        }
    }
}

/// Ordered, path-addressable map of values
///
/// # Examples
///
/// ```
/// use ctxdoc_core::{Document, Value};
///
/// let mut doc = Document::new();
/// doc.put("a.b[2].c", 5).unwrap();
///
/// assert_eq!(doc.get("a.b[2].c").unwrap(), Some(&Value::Int(5)));
/// assert_eq!(doc.get("a.b[0]").unwrap(), Some(&Value::Null));
/// assert!(doc.contains("a.b[2]"));
/// assert!(!doc.contains("a.b[0]"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
    /// Key -> position in `entries`
    index: FxHashMap<String, usize>,
    limits: Limits,
    history: Option<HistoryTracker>,
}

impl PartialEq for Document {
    /// Structural equality: same keys and values, order and history ignored
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get_key(k) == Some(v))
    }
}

impl Document {
    /// Create an empty document with default limits and no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with the given limits
    pub fn with_limits(limits: Limits) -> Self {
        Document {
            limits,
            ..Self::default()
        }
    }

    /// Create an empty document that records history
    pub fn with_history(policy: HistoryPolicy) -> Self {
        Document {
            history: Some(HistoryTracker::new(policy)),
            ..Self::default()
        }
    }

    /// Create an empty document configured from a [`CtxConfig`]
    pub fn with_config(config: &CtxConfig) -> Self {
        Document {
            limits: config.limits,
            history: config.history.policy().map(HistoryTracker::new),
            ..Self::default()
        }
    }

    /// The write limits of this document
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Replace the write limits (existing content is not re-checked)
    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Start recording history, replacing any existing tracker
    pub fn enable_history(&mut self, policy: HistoryPolicy) {
        self.history = Some(HistoryTracker::new(policy));
    }

    /// Stop recording history, returning the tracker
    pub fn disable_history(&mut self) -> Option<HistoryTracker> {
        self.history.take()
    }

    /// The history tracker, if enabled
    pub fn history(&self) -> Option<&HistoryTracker> {
        self.history.as_ref()
    }

    // =========================================================================
    // Raw map access (no path parsing, no history)
    // =========================================================================

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no top-level keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-level keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Top-level entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a literal top-level key
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Look up a literal top-level key mutably
    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Value> {
        match self.index.get(key) {
            Some(&pos) => Some(&mut self.entries[pos].1),
            None => None,
        }
    }

    /// Check for a literal top-level key
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Store under a literal top-level key, returning the previous value
    ///
    /// Replacing keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a literal top-level key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.index.remove(key)?;
        let (_, value) = self.entries.remove(pos);
        for (k, _) in &self.entries[pos..] {
            if let Some(p) = self.index.get_mut(k) {
                *p -= 1;
            }
        }
        Some(value)
    }

    /// Remove all keys (history is kept)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Nested document under a literal top-level key
    ///
    /// Vivified when absent or `Null`; any other value is an addressing error.
    pub fn object_entry(&mut self, key: &str) -> Result<&mut Document> {
        let path = Path::root().key(key);
        let segment = PathSegment::Key(key.to_string());
        vivify_object(self.slot_mut(key), &path, &segment)
    }

    /// Slot for `key`, inserting a `Null` placeholder if absent
    fn slot_mut(&mut self, key: &str) -> &mut Value {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.entries.push((key.to_string(), Value::Null));
                self.index.insert(key.to_string(), pos);
                pos
            }
        };
        &mut self.entries[pos].1
    }

    // =========================================================================
    // Path reads
    // =========================================================================

    /// Strict read of a path expression
    pub fn get(&self, path: &str) -> Result<Option<&Value>> {
        self.resolve(&Path::parse(path), Traversal::Strict)
    }

    /// Lenient read of a path expression
    pub fn find(&self, path: &str) -> Option<&Value> {
        self.resolve(&Path::parse(path), Traversal::Lenient)
            .ok()
            .flatten()
    }

    /// Read a path expression with an explicit traversal mode
    pub fn get_with(&self, path: &str, mode: Traversal) -> Result<Option<&Value>> {
        self.resolve(&Path::parse(path), mode)
    }

    /// Check that a path resolves to a non-null value
    pub fn contains(&self, path: &str) -> bool {
        self.find(path).map_or(false, |v| !v.is_null())
    }

    /// Read a pre-parsed path
    pub fn resolve(&self, path: &Path, mode: Traversal) -> Result<Option<&Value>> {
        let Some((last, parents)) = path.split_last() else {
            return mode.fail(path, &PathSegment::Key(String::new()), "empty path");
        };

        let mut current = self;
        for segment in parents {
            match step(current, segment) {
                Step::Found(Value::Object(doc)) => current = doc,
                Step::Found(Value::Null) | Step::Missing => {
                    return mode.fail(path, segment, "missing intermediate value")
                }
                Step::Found(other) => {
                    return mode.fail(
                        path,
                        segment,
                        format!("expected Object, found {}", other.type_name()),
                    )
                }
                Step::Invalid(reason) => return mode.fail(path, segment, reason),
            }
        }

        match step(current, last) {
            Step::Found(value) => Ok(Some(value)),
            Step::Missing => Ok(None),
            Step::Invalid(reason) => mode.fail(path, last, reason),
        }
    }

    /// Lenient mutable read of a path expression
    pub fn find_mut(&mut self, path: &str) -> Option<&mut Value> {
        let path = Path::parse(path);
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = match step_mut(current, segment)? {
                Value::Object(doc) => doc,
                _ => return None,
            };
        }
        step_mut(current, last)
    }

    // =========================================================================
    // Path writes
    // =========================================================================

    /// Write a value at a path expression, returning the previous value
    ///
    /// The previous value is `None` when the slot was absent, padded, or
    /// held `Null`. When history is enabled, a write to a plain top-level key
    /// records an entry under that key. Compound and bracketed paths never
    /// record.
    pub fn put(&mut self, path: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        let value = value.into();
        let parsed = Path::parse(path);
        let recorded = match &self.history {
            Some(_) if parsed.is_simple_key() => Some(value.clone()),
            _ => None,
        };
        let previous = self.write(&parsed, value)?;
        if let Some(new) = recorded {
            self.record(path, previous.clone(), new);
        }
        Ok(previous)
    }

    /// Write a value at a pre-parsed path, recording history under its
    /// canonical rendering
    pub fn put_at(&mut self, path: &Path, value: impl Into<Value>) -> Result<Option<Value>> {
        self.put(&path.to_string(), value)
    }

    /// Apply [`Document::put`] to each entry in order
    ///
    /// Stops at the first failing entry; earlier entries stay written.
    pub fn put_all<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.put(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Store under a literal top-level key, recording history
    ///
    /// Used when loading text: keys are taken as written, never parsed.
    pub(crate) fn assign_key(&mut self, key: String, value: Value) -> Result<Option<Value>> {
        self.limits.validate_value(&value)?;
        let recorded = self.history.as_ref().map(|_| value.clone());
        let previous = self.insert(key.clone(), value).filter(|v| !v.is_null());
        if let Some(new) = recorded {
            self.record(&key, previous.clone(), new);
        }
        Ok(previous)
    }

    fn record(&mut self, key: &str, old: Option<Value>, new: Value) {
        if let Some(tracker) = self.history.as_mut() {
            tracker.record(key, old, new);
        }
    }

    /// Path write without history
    pub(crate) fn write(&mut self, path: &Path, value: Value) -> Result<Option<Value>> {
        self.limits.validate_path(path)?;
        self.limits.validate_value(&value)?;
        let Some((last, parents)) = path.split_last() else {
            return Err(Error::addressing("", "", "empty path"));
        };

        let mut current: &mut Document = self;
        for segment in parents {
            current = descend_or_create(current, segment, path)?;
        }
        let previous = assign(current, last, value, path)?;
        Ok(previous.filter(|v| !v.is_null()))
    }

    /// Remove the value at a path expression
    ///
    /// Lenient: returns `None` when the path does not resolve. Removing an
    /// array element shifts the elements after it.
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        let path = Path::parse(path);
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for segment in parents {
            current = match step_mut(current, segment)? {
                Value::Object(doc) => doc,
                _ => return None,
            };
        }
        match last {
            PathSegment::Key(name) => current.remove(name),
            PathSegment::Index { name, index } => {
                let items = current.get_key_mut(name)?.as_array_mut()?;
                if *index < items.len() {
                    Some(items.remove(*index))
                } else {
                    None
                }
            }
            PathSegment::MapKey { name, key } => {
                current.get_key_mut(name)?.as_document_mut()?.remove(key)
            }
        }
    }

    // =========================================================================
    // Merge
    // =========================================================================

    /// Merge `other` into this document, overwriting scalars
    pub fn merge(&mut self, other: &Document) {
        merge_map(self, other, MergePolicy::Overwrite);
    }

    /// Merge `other` into this document under an explicit policy
    pub fn merge_with(&mut self, other: &Document, policy: MergePolicy) {
        merge_map(self, other, policy);
    }

    /// Merge `other` into this document, only adding what is absent
    pub fn put_if_absent(&mut self, other: &Document) {
        merge_map(self, other, MergePolicy::AddNewOnly);
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (key, value) in iter {
            doc.insert(key, value);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// Traversal helpers
// =============================================================================

enum Step<'a> {
    Found(&'a Value),
    Missing,
    Invalid(String),
}

fn step<'a>(doc: &'a Document, segment: &PathSegment) -> Step<'a> {
    match segment {
        PathSegment::Key(name) => doc.get_key(name).map_or(Step::Missing, Step::Found),
        PathSegment::Index { name, index } => match doc.get_key(name) {
            None | Some(Value::Null) => Step::Missing,
            Some(Value::Array(items)) => match items.get(*index) {
                Some(value) => Step::Found(value),
                None => Step::Invalid(format!(
                    "index {} out of range for length {}",
                    index,
                    items.len()
                )),
            },
            Some(other) => Step::Invalid(format!("expected Array, found {}", other.type_name())),
        },
        PathSegment::MapKey { name, key } => match doc.get_key(name) {
            None | Some(Value::Null) => Step::Missing,
            Some(Value::Object(inner)) => inner.get_key(key).map_or(Step::Missing, Step::Found),
            Some(other) => Step::Invalid(format!("expected Object, found {}", other.type_name())),
        },
    }
}

fn step_mut<'a>(doc: &'a mut Document, segment: &PathSegment) -> Option<&'a mut Value> {
    match segment {
        PathSegment::Key(name) => doc.get_key_mut(name),
        PathSegment::Index { name, index } => doc.get_key_mut(name)?.as_array_mut()?.get_mut(*index),
        PathSegment::MapKey { name, key } => {
            doc.get_key_mut(name)?.as_document_mut()?.get_key_mut(key)
        }
    }
}

fn vivify_object<'a>(
    slot: &'a mut Value,
    path: &Path,
    segment: &PathSegment,
) -> Result<&'a mut Document> {
    if slot.is_null() {
        debug!(target: "ctxdoc::document", path = %path, segment = %segment, "Vivifying object");
        *slot = Value::object();
    }
    match slot {
        Value::Object(doc) => Ok(doc),
        other => Err(Error::addressing(
            path.to_string(),
            segment.to_string(),
            format!("expected Object, found {}", other.type_name()),
        )),
    }
}

fn vivify_array<'a>(
    slot: &'a mut Value,
    path: &Path,
    segment: &PathSegment,
) -> Result<&'a mut Vec<Value>> {
    if slot.is_null() {
        debug!(target: "ctxdoc::document", path = %path, segment = %segment, "Vivifying array");
        *slot = Value::array();
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(Error::addressing(
            path.to_string(),
            segment.to_string(),
            format!("expected Array, found {}", other.type_name()),
        )),
    }
}

fn descend_or_create<'a>(
    doc: &'a mut Document,
    segment: &PathSegment,
    path: &Path,
) -> Result<&'a mut Document> {
    match segment {
        PathSegment::Key(name) => vivify_object(doc.slot_mut(name), path, segment),
        PathSegment::Index { name, index } => {
            let items = vivify_array(doc.slot_mut(name), path, segment)?;
            if *index >= items.len() {
                items.resize(*index + 1, Value::Null);
            }
            vivify_object(&mut items[*index], path, segment)
        }
        PathSegment::MapKey { name, key } => {
            let inner = vivify_object(doc.slot_mut(name), path, segment)?;
            vivify_object(inner.slot_mut(key), path, segment)
        }
    }
}

fn assign(
    doc: &mut Document,
    segment: &PathSegment,
    value: Value,
    path: &Path,
) -> Result<Option<Value>> {
    match segment {
        PathSegment::Key(name) => Ok(doc.insert(name.as_str(), value)),
        PathSegment::Index { name, index } => {
            let items = vivify_array(doc.slot_mut(name), path, segment)?;
            if *index < items.len() {
                Ok(Some(std::mem::replace(&mut items[*index], value)))
            } else {
                items.resize(*index, Value::Null);
                items.push(value);
                Ok(None)
            }
        }
        PathSegment::MapKey { name, key } => {
            let inner = vivify_object(doc.slot_mut(name), path, segment)?;
            Ok(inner.insert(key.as_str(), value))
        }
    }
}
