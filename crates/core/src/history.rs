//! Mutation history for a document
//!
//! A [`HistoryTracker`] keeps the most recent `(old, new)` transition for each
//! plain key written through a document's top-level `put`/`put_all`. Recording a
//! key again replaces its previous entry.
//!
//! ## Retention
//!
//! History is an audit aid, not part of the document: entries can disappear
//! while the live data stays intact. Retention is governed by a
//! [`HistoryPolicy`] and is deterministic:
//!
//! - `max_entries`: once full, the least recently recorded path is evicted
//! - `ttl`: an entry older than the TTL is invisible to readers and dropped
//!   on the next write
//!
//! Callers must not treat a missing entry as "never written".

use crate::timestamp::Timestamp;
use crate::value::Value;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Default number of paths kept by a tracker
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 1024;

/// Retention policy for a [`HistoryTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPolicy {
    /// Maximum number of paths tracked (`None` = unbounded)
    pub max_entries: Option<usize>,
    /// Maximum age of an entry (`None` = never expires)
    pub ttl: Option<Duration>,
}

impl Default for HistoryPolicy {
    fn default() -> Self {
        HistoryPolicy {
            max_entries: Some(DEFAULT_MAX_HISTORY_ENTRIES),
            ttl: None,
        }
    }
}

impl HistoryPolicy {
    /// A policy that never evicts
    pub fn unbounded() -> Self {
        HistoryPolicy {
            max_entries: None,
            ttl: None,
        }
    }

    /// Set the capacity (builder pattern)
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Set the time-to-live (builder pattern)
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// One recorded transition
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Value before the write (`None` if absent or null)
    pub old: Option<Value>,
    /// Value written
    pub new: Value,
    /// When the write happened
    pub recorded_at: Timestamp,
}

/// Per-document log of the latest transition per path
#[derive(Debug, Clone, Default)]
pub struct HistoryTracker {
    policy: HistoryPolicy,
    /// Path -> (recording sequence, entry)
    entries: FxHashMap<String, (u64, HistoryEntry)>,
    /// Recording sequence -> path, oldest first
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl HistoryTracker {
    /// Create an empty tracker with the given policy
    pub fn new(policy: HistoryPolicy) -> Self {
        HistoryTracker {
            policy,
            ..Default::default()
        }
    }

    /// The retention policy
    pub fn policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// Record a transition now
    pub fn record(&mut self, key: impl Into<String>, old: Option<Value>, new: Value) {
        self.record_at(key, old, new, Timestamp::now());
    }

    /// Record a transition at an explicit time
    ///
    /// Times are expected not to go backwards between calls.
    pub fn record_at(
        &mut self,
        key: impl Into<String>,
        old: Option<Value>,
        new: Value,
        now: Timestamp,
    ) {
        let key = key.into();
        self.evict_expired(now);

        let seq = self.next_seq;
        self.next_seq += 1;
        let entry = HistoryEntry {
            old,
            new,
            recorded_at: now,
        };
        if let Some((prev_seq, _)) = self.entries.insert(key.clone(), (seq, entry)) {
            self.order.remove(&prev_seq);
        }
        self.order.insert(seq, key);

        if let Some(max) = self.policy.max_entries {
            let mut evicted = Vec::new();
            while self.entries.len() > max {
                let Some((_, oldest)) = self.order.pop_first() else {
                    break;
                };
                self.entries.remove(&oldest);
                evicted.push(oldest);
            }
            if !evicted.is_empty() {
                debug!(target: "ctxdoc::history", evicted = ?evicted, "History capacity reached");
            }
        }
    }

    /// Latest live transition for a path
    pub fn get(&self, key: &str) -> Option<&HistoryEntry> {
        self.get_at(key, Timestamp::now())
    }

    /// Latest transition for a path, as seen at `now`
    pub fn get_at(&self, key: &str, now: Timestamp) -> Option<&HistoryEntry> {
        self.entries
            .get(key)
            .map(|(_, e)| e)
            .filter(|e| !self.is_expired(e, now))
    }

    /// Live entries, oldest-recorded first
    pub fn entries(&self) -> Vec<(&str, &HistoryEntry)> {
        self.entries_at(Timestamp::now())
    }

    /// Entries live at `now`, oldest-recorded first
    pub fn entries_at(&self, now: Timestamp) -> Vec<(&str, &HistoryEntry)> {
        self.order
            .values()
            .filter_map(|key| self.entries.get(key).map(|(_, e)| (key.as_str(), e)))
            .filter(|(_, e)| !self.is_expired(e, now))
            .collect()
    }

    /// Drop entries older than the TTL, returning how many were removed
    ///
    /// Walks from the oldest recording and stops at the first live entry.
    pub fn evict_expired(&mut self, now: Timestamp) -> usize {
        if self.policy.ttl.is_none() {
            return 0;
        }
        let mut removed = 0;
        while let Some((&seq, key)) = self.order.first_key_value() {
            let expired = self
                .entries
                .get(key)
                .map_or(true, |(_, e)| self.is_expired(e, now));
            if !expired {
                break;
            }
            if let Some(key) = self.order.remove(&seq) {
                self.entries.remove(&key);
            }
            removed += 1;
        }
        if removed > 0 {
            debug!(target: "ctxdoc::history", removed, "Expired history entries dropped");
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet dropped
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn is_expired(&self, entry: &HistoryEntry, now: Timestamp) -> bool {
        match (self.policy.ttl, now.duration_since(entry.recorded_at)) {
            (Some(ttl), Some(age)) => age > ttl,
            _ => false,
        }
    }
}
