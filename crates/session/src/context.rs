//! Session context overlay
//!
//! A [`SessionContext`] is the variable scope of one execution session: a
//! [`Document`] plus identity, lifecycle status, start/end times and the
//! initiator. The context owns its document, so the two are always archived
//! together.
//!
//! Two reserved top-level keys hold bound sub-contexts: `tc` for the current
//! test case and `sp` for the current step. Plain document text never
//! contains them; [`SessionContext::to_text`] stores them separately.

use crate::error::{Result, SessionError};
use crate::slots::Slot;
use crate::status::SessionStatus;
use ctxdoc_core::{CtxConfig, Document, Timestamp, Value, STEP_KEY, TEST_CASE_KEY};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for a session
///
/// Wraps a UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random SessionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a SessionId from its string form
    ///
    /// Returns None if the string is not a valid UUID.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to whatever started a session (a user, a schedule, a parent run)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiatorRef {
    /// Kind of initiator, e.g. "user"
    pub kind: String,
    /// Identifier within that kind
    pub id: String,
}

impl InitiatorRef {
    /// Create an initiator reference
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        InitiatorRef {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// One execution session and its variable document
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: SessionId,
    status: SessionStatus,
    started_at: Timestamp,
    ended_at: Option<Timestamp>,
    initiator: Option<InitiatorRef>,
    document: Document,
}

/// Text envelope of a session
#[derive(Serialize, Deserialize)]
struct SessionSnapshot {
    id: SessionId,
    status: SessionStatus,
    started_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ended_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initiator: Option<InitiatorRef>,
    document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    test_case: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    step: Option<Value>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// Create a `NotStarted` session with an empty document
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Create a `NotStarted` session whose document follows `config`
    pub fn with_config(config: &CtxConfig) -> Self {
        Self::with_document(Document::with_config(config))
    }

    /// Create a `NotStarted` session around an existing document
    pub fn with_document(document: Document) -> Self {
        SessionContext {
            id: SessionId::new(),
            status: SessionStatus::NotStarted,
            started_at: Timestamp::now(),
            ended_at: None,
            initiator: None,
            document,
        }
    }

    /// Set the initiator (builder pattern)
    pub fn with_initiator(mut self, initiator: InitiatorRef) -> Self {
        self.initiator = Some(initiator);
        self
    }

    /// Session identity
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current status
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Creation time, or the first `start` if it has been started
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Time the session first reached a finished status
    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    /// The initiator, if known
    pub fn initiator(&self) -> Option<&InitiatorRef> {
        self.initiator.as_ref()
    }

    /// Replace the initiator
    pub fn set_initiator(&mut self, initiator: Option<InitiatorRef>) {
        self.initiator = initiator;
    }

    /// The session document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The session document, mutably
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Consume the context, keeping its document
    pub fn into_document(self) -> Document {
        self.document
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Check if the session may be started
    pub fn is_runnable(&self) -> bool {
        self.status.is_runnable()
    }

    /// Check if the session is executing
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// Check if the session reached a terminal status
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Write a status without checking the transition
    ///
    /// The first finished status written also records the end time.
    pub fn set_status(&mut self, status: SessionStatus) {
        self.set_status_at(status, Timestamp::now());
    }

    /// Write a status as of `now`
    pub fn set_status_at(&mut self, status: SessionStatus, now: Timestamp) {
        debug!(target: "ctxdoc::session", id = %self.id, from = %self.status, to = %status, "Session status changed");
        self.status = status;
        if status.is_finished() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Move to `InProgress`, failing unless the session is runnable
    pub fn start(&mut self) -> Result<()> {
        self.start_at(Timestamp::now())
    }

    /// Move to `InProgress` as of `now`
    pub fn start_at(&mut self, now: Timestamp) -> Result<()> {
        if !self.is_runnable() {
            return Err(SessionError::NotRunnable {
                id: self.id,
                status: self.status,
            });
        }
        if self.status == SessionStatus::NotStarted {
            self.started_at = now;
        }
        self.set_status_at(SessionStatus::InProgress, now);
        Ok(())
    }

    /// Move to `Paused`, failing unless the session is in progress
    pub fn pause(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(SessionError::NotRunning {
                id: self.id,
                status: self.status,
            });
        }
        self.set_status(SessionStatus::Paused);
        Ok(())
    }

    /// Move to a final status, recording the end time if not yet set
    pub fn finish(&mut self, status: SessionStatus) {
        self.finish_at(status, Timestamp::now());
    }

    /// Move to a final status as of `now`
    pub fn finish_at(&mut self, status: SessionStatus, now: Timestamp) {
        self.set_status_at(status, now);
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Elapsed time, measured to `now` while the session has not ended
    pub fn duration_at(&self, now: Timestamp) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .duration_since(self.started_at)
            .unwrap_or_default()
    }

    /// Elapsed time until now or the end time
    pub fn duration(&self) -> Duration {
        self.duration_at(Timestamp::now())
    }

    // =========================================================================
    // Bound sub-contexts
    // =========================================================================

    /// The test-case bound sub-context, if present
    pub fn test_case(&self) -> Option<&Document> {
        self.document.get_key(TEST_CASE_KEY).and_then(Value::as_document)
    }

    /// The test-case bound sub-context, created if absent
    pub fn test_case_mut(&mut self) -> Result<&mut Document> {
        Ok(self.document.object_entry(TEST_CASE_KEY)?)
    }

    /// The step bound sub-context, if present
    pub fn step(&self) -> Option<&Document> {
        self.document.get_key(STEP_KEY).and_then(Value::as_document)
    }

    /// The step bound sub-context, created if absent
    pub fn step_mut(&mut self) -> Result<&mut Document> {
        Ok(self.document.object_entry(STEP_KEY)?)
    }

    // =========================================================================
    // Typed slots
    // =========================================================================

    /// Read a typed slot; `None` when absent or null
    pub fn slot<T: DeserializeOwned>(&self, slot: Slot<T>) -> Result<Option<T>> {
        match self.document.find(slot.key()) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(serde_json::Value::from(value.clone()))
                .map(Some)
                .map_err(|e| SessionError::Slot {
                    slot: slot.key().to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Write a typed slot, returning the previous raw value
    pub fn set_slot<T: Serialize>(&mut self, slot: Slot<T>, value: &T) -> Result<Option<Value>> {
        let json = serde_json::to_value(value).map_err(|e| SessionError::Slot {
            slot: slot.key().to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.document.put(slot.key(), Value::from(json))?)
    }

    // =========================================================================
    // Text form
    // =========================================================================

    /// Render the session as JSON
    ///
    /// The document is written without its reserved keys; the test-case and
    /// step sub-contexts travel in their own envelope fields.
    pub fn to_text(&self) -> Result<String> {
        let snapshot = SessionSnapshot {
            id: self.id,
            status: self.status,
            started_at: self.started_at,
            ended_at: self.ended_at,
            initiator: self.initiator.clone(),
            document: self.document.without_reserved(),
            test_case: self.document.get_key(TEST_CASE_KEY).cloned(),
            step: self.document.get_key(STEP_KEY).cloned(),
        };
        serde_json::to_string(&snapshot).map_err(|e| ctxdoc_core::Error::from(e).into())
    }

    /// Restore a session rendered by [`SessionContext::to_text`]
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_text_with_config(text, &CtxConfig::default())
    }

    /// Restore a session, applying `config` to its document
    pub fn from_text_with_config(text: &str, config: &CtxConfig) -> Result<Self> {
        let snapshot: SessionSnapshot =
            serde_json::from_str(text).map_err(ctxdoc_core::Error::from)?;

        let mut document = snapshot.document.without_reserved();
        document.set_limits(config.limits);
        if let Some(policy) = config.history.policy() {
            document.enable_history(policy);
        }
        if let Some(test_case) = snapshot.test_case {
            document.insert(TEST_CASE_KEY, test_case);
        }
        if let Some(step) = snapshot.step {
            document.insert(STEP_KEY, step);
        }

        Ok(SessionContext {
            id: snapshot.id,
            status: snapshot.status,
            started_at: snapshot.started_at,
            ended_at: snapshot.ended_at,
            initiator: snapshot.initiator,
            document,
        })
    }
}
