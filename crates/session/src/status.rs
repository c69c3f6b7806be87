//! Session lifecycle status
//!
//! ```text
//! NOT_STARTED ──start──▶ IN_PROGRESS ──finish──▶ PASSED | FAILED | STOPPED | FAILED_BY_TIMEOUT
//!                          │    ▲
//!                        pause start
//!                          ▼    │
//!                          PAUSED
//! ```
//!
//! `WARNING` is neither runnable nor finished. Transitions are advisory:
//! the predicates are what callers must honour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Created, never started
    #[default]
    NotStarted,
    /// Currently executing
    InProgress,
    /// Finished successfully
    Passed,
    /// Completed with warnings
    Warning,
    /// Finished with a failure
    Failed,
    /// Suspended, may be resumed
    Paused,
    /// Stopped by a caller
    Stopped,
    /// Failed because the execution engine timed it out
    FailedByTimeout,
}

impl SessionStatus {
    /// All statuses
    pub const ALL: [SessionStatus; 8] = [
        SessionStatus::NotStarted,
        SessionStatus::InProgress,
        SessionStatus::Passed,
        SessionStatus::Warning,
        SessionStatus::Failed,
        SessionStatus::Paused,
        SessionStatus::Stopped,
        SessionStatus::FailedByTimeout,
    ];

    /// Check if a session in this status may move to `InProgress`
    pub fn is_runnable(&self) -> bool {
        matches!(self, SessionStatus::NotStarted | SessionStatus::Paused)
    }

    /// Check if the session is executing
    pub fn is_running(&self) -> bool {
        matches!(self, SessionStatus::InProgress)
    }

    /// Check if this is a terminal status
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            SessionStatus::Passed
                | SessionStatus::Failed
                | SessionStatus::Stopped
                | SessionStatus::FailedByTimeout
        )
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::NotStarted => "NOT_STARTED",
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Passed => "PASSED",
            SessionStatus::Warning => "WARNING",
            SessionStatus::Failed => "FAILED",
            SessionStatus::Paused => "PAUSED",
            SessionStatus::Stopped => "STOPPED",
            SessionStatus::FailedByTimeout => "FAILED_BY_TIMEOUT",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unrecognised status name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown session status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for SessionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}
