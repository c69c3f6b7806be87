//! Error types for the session layer

use crate::context::SessionId;
use crate::status::SessionStatus;
use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Session layer errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start` was called on a session that is not runnable
    #[error("session {id} is {status} and cannot be started")]
    NotRunnable {
        /// Session identity
        id: SessionId,
        /// Status at the time of the call
        status: SessionStatus,
    },

    /// `pause` was called on a session that is not in progress
    #[error("session {id} is {status} and cannot be paused")]
    NotRunning {
        /// Session identity
        id: SessionId,
        /// Status at the time of the call
        status: SessionStatus,
    },

    /// No session with this id is registered
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// A typed slot holds a value of the wrong shape
    #[error("slot '{slot}': {reason}")]
    Slot {
        /// Slot key
        slot: String,
        /// Conversion failure
        reason: String,
    },

    /// Error from the underlying document
    #[error(transparent)]
    Document(#[from] ctxdoc_core::Error),
}
