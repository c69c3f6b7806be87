//! Error types for ctxdoc documents
//!
//! This module defines all error types raised by the document store.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Propagation
//!
//! - Strict traversal (`Document::get`, `Document::put`) returns
//!   [`Error::Addressing`] to the caller without local recovery.
//! - Lenient traversal (`Document::find`, `Document::contains`) converts the
//!   same conditions into absence and never fails.
//! - Merging never fails on a type mismatch.

use crate::limits::LimitError;
use std::io;
use thiserror::Error;

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the document store
#[derive(Debug, Error)]
pub enum Error {
    /// A strict traversal met a non-container where a container is required,
    /// a missing intermediate, or an out-of-range index
    #[error("cannot address '{segment}' in path '{path}': {reason}")]
    Addressing {
        /// Full path expression being resolved
        path: String,
        /// The segment that failed to resolve
        segment: String,
        /// Human readable cause
        reason: String,
    },

    /// A segment cannot be parsed (strict parsing only)
    #[error("malformed path '{path}': {reason}")]
    MalformedPath {
        /// Offending path expression
        path: String,
        /// Human readable cause
        reason: String,
    },

    /// Invalid JSON text
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A document limit was exceeded
    #[error("Limit exceeded: {0}")]
    Limit(#[from] LimitError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn addressing(
        path: impl Into<String>,
        segment: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Addressing {
            path: path.into(),
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an addressing error
    pub fn is_addressing(&self) -> bool {
        matches!(self, Error::Addressing { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
