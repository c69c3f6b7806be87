//! Core types for ctxdoc
//!
//! This crate defines the path-addressable document store:
//! - Value: value cells (scalars, arrays, nested documents)
//! - Path: path expression parser (`a.b[2].c`, `headers["Content-Type"]`)
//! - Document: ordered map with strict/lenient path reads and auto-vivifying writes
//! - Merge: recursive merge with overwrite or add-new-only policy
//! - History: per-document log of the latest transition per path
//! - Serialization: order-preserving JSON text with reserved-key stripping
//! - Limits and Config: write limits and `ctxdoc.toml` loading
//!
//! A `Document` assumes exclusive access for the duration of a call; it does
//! no internal locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod limits;
pub mod merge;
pub mod path;
pub mod serialize;
pub mod timestamp;
pub mod value;

pub use config::{CtxConfig, HistoryConfig, CONFIG_FILE_NAME};
pub use document::{Document, Traversal};
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryPolicy, HistoryTracker, DEFAULT_MAX_HISTORY_ENTRIES};
pub use limits::{LimitError, Limits};
pub use merge::{merge_list, merge_map, MergePolicy};
pub use path::{Path, PathSegment};
pub use serialize::{is_reserved_key, PARSED_KEY, RESERVED_KEYS, STEP_KEY, TEST_CASE_KEY};
pub use timestamp::Timestamp;
pub use value::Value;
