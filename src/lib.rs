//! ctxdoc - hierarchical, path-addressable document store
//!
//! A [`Document`] is the variable bag threaded through a test-execution
//! session: values are written and read with path expressions, missing
//! containers are created on write, and other documents can be merged in
//! under an overwrite or add-new-only policy.
//!
//! # Quick Start
//!
//! ```
//! use ctxdoc::{SessionContext, SessionStatus, Value, CURRENT_TRANSPORT};
//!
//! let mut ctx = SessionContext::new();
//! ctx.start()?;
//!
//! let doc = ctx.document_mut();
//! doc.put("request.headers[\"Accept\"]", "application/json")?;
//! doc.put("request.retries[0]", 3)?;
//! assert_eq!(doc.get("request.retries[0]")?, Some(&Value::Int(3)));
//! assert!(!doc.contains("request.body"));
//!
//! ctx.set_slot(CURRENT_TRANSPORT, &"http".to_string())?;
//! ctx.finish(SessionStatus::Passed);
//!
//! let text = ctx.to_text()?;
//! let restored = SessionContext::from_text(&text)?;
//! assert_eq!(restored.document(), ctx.document());
//! # Ok::<(), ctxdoc::SessionError>(())
//! ```
//!
//! # Architecture
//!
//! - `ctxdoc-core`: values, paths, documents, merge, history, serialization, config
//! - `ctxdoc-session`: session lifecycle, typed slots and the session registry

pub use ctxdoc_core::{
    merge_list, merge_map, CtxConfig, Document, Error, HistoryConfig, HistoryEntry,
    HistoryPolicy, HistoryTracker, LimitError, Limits, MergePolicy, Path, PathSegment, Result,
    Timestamp, Traversal, Value, CONFIG_FILE_NAME, PARSED_KEY, RESERVED_KEYS, STEP_KEY,
    TEST_CASE_KEY,
};
pub use ctxdoc_session::{
    InitiatorRef, SessionContext, SessionError, SessionId, SessionRegistry, SessionStatus,
    SharedSession, Slot, CURRENT_TRANSPORT, INITIATOR_NAME, SESSION_ID,
};
