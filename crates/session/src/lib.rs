//! Session context overlay for ctxdoc
//!
//! This crate wraps a [`ctxdoc_core::Document`] as the variable scope of one
//! execution session:
//! - SessionStatus: lifecycle states and the runnable/running/finished predicates
//! - SessionContext: identity, status, timing, initiator and the owned document
//! - Slot: typed access to well-known session variables
//! - SessionRegistry: concurrent map of live sessions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod registry;
pub mod slots;
pub mod status;

pub use context::{InitiatorRef, SessionContext, SessionId};
pub use error::{Result, SessionError};
pub use registry::{SessionRegistry, SharedSession};
pub use slots::{Slot, CURRENT_TRANSPORT, INITIATOR_NAME, SESSION_ID};
pub use status::{ParseStatusError, SessionStatus};
