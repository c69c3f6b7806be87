//! Typed named slots
//!
//! A [`Slot`] pairs a document key with the Rust type stored there, so
//! well-known session variables are read and written without stringly typed
//! lookups. Values are converted through serde.

use std::fmt;
use std::marker::PhantomData;

/// A well-known document key holding a value of type `T`
pub struct Slot<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Slot<T> {
    /// Declare a slot at a path expression
    pub const fn new(key: &'static str) -> Self {
        Slot {
            key,
            _marker: PhantomData,
        }
    }

    /// Path expression of the slot
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.key).finish()
    }
}

/// Identity of the session, as seen by scripts
pub const SESSION_ID: Slot<String> = Slot::new("session_id");

/// Name of the transport currently in use
pub const CURRENT_TRANSPORT: Slot<String> = Slot::new("current_transport");

/// Display name of whoever started the session
pub const INITIATOR_NAME: Slot<String> = Slot::new("initiator_name");
