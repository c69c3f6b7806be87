//! Registry of live sessions
//!
//! Each session is owned by the registry behind its own
//! `Arc<parking_lot::Mutex<_>>`, so different sessions never contend and a
//! caller holding a handle has exclusive access to that session's document
//! while locked. Archiving removes the context and its document together.

use crate::context::{InitiatorRef, SessionContext, SessionId};
use crate::error::{Result, SessionError};
use ctxdoc_core::CtxConfig;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to a registered session
pub type SharedSession = Arc<Mutex<SessionContext>>;

/// Concurrent map of live sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    config: CtxConfig,
    sessions: DashMap<SessionId, SharedSession>,
}

impl SessionRegistry {
    /// Create an empty registry with default document configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry whose sessions follow `config`
    pub fn with_config(config: CtxConfig) -> Self {
        SessionRegistry {
            config,
            sessions: DashMap::new(),
        }
    }

    /// Configuration applied to new session documents
    pub fn config(&self) -> &CtxConfig {
        &self.config
    }

    /// Create and register a `NotStarted` session
    pub fn create(&self, initiator: Option<InitiatorRef>) -> SharedSession {
        let mut ctx = SessionContext::with_config(&self.config);
        ctx.set_initiator(initiator);
        self.insert(ctx)
    }

    /// Register an existing context, replacing any session with the same id
    pub fn insert(&self, ctx: SessionContext) -> SharedSession {
        let id = ctx.id();
        let shared = Arc::new(Mutex::new(ctx));
        self.sessions.insert(id, Arc::clone(&shared));
        debug!(target: "ctxdoc::session", id = %id, "Session registered");
        shared
    }

    /// Restore a session from text and register it
    pub fn restore(&self, text: &str) -> Result<SharedSession> {
        let ctx = SessionContext::from_text_with_config(text, &self.config)?;
        Ok(self.insert(ctx))
    }

    /// Handle to a registered session
    pub fn get(&self, id: SessionId) -> Result<SharedSession> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SessionError::UnknownSession(id))
    }

    /// Check if a session is registered
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Unregister a session, returning its context and document
    ///
    /// If other handles are still alive, the returned context is a clone
    /// taken under the lock, so the caller must not hold that lock itself.
    pub fn archive(&self, id: SessionId) -> Result<SessionContext> {
        let (_, shared) = self
            .sessions
            .remove(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        debug!(target: "ctxdoc::session", id = %id, "Session archived");
        let ctx = match Arc::try_unwrap(shared) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().clone(),
        };
        Ok(ctx)
    }

    /// Ids of sessions currently `InProgress`
    ///
    /// Handles are collected before any session is locked, so no map shard
    /// stays held while waiting on a session.
    pub fn running(&self) -> Vec<SessionId> {
        let handles: Vec<(SessionId, SharedSession)> = self
            .sessions
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        handles
            .into_iter()
            .filter(|(_, shared)| shared.lock().is_running())
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of all registered sessions
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of registered sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no session is registered
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
