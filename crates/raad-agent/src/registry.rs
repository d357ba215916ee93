// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live chat sessions, keyed by id.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use raad_core::{RaadError, SessionId};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::dispatcher::QueryDispatcher;
use crate::session::{ChatSession, SessionSettings};

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<ChatSession>>;

/// Creates and looks up sessions for the gateway.
///
/// Each session sits behind its own async mutex. Asking takes the lock
/// without waiting, so a second concurrent question on the same session is
/// refused with [`RaadError::SessionBusy`].
///
/// Slots are reserved before a session is built, so concurrent creates never
/// exceed `max_sessions`.
#[derive(Debug)]
pub struct SessionRegistry {
    dispatcher: QueryDispatcher,
    settings: SessionSettings,
    max_sessions: usize,
    reserved: AtomicUsize,
    sessions: DashMap<String, SessionHandle>,
}

impl SessionRegistry {
    pub fn new(dispatcher: QueryDispatcher, settings: SessionSettings, max_sessions: usize) -> Self {
        Self {
            dispatcher,
            settings,
            max_sessions,
            reserved: AtomicUsize::new(0),
            sessions: DashMap::new(),
        }
    }

    pub fn dispatcher(&self) -> &QueryDispatcher {
        &self.dispatcher
    }

    /// Creates a session, optionally selecting a dataset other than the default.
    pub fn create(&self, dataset: Option<&str>) -> Result<SessionId, RaadError> {
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_sessions).then_some(n + 1)
            })
            .map_err(|_| RaadError::SessionLimit(self.max_sessions))?;

        let id = SessionId(uuid::Uuid::new_v4().to_string());
        let mut session = ChatSession::new(id.clone(), self.dispatcher.clone(), self.settings.clone());
        if let Some(name) = dataset {
            if let Err(e) = session.select_dataset(name) {
                self.reserved.fetch_sub(1, Ordering::AcqRel);
                return Err(e);
            }
        }
        info!(session_id = %id, dataset = %session.dataset(), "session created");
        self.sessions.insert(id.0.clone(), Arc::new(Mutex::new(session)));
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Result<SessionHandle, RaadError> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RaadError::SessionNotFound(id.to_string()))
    }

    /// Locks a session for a question, refusing if one is already in flight.
    pub fn try_acquire(&self, id: &str) -> Result<OwnedMutexGuard<ChatSession>, RaadError> {
        let handle = self.get(id)?;
        handle.try_lock_owned().map_err(|_| {
            debug!(session_id = %id, "session busy");
            RaadError::SessionBusy(id.to_string())
        })
    }

    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            self.reserved.fetch_sub(1, Ordering::AcqRel);
            info!(session_id = %id, "session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
