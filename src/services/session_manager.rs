// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::chat_session::{ChatSession, SessionHandle};

/// Every mounted widget gets its own session; nothing is shared between them.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, SessionHandle>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    // Create a fresh session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.insert(ChatSession::new(id.clone())).await;
        id
    }

    /// Registers a prepared session, replacing any with the same id.
    pub async fn insert(&self, session: ChatSession) -> SessionHandle {
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        let mut guard = self.inner.write().await;
        guard.insert(id, Arc::clone(&handle));
        handle
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let guard = self.inner.read().await;
        guard.get(session_id).cloned()
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    /// Sessions locked by an in-flight send count as active.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, handle| match handle.try_lock() {
            Ok(session) => {
                session.state().is_loading || now.duration_since(session.last_active) < self.ttl
            }
            Err(_) => true,
        });
        before - guard.len()
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
