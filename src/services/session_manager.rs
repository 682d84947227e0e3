// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub const GREETING: &str =
    "Olá! Eu sou a IAI, sua Inteligência Artificial para Inovação. Como posso ajudar você hoje?";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One browser session: its id and the transcript shown to the user.
///
/// The transcript only grows. It always opens with the assistant greeting.
#[derive(Debug)]
pub struct Session {
    id: String,
    messages: Vec<Message>,
    last_active: Instant,
}

impl Session {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: vec![Message {
                role: MessageRole::Assistant,
                content: GREETING.to_string(),
            }],
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    // Append a message to the transcript and touch last_active.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) -> usize {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self.touch();
        self.messages.len()
    }

    fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.duration_since(self.last_active)
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

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

    // Create a fresh session, greeting included.
    pub async fn create_session(&self) -> SessionHandle {
        let id = Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Session::new(id.clone())));

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), handle.clone());
        tracing::info!(session_id = %id, "session created");
        handle
    }

    /// Look up a session by id.
    pub async fn get(&self, session_id: &str) -> Option<SessionHandle> {
        let guard = self.inner.read().await;
        guard.get(session_id).cloned()
    }

    /// Return the session for a known id, or create a new one.
    ///
    /// Unknown ids are not adopted: the caller gets a session with a freshly
    /// generated id and must switch to it.
    pub async fn get_or_create(&self, session_id: Option<&str>) -> SessionHandle {
        if let Some(id) = session_id.map(str::trim).filter(|id| !id.is_empty()) {
            if let Some(handle) = self.lookup_touching(id).await {
                return handle;
            }
            tracing::debug!(session_id = %id, "unknown session id, issuing a new one");
        }
        self.create_session().await
    }

    // Touched under the map lock so a sweep cannot expire the session
    // between this lookup and the caller locking it. A session that is
    // already locked has a turn in flight and is safe from the sweep.
    async fn lookup_touching(&self, session_id: &str) -> Option<SessionHandle> {
        let guard = self.inner.read().await;
        let handle = guard.get(session_id)?.clone();
        if let Ok(mut session) = handle.try_lock() {
            session.touch();
        }
        Some(handle)
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    ///
    /// A session whose lock is held has a turn in flight and is kept.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, handle| match handle.try_lock() {
            Ok(session) => session.idle_for(now) < self.ttl,
            Err(_) => true,
        });
        before - guard.len()
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// List session ids
    pub async fn list_session_ids(&self) -> Vec<String> {
        let guard = self.inner.read().await;
        guard.keys().cloned().collect()
    }
}
