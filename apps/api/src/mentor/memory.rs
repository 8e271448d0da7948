use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::mentor::store::{ChatMessage, ChatSession, SessionStore, SessionStoreError};

struct Entry {
    session: ChatSession,
    expires_at: Instant,
}

/// Process-local session store. Used when no Redis URL is configured and in tests.
///
/// Expired sessions read as absent and are swept on the next write. The TTL
/// is clamped to one second, as in the Redis store.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    max_messages: usize,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration, max_messages: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: ttl.max(Duration::from_secs(1)),
            max_messages,
        }
    }

    fn sweep(sessions: &mut HashMap<String, Entry>, now: Instant) {
        sessions.retain(|_, entry| entry.expires_at > now);
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session_id: &str) -> Result<ChatSession, SessionStoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, now);

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Entry {
                session: ChatSession::new(session_id),
                expires_at: now + self.ttl,
            });
        Ok(entry.session.clone())
    }

    async fn get(&self, session_id: &str) -> Result<Option<ChatSession>, SessionStoreError> {
        let now = Instant::now();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.session.clone()))
    }

    async fn append(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession, SessionStoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, now);

        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Entry {
                session: ChatSession::new(session_id),
                expires_at: now,
            });
        entry.session.push_capped(message, self.max_messages);
        entry.expires_at = now + self.ttl;
        Ok(entry.session.clone())
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, now);
        Ok(sessions.remove(session_id).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
