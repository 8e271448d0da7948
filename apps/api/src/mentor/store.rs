//! Mentor chat session cache.
//!
//! Sessions are keyed by an opaque id and hold the most recent messages of a
//! conversation. Backends implement `SessionStore`; `AppState` carries an
//! `Arc<dyn SessionStore>` chosen at startup (Redis when `REDIS_URL` is set,
//! in-memory otherwise).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Corrupt session payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Expired or deleted between a write and its read-back.
    #[error("Session {0} vanished during update")]
    Vanished(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message, dropping the oldest ones beyond `max_messages`.
    pub fn push_capped(&mut self, message: ChatMessage, max_messages: usize) {
        self.updated_at = message.created_at;
        self.messages.push(message);
        if self.messages.len() > max_messages {
            let excess = self.messages.len() - max_messages;
            self.messages.drain(..excess);
        }
    }
}

/// Storage seam for mentor chat history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates an empty session. An existing session with the same id is kept.
    async fn create(&self, session_id: &str) -> Result<ChatSession, SessionStoreError>;

    async fn get(&self, session_id: &str) -> Result<Option<ChatSession>, SessionStoreError>;

    /// Appends to the session, creating it first if needed, and refreshes its TTL.
    async fn append(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession, SessionStoreError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError>;

    /// Backend label for logs.
    fn backend(&self) -> &'static str;
}
