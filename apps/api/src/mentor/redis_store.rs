use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::mentor::store::{ChatMessage, ChatSession, SessionStore, SessionStoreError};

const KEY_PREFIX: &str = "mentor:session";

/// Per-session metadata kept next to the message list.
#[derive(Debug, Serialize, Deserialize)]
struct SessionMeta {
    created_at: DateTime<Utc>,
}

/// Redis-backed session store.
///
/// Layout per session:
/// - `mentor:session:{id}:meta`     — JSON `SessionMeta`
/// - `mentor:session:{id}:messages` — list of JSON `ChatMessage`, oldest first
///
/// Both keys share one TTL that is refreshed on every create and append.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    commands: SessionCommands,
}

/// Builds the pipelines for one session. Holds no connection, so the exact
/// command layout can be asserted in tests.
#[derive(Debug, Clone, Copy)]
struct SessionCommands {
    ttl_secs: u64,
    max_messages: usize,
}

impl SessionCommands {
    fn new(ttl: Duration, max_messages: usize) -> Self {
        Self {
            ttl_secs: ttl.as_secs().max(1),
            max_messages: max_messages.max(1),
        }
    }

    /// SET NX keeps an existing `created_at`; both keys get a fresh TTL.
    fn touch(&self, pipe: &mut redis::Pipeline, session_id: &str, meta: &str) {
        let meta_key = RedisSessionStore::meta_key(session_id);
        pipe.cmd("SET")
            .arg(&meta_key)
            .arg(meta)
            .arg("NX")
            .ignore()
            .expire(&meta_key, self.ttl_secs as i64)
            .ignore()
            .expire(RedisSessionStore::messages_key(session_id), self.ttl_secs as i64)
            .ignore();
    }

    fn create_pipeline(&self, session_id: &str, meta: &str) -> redis::Pipeline {
        let mut pipe = redis::pipe();
        pipe.atomic();
        self.touch(&mut pipe, session_id, meta);
        pipe
    }

    /// RPUSH then LTRIM to the newest `max_messages`. The list is
    /// re-expired last because RPUSH may have just created it.
    fn append_pipeline(&self, session_id: &str, meta: &str, payload: &str) -> redis::Pipeline {
        let messages_key = RedisSessionStore::messages_key(session_id);
        let keep = self.max_messages as isize;

        let mut pipe = redis::pipe();
        pipe.atomic();
        self.touch(&mut pipe, session_id, meta);
        pipe.rpush(&messages_key, payload)
            .ignore()
            .ltrim(&messages_key, -keep, -1)
            .ignore()
            .expire(&messages_key, self.ttl_secs as i64)
            .ignore();
        pipe
    }
}

impl RedisSessionStore {
    pub async fn connect(
        client: &redis::Client,
        ttl: Duration,
        max_messages: usize,
    ) -> Result<Self, SessionStoreError> {
        let conn = client.get_multiplexed_tokio_connection().await?;
        info!("Redis session store connected");
        Ok(Self {
            conn,
            commands: SessionCommands::new(ttl, max_messages),
        })
    }

    fn meta_key(session_id: &str) -> String {
        format!("{KEY_PREFIX}:{session_id}:meta")
    }

    fn messages_key(session_id: &str) -> String {
        format!("{KEY_PREFIX}:{session_id}:messages")
    }

    fn fresh_meta() -> Result<String, SessionStoreError> {
        Ok(serde_json::to_string(&SessionMeta {
            created_at: Utc::now(),
        })?)
    }

    fn assemble(
        session_id: &str,
        meta: &str,
        raw_messages: Vec<String>,
    ) -> Result<ChatSession, SessionStoreError> {
        let meta: SessionMeta = serde_json::from_str(meta)?;
        let messages = raw_messages
            .iter()
            .map(|raw| serde_json::from_str::<ChatMessage>(raw))
            .collect::<Result<Vec<_>, _>>()?;
        let updated_at = messages
            .last()
            .map(|m| m.created_at)
            .unwrap_or(meta.created_at);

        Ok(ChatSession {
            session_id: session_id.to_string(),
            messages,
            created_at: meta.created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session_id: &str) -> Result<ChatSession, SessionStoreError> {
        let pipe = self
            .commands
            .create_pipeline(session_id, &Self::fresh_meta()?);

        let mut conn = self.conn.clone();
        pipe.query_async::<_, ()>(&mut conn).await?;
        debug!(session_id, "Created mentor session");

        self.get(session_id)
            .await?
            .ok_or_else(|| SessionStoreError::Vanished(session_id.to_string()))
    }

    async fn get(&self, session_id: &str) -> Result<Option<ChatSession>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let meta: Option<String> = conn.get(Self::meta_key(session_id)).await?;
        let Some(meta) = meta else {
            return Ok(None);
        };
        let raw_messages: Vec<String> = conn.lrange(Self::messages_key(session_id), 0, -1).await?;
        Self::assemble(session_id, &meta, raw_messages).map(Some)
    }

    async fn append(
        &self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<ChatSession, SessionStoreError> {
        let payload = serde_json::to_string(&message)?;
        let pipe = self
            .commands
            .append_pipeline(session_id, &Self::fresh_meta()?, &payload);

        let mut conn = self.conn.clone();
        pipe.query_async::<_, ()>(&mut conn).await?;

        self.get(session_id)
            .await?
            .ok_or_else(|| SessionStoreError::Vanished(session_id.to_string()))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let mut conn = self.conn.clone();
        let removed: u32 = conn
            .del(vec![Self::meta_key(session_id), Self::messages_key(session_id)])
            .await?;
        Ok(removed > 0)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mentor::store::ChatRole;

    /// Decodes a packed pipeline (a run of RESP arrays of bulk strings)
    /// back into one argument list per command.
    fn decode_commands(packed: &[u8]) -> Vec<Vec<String>> {
        fn read_line<'a>(buf: &'a [u8], pos: &mut usize) -> &'a str {
            let start = *pos;
            while &buf[*pos..*pos + 2] != b"\r\n" {
                *pos += 1;
            }
            let line = std::str::from_utf8(&buf[start..*pos]).unwrap();
            *pos += 2;
            line
        }

        let mut commands = Vec::new();
        let mut pos = 0;
        while pos < packed.len() {
            let header = read_line(packed, &mut pos);
            let argc: usize = header.strip_prefix('*').unwrap().parse().unwrap();
            let mut args = Vec::with_capacity(argc);
            for _ in 0..argc {
                let len: usize = read_line(packed, &mut pos)
                    .strip_prefix('$')
                    .unwrap()
                    .parse()
                    .unwrap();
                args.push(String::from_utf8(packed[pos..pos + len].to_vec()).unwrap());
                pos += len + 2;
            }
            commands.push(args);
        }
        commands
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_pipeline_keeps_created_at_and_refreshes_both_ttls() {
        let commands = SessionCommands::new(Duration::from_secs(600), 50);
        let pipe = commands.create_pipeline("s1", "{meta}");

        assert_eq!(
            decode_commands(&pipe.get_packed_pipeline()),
            vec![
                args(&["MULTI"]),
                args(&["SET", "mentor:session:s1:meta", "{meta}", "NX"]),
                args(&["EXPIRE", "mentor:session:s1:meta", "600"]),
                args(&["EXPIRE", "mentor:session:s1:messages", "600"]),
                args(&["EXEC"]),
            ]
        );
    }

    #[test]
    fn test_append_pipeline_caps_history_and_expires_list() {
        let commands = SessionCommands::new(Duration::from_secs(600), 3);
        let pipe = commands.append_pipeline("s1", "{meta}", "{msg}");

        assert_eq!(
            decode_commands(&pipe.get_packed_pipeline()),
            vec![
                args(&["MULTI"]),
                args(&["SET", "mentor:session:s1:meta", "{meta}", "NX"]),
                args(&["EXPIRE", "mentor:session:s1:meta", "600"]),
                args(&["EXPIRE", "mentor:session:s1:messages", "600"]),
                args(&["RPUSH", "mentor:session:s1:messages", "{msg}"]),
                args(&["LTRIM", "mentor:session:s1:messages", "-3", "-1"]),
                args(&["EXPIRE", "mentor:session:s1:messages", "600"]),
                args(&["EXEC"]),
            ]
        );
    }

    #[test]
    fn test_commands_clamp_zero_ttl_and_cap() {
        let commands = SessionCommands::new(Duration::ZERO, 0);
        let pipe = commands.append_pipeline("s1", "{}", "{}");
        let decoded = decode_commands(&pipe.get_packed_pipeline());

        assert_eq!(decoded[2], args(&["EXPIRE", "mentor:session:s1:meta", "1"]));
        assert_eq!(decoded[5], args(&["LTRIM", "mentor:session:s1:messages", "-1", "-1"]));
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(RedisSessionStore::meta_key("abc"), "mentor:session:abc:meta");
        assert_eq!(
            RedisSessionStore::messages_key("abc"),
            "mentor:session:abc:messages"
        );
    }

    #[test]
    fn test_assemble_uses_last_message_for_updated_at() {
        let created_at = Utc::now() - chrono::Duration::minutes(5);
        let meta = serde_json::to_string(&SessionMeta { created_at }).unwrap();
        let message = ChatMessage::new(ChatRole::User, "How do I get into Rust?");
        let raw = vec![serde_json::to_string(&message).unwrap()];

        let session = RedisSessionStore::assemble("s1", &meta, raw).unwrap();
        assert_eq!(session.created_at, created_at);
        assert_eq!(session.updated_at, message.created_at);
        assert_eq!(session.messages, vec![message]);
    }

    #[test]
    fn test_assemble_rejects_corrupt_payload() {
        let meta = serde_json::to_string(&SessionMeta {
            created_at: Utc::now(),
        })
        .unwrap();
        let result = RedisSessionStore::assemble("s1", &meta, vec!["not json".to_string()]);
        assert!(matches!(result, Err(SessionStoreError::Serialization(_))));
    }
}
