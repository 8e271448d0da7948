//! Axum route handlers for mentor chat sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::mentor::store::{ChatMessage, ChatRole, ChatSession};
use crate::state::AppState;

pub const MAX_MESSAGE_CHARS: usize = 8000;
const MAX_SESSION_ID_LEN: usize = 128;

#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub role: String,
    pub content: String,
}

impl AppendMessageRequest {
    fn into_message(self) -> Result<ChatMessage, AppError> {
        let role = ChatRole::parse(&self.role).ok_or_else(|| {
            AppError::Validation(format!(
                "role must be 'user' or 'assistant', got '{}'",
                self.role
            ))
        })?;

        let content = self.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("content cannot be empty".to_string()));
        }
        if content.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::Validation(format!(
                "content exceeds {MAX_MESSAGE_CHARS} characters"
            )));
        }

        Ok(ChatMessage::new(role, content))
    }
}

fn validate_session_id(session_id: &str) -> Result<(), AppError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "session id must be 1-{MAX_SESSION_ID_LEN} characters of [A-Za-z0-9_-]"
        )))
    }
}

/// POST /api/v1/mentor/sessions
///
/// Opens a new session with a server-generated id.
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ChatSession>), AppError> {
    let session_id = Uuid::new_v4().to_string();
    let session = state.sessions.create(&session_id).await?;
    debug!(session_id = %session_id, backend = state.sessions.backend(), "Opened mentor session");
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/mentor/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ChatSession>, AppError> {
    validate_session_id(&session_id)?;
    state
        .sessions
        .get(&session_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))
}

/// POST /api/v1/mentor/sessions/:id/messages
///
/// Appends one message; unknown ids start a new session.
pub async fn handle_append_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AppendMessageRequest>,
) -> Result<Json<ChatSession>, AppError> {
    validate_session_id(&session_id)?;
    let message = request.into_message()?;

    let session = state.sessions.append(&session_id, message).await?;
    debug!(
        session_id = %session_id,
        messages = session.messages.len(),
        "Appended mentor message"
    );
    Ok(Json(session))
}

/// DELETE /api/v1/mentor/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    validate_session_id(&session_id)?;
    if state.sessions.delete(&session_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}
