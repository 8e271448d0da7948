pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::mentor::handlers as mentor;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Match API
        .route("/api/v1/match/job", post(matching::handle_match_job))
        .route("/api/v1/match/jobs", post(matching::handle_rank_jobs))
        .route("/api/v1/match/resource", post(matching::handle_match_resource))
        .route("/api/v1/match/resources", post(matching::handle_rank_resources))
        // Mentor sessions
        .route("/api/v1/mentor/sessions", post(mentor::handle_create_session))
        .route(
            "/api/v1/mentor/sessions/:id",
            get(mentor::handle_get_session).delete(mentor::handle_delete_session),
        )
        .route(
            "/api/v1/mentor/sessions/:id/messages",
            post(mentor::handle_append_message),
        )
        .with_state(state)
}
