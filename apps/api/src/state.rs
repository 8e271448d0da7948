use std::sync::Arc;

use crate::config::Config;
use crate::matching::scorer::MatchScorer;
use crate::mentor::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable matcher. Default: WeightedMatcher.
    pub matcher: Arc<dyn MatchScorer>,
    /// Mentor chat history. Redis when REDIS_URL is set, otherwise in-memory.
    pub sessions: Arc<dyn SessionStore>,
}
