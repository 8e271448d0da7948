mod config;
mod errors;
mod matching;
mod mentor;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::scorer::{MatchWeights, WeightedMatcher};
use crate::mentor::memory::InMemorySessionStore;
use crate::mentor::redis_store::RedisSessionStore;
use crate::mentor::store::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so RUST_LOG from .env applies
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathfinder API v{}", env!("CARGO_PKG_VERSION"));

    let sessions = build_session_store(&config).await?;
    info!("Mentor session store initialized (backend: {})", sessions.backend());

    let weights = MatchWeights::default();
    info!(
        "Matcher weights: skills={} experience={} track={} resource_bonus={}",
        weights.skills, weights.experience, weights.track, weights.resource_track_bonus
    );
    let matcher = Arc::new(WeightedMatcher::new(weights));

    let state = AppState {
        config: config.clone(),
        matcher,
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when REDIS_URL is configured, process memory otherwise.
async fn build_session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str()).context("Invalid REDIS_URL")?;
            let store =
                RedisSessionStore::connect(&client, config.session_ttl, config.session_max_messages)
                    .await
                    .context("Failed to connect to Redis")?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemorySessionStore::new(
            config.session_ttl,
            config.session_max_messages,
        ))),
    }
}
