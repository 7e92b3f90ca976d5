mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ApiKeySource, Config};
use crate::interview::fetcher::GeminiBatchFetcher;
use crate::interview::session::{SessionController, SessionSettings};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(&config.gemini_base_url, &config.gemini_model)?;
    info!("LLM client initialized (model: {})", llm.model());

    // The key is only looked up when a batch is requested; warn early if none is set.
    let keys = ApiKeySource::default();
    if keys.resolve().is_none() {
        warn!(
            "No API key found in {}; generation will fail until one is set",
            keys.source_names().join(", ")
        );
    }

    let settings = SessionSettings {
        target_total: config.target_total,
        batch_size: config.batch_size,
    };
    info!(
        "Session target: {} questions in batches of {} ({} batches)",
        settings.target_total,
        settings.batch_size,
        settings.total_batches()
    );

    let fetcher = Arc::new(GeminiBatchFetcher::new(llm, keys));
    let session = Arc::new(SessionController::new(fetcher, settings));

    // Build app state
    let state = AppState {
        session,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
