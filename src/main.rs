use anyhow::Context;
use std::{sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use pick_song::{
    api::{create_router, AppState},
    config::Config,
    db::{FileStore, RecommendationCache},
    services::providers::{CompletionClient, GeminiClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pick_song=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let client: Option<Arc<dyn CompletionClient>> = match &config.gemini_api_key {
        Some(key) if !key.trim().is_empty() => Some(Arc::new(GeminiClient::new(
            key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?)),
        _ => None,
    };

    let data_dir = config.resolved_data_dir();
    let store = FileStore::open(&data_dir)
        .await
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

    let (state, writer_handle) = AppState::new(
        client,
        RecommendationCache::new(config.cache_capacity),
        Arc::new(store),
    )
    .await;
    let state = Arc::new(state);

    // The session opens on today's picks
    let session = state.session.clone();
    tokio::spawn(async move {
        session.start().await;
    });

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, model = %config.gemini_model, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    writer_handle.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
