// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::{
    server::{build_app, AppState},
    Config,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,link_metadata=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting link metadata service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        store_configured = config.store_backend().is_some(),
        "Configuration loaded"
    );

    let store = config.connect_store().await?;
    if store.is_none() {
        tracing::warn!("No link store configured; /fetch-metadata will answer 500");
    }
    let extractor = Arc::new(config.extractor()?);

    let shutdown = CancellationToken::new();
    let state = AppState::new(store, extractor).with_shutdown(shutdown.clone());
    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Backfill: http://localhost:{}/fetch-metadata", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await
        .context("Server error")?;

    Ok(())
}
