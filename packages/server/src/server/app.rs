//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{any, get},
    Router,
};
use link_metadata::{BackfillConfig, LinkStore, MetadataExtractor};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::server::routes::{fetch_metadata_handler, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// `None` when no store backend is configured
    pub store: Option<Arc<dyn LinkStore>>,
    pub extractor: Arc<dyn MetadataExtractor>,
    pub backfill: BackfillConfig,
    /// Cancelled on server shutdown; aborts in-flight batches
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn LinkStore>>, extractor: Arc<dyn MetadataExtractor>) -> Self {
        Self {
            store,
            extractor,
            backfill: BackfillConfig::default(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_backfill_config(mut self, config: BackfillConfig) -> Self {
        self.backfill = config;
        self
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Method filtering happens in the handler so other verbs get a JSON 405
        .route("/fetch-metadata", any(fetch_metadata_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
