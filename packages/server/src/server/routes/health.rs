use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    store: String,
    extractor: String,
}

/// Health check endpoint
///
/// Always 200; `store` reads `unconfigured` when batch requests would fail.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let store = state
        .store
        .as_ref()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| "unconfigured".to_string());

    Json(HealthResponse {
        status: "ok",
        store,
        extractor: state.extractor.name().to_string(),
    })
}
