//! Shared helpers for router tests.
//!
//! Builds the real router over an in-memory store and a scripted extractor,
//! then drives it with `oneshot` requests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use link_metadata::{stores::MemoryLinkStore, testing::MockExtractor, BackfillConfig, LinkStore};
use serde_json::Value;
use server_core::server::{build_app, AppState};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt; // for `oneshot`

pub struct TestHarness {
    pub store: Arc<MemoryLinkStore>,
    pub extractor: Arc<MockExtractor>,
    pub shutdown: CancellationToken,
    app: Router,
}

impl TestHarness {
    pub fn new(store: MemoryLinkStore, extractor: MockExtractor) -> Self {
        init_tracing();

        let store = Arc::new(store);
        let extractor = Arc::new(extractor);
        let shutdown = CancellationToken::new();
        let state = AppState::new(Some(store.clone() as Arc<dyn LinkStore>), extractor.clone())
            .with_backfill_config(BackfillConfig::default().with_delay(Duration::ZERO))
            .with_shutdown(shutdown.clone());

        Self {
            store,
            extractor,
            shutdown,
            app: build_app(state),
        }
    }

    /// Router with no store configured.
    pub fn without_store() -> Router {
        init_tracing();
        build_app(AppState::new(None, Arc::new(MockExtractor::new())))
    }

    pub async fn request(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        send(self.app.clone(), method, uri).await
    }
}

pub async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
