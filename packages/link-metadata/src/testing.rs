//! Testing utilities including mock implementations.
//!
//! Useful for exercising the backfill pipeline without network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{ExtractionError, ExtractionResult};
use crate::traits::extractor::MetadataExtractor;
use crate::types::metadata::PageMetadata;

type ErrorFactory = Arc<dyn Fn() -> ExtractionError + Send + Sync>;

/// A mock metadata extractor for testing.
///
/// Unscripted URLs resolve to a title derived from the URL and no
/// description.
#[derive(Default)]
pub struct MockExtractor {
    /// Predefined metadata by URL
    metadata: Arc<RwLock<HashMap<String, PageMetadata>>>,

    /// Predefined failures by URL
    errors: Arc<RwLock<HashMap<String, ErrorFactory>>>,

    /// Artificial latency by URL
    latency: Arc<RwLock<HashMap<String, Duration>>>,

    /// URLs requested, in call order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `metadata` for `url`.
    pub fn with_metadata(self, url: impl Into<String>, metadata: PageMetadata) -> Self {
        self.metadata.write().unwrap().insert(url.into(), metadata);
        self
    }

    /// Fail every extraction of `url` with the error built by `error`.
    pub fn with_error<F>(self, url: impl Into<String>, error: F) -> Self
    where
        F: Fn() -> ExtractionError + Send + Sync + 'static,
    {
        self.errors.write().unwrap().insert(url.into(), Arc::new(error));
        self
    }

    /// Delay the response for `url`.
    pub fn with_latency(self, url: impl Into<String>, delay: Duration) -> Self {
        self.latency.write().unwrap().insert(url.into(), delay);
        self
    }

    /// URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl MetadataExtractor for MockExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult<PageMetadata> {
        self.calls.write().unwrap().push(url.to_string());

        let delay = self.latency.read().unwrap().get(url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let error = self.errors.read().unwrap().get(url).cloned();
        if let Some(error) = error {
            return Err(error());
        }

        let scripted = self.metadata.read().unwrap().get(url).cloned();
        Ok(scripted.unwrap_or_else(|| PageMetadata::new(Some(format!("Title of {}", url)), None)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_extractor_scripting() {
        let extractor = MockExtractor::new()
            .with_metadata(
                "https://a.com",
                PageMetadata::new(Some("A".into()), Some("about a".into())),
            )
            .with_error("https://b.com", || ExtractionError::LoopbackNotAllowed);

        let a = extractor.extract("https://a.com").await.unwrap();
        assert_eq!(a.title.as_deref(), Some("A"));
        assert_eq!(a.description.as_deref(), Some("about a"));

        // Error factories can fire more than once
        assert!(extractor.extract("https://b.com").await.is_err());
        assert!(extractor.extract("https://b.com").await.is_err());

        let c = extractor.extract("https://c.com").await.unwrap();
        assert_eq!(c.title.as_deref(), Some("Title of https://c.com"));
        assert!(c.description.is_none());

        assert_eq!(extractor.calls().len(), 4);
        extractor.clear_calls();
        assert!(extractor.calls().is_empty());
    }
}
