//! HTTP-based metadata extractor.
//!
//! One bounded GET per URL: policy check, fetch under a hard timeout,
//! status/content-type/size checks, then static HTML extraction.

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use reqwest::Response;
use tracing::{debug, warn};

use crate::error::{ExtractionError, ExtractionResult};
use crate::extract::html::extract_metadata;
use crate::security::UrlPolicy;
use crate::traits::extractor::MetadataExtractor;
use crate::types::config::FetchConfig;
use crate::types::metadata::PageMetadata;

const HTML_CONTENT_TYPES: [&str; 2] = ["text/html", "application/xhtml"];

/// Metadata extractor that fetches pages over HTTP.
///
/// # Example
///
/// ```rust,ignore
/// use link_metadata::{HttpMetadataExtractor, MetadataExtractor};
///
/// let extractor = HttpMetadataExtractor::new()?;
/// let meta = extractor.extract("https://example.com").await?;
/// ```
pub struct HttpMetadataExtractor {
    client: reqwest::Client,
    policy: UrlPolicy,
    config: FetchConfig,
}

impl HttpMetadataExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> ExtractionResult<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create an extractor with custom fetch settings.
    pub fn with_config(config: FetchConfig) -> ExtractionResult<Self> {
        // Redirects use reqwest's default policy (up to 10 hops)
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ExtractionError::Request)?;

        Ok(Self {
            client,
            policy: UrlPolicy::new(),
            config,
        })
    }

    /// Replace the URL policy.
    pub fn with_policy(mut self, policy: UrlPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active fetch configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_html(&self, url: &str) -> ExtractionResult<String> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = header_str(&response, CONTENT_TYPE).unwrap_or_default();
        let lowered = content_type.to_ascii_lowercase();
        if !HTML_CONTENT_TYPES.iter().any(|ct| lowered.contains(ct)) {
            return Err(ExtractionError::UnsupportedContentType(content_type));
        }

        // Unparsable or missing lengths are not pre-rejected
        let declared =
            header_str(&response, CONTENT_LENGTH).and_then(|v| v.trim().parse::<u64>().ok());
        if let Some(length) = declared {
            if length > self.config.max_response_bytes {
                return Err(ExtractionError::ResponseTooLarge {
                    content_length: length,
                });
            }
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                ExtractionError::Body(e)
            }
        })
    }

    fn classify(&self, error: reqwest::Error) -> ExtractionError {
        if error.is_timeout() {
            self.timeout_error()
        } else {
            ExtractionError::Request(error)
        }
    }

    fn timeout_error(&self) -> ExtractionError {
        ExtractionError::Timeout {
            timeout_ms: self.config.timeout.as_millis() as u64,
        }
    }
}

fn header_str(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[async_trait]
impl MetadataExtractor for HttpMetadataExtractor {
    async fn extract(&self, url: &str) -> ExtractionResult<PageMetadata> {
        self.policy.validate(url)?;

        // Outer deadline covers the body read as well as the headers
        let html = match tokio::time::timeout(self.config.timeout, self.fetch_html(url)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    url = %url,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "Fetch timed out"
                );
                return Err(self.timeout_error());
            }
        };

        debug!(url = %url, bytes = html.len(), "Page fetched");
        Ok(extract_metadata(&html, url))
    }

    fn name(&self) -> &str {
        "http"
    }
}
