//! Extractor trait: URL in, page metadata out.

use async_trait::async_trait;

use crate::error::ExtractionResult;
use crate::types::metadata::PageMetadata;

/// Fetches a URL and extracts its title and description.
///
/// Implementations must either return a complete [`PageMetadata`] or an
/// error; never a partial result.
///
/// # SSRF Protection
///
/// URL-based implementations validate the URL with
/// [`UrlPolicy`](crate::security::UrlPolicy) before any network I/O.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Fetch `url` and extract its metadata.
    async fn extract(&self, url: &str) -> ExtractionResult<PageMetadata>;

    /// Get the extractor name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
