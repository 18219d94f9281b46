//! Metadata extraction: bounded HTTP fetch plus static HTML parsing.
//!
//! - [`HttpMetadataExtractor`] - SSRF-guarded fetcher implementing `MetadataExtractor`
//! - [`extract_metadata`] - pure HTML → title/description with fallbacks

pub mod fetcher;
pub mod html;

pub use fetcher::HttpMetadataExtractor;
pub use html::extract_metadata;
