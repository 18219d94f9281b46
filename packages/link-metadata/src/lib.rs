//! Link metadata backfill.
//!
//! Fills in missing titles and summaries for saved links by fetching each
//! page and reading its Open Graph and HTML metadata.
//!
//! # Usage
//!
//! ```rust,ignore
//! use link_metadata::{backfill_links, BackfillConfig, BackfillOptions, HttpMetadataExtractor};
//! use link_metadata::stores::MemoryLinkStore;
//! use tokio_util::sync::CancellationToken;
//!
//! let store = MemoryLinkStore::new();
//! let extractor = HttpMetadataExtractor::new()?;
//!
//! let outcome = backfill_links(
//!     &store,
//!     &extractor,
//!     &BackfillOptions::with_limit(10),
//!     &BackfillConfig::default(),
//!     &CancellationToken::new(),
//! )
//! .await?;
//! println!("{} of {} links updated", outcome.updated, outcome.processed);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (LinkStore, MetadataExtractor)
//! - [`types`] - Link records, metadata, batch outcomes and config
//! - [`extract`] - HTTP fetch and HTML metadata extraction
//! - [`pipeline`] - Batch orchestration
//! - [`stores`] - Storage implementations (memory, PostgREST, Postgres)
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod security;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    BackfillError, BackfillResult, ExtractionError, ExtractionResult, StoreError, StoreResult,
};
pub use extract::{extract_metadata, HttpMetadataExtractor};
pub use pipeline::backfill_links;
pub use security::{ApiKey, StoreCredentials, UrlPolicy};
pub use traits::{
    extractor::MetadataExtractor,
    store::{LinkQuery, LinkStore},
};
pub use types::{
    config::{BackfillConfig, BackfillOptions, FetchConfig},
    link::{is_blank, LinkRecord, LinkUpdate},
    metadata::{PageMetadata, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH},
    outcome::{BatchOutcome, LinkDetail, LinkFailure},
};
