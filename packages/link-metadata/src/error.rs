//! Typed errors for the link metadata library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. The `Display` output of
//! [`ExtractionError`] and [`StoreError`] is what ends up in the `error`
//! field of a batch report, so the messages are written for operators.

use thiserror::Error;

/// Errors that can occur while fetching and extracting metadata for one URL.
///
/// Every variant is recoverable at the batch level: the orchestrator records
/// it against the link and moves on.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// URL could not be parsed
    #[error("Invalid URL format")]
    InvalidUrl,

    /// URL scheme is not http or https (e.g. file://, ftp://)
    #[error("URL scheme not allowed (not http or https): {0}")]
    SchemeNotAllowed(String),

    /// Host is a loopback name or address
    #[error("Localhost not allowed")]
    LoopbackNotAllowed,

    /// Host is a literal IPv4 address in a private or link-local range
    #[error("Private IP address not allowed")]
    PrivateAddressNotAllowed,

    /// Request exceeded the wall-clock budget
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport-level failure (DNS, TLS, connection reset, redirect loop)
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Response is not an HTML document
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Declared Content-Length is above the configured limit
    #[error("Response too large: {content_length} bytes")]
    ResponseTooLarge { content_length: u64 },

    /// Body could not be read or decoded
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl ExtractionError {
    /// Whether the URL was rejected by policy before any network I/O.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl
                | Self::SchemeNotAllowed(_)
                | Self::LoopbackNotAllowed
                | Self::PrivateAddressNotAllowed
        )
    }
}

/// Errors raised by a [`LinkStore`](crate::traits::store::LinkStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store
    #[error("store request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Store rejected the request
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Store answered with a payload we could not decode
    #[error("failed to decode store response: {0}")]
    Decode(String),

    /// Update targeted a link that does not exist
    #[error("Link #{id} not found")]
    NotFound { id: i64 },

    /// Injected or otherwise unclassified failure
    #[error("{0}")]
    Other(String),

    /// Database driver error
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures that abort a whole backfill run.
///
/// Per-link failures never surface here; they are folded into the
/// [`BatchOutcome`](crate::types::outcome::BatchOutcome).
#[derive(Debug, Error)]
pub enum BackfillError {
    /// Store credentials or environment are missing
    #[error("{0}")]
    Configuration(String),

    /// Candidate query failed
    #[error("Failed to query links: {0}")]
    Selection(#[source] StoreError),

    /// Caller aborted the run
    #[error("backfill cancelled")]
    Cancelled,
}

/// Result type alias for extraction operations.
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for backfill runs.
pub type BackfillResult<T> = std::result::Result<T, BackfillError>;
