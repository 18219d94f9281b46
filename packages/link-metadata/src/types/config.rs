//! Configuration types for fetching and backfill runs.

use std::time::Duration;

/// Default User-Agent sent with every metadata fetch.
pub const DEFAULT_USER_AGENT: &str = "Dogmatix/1.0 (+https://api.linkblog.in)";

/// Default wall-clock budget for one fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default upper bound on a declared Content-Length.
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 5_000_000;

/// Default pause between candidates.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Default number of candidates per run.
pub const DEFAULT_LIMIT: usize = 20;

/// Configuration for the HTTP metadata fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Hard timeout covering connect, headers and body
    pub timeout: Duration,

    /// Reject responses whose Content-Length exceeds this
    pub max_response_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl FetchConfig {
    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the response size limit.
    pub fn with_max_response_bytes(mut self, bytes: u64) -> Self {
        self.max_response_bytes = bytes;
        self
    }
}

/// Which links a run should consider. Supplied per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillOptions {
    /// Process exactly this link, whatever its title
    pub link_id: Option<i64>,

    /// Cap on candidates when `link_id` is absent
    pub limit: Option<usize>,
}

impl BackfillOptions {
    /// Target a single link.
    pub fn for_link(link_id: i64) -> Self {
        Self {
            link_id: Some(link_id),
            limit: None,
        }
    }

    /// Process up to `limit` blank-title links.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            link_id: None,
            limit: Some(limit),
        }
    }
}

/// Tunables for the orchestrator. Fixed per deployment.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Pause between successive candidates (not after the last)
    pub delay: Duration,

    /// Candidate cap when the caller gives none
    pub default_limit: usize,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl BackfillConfig {
    /// Set the inter-request delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}
