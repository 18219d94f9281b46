//! Storage trait for link records.
//!
//! The backfill only needs two operations, so the trait stays narrow and
//! carries no dependency on a particular database client.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::link::{LinkRecord, LinkUpdate};

/// Filter for [`LinkStore::select`]. Results are always newest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkQuery {
    /// Match exactly this id
    pub id: Option<i64>,

    /// Only links whose title is NULL or empty
    pub blank_title_only: bool,

    /// Maximum rows returned
    pub limit: Option<usize>,
}

impl LinkQuery {
    /// Select one link by id.
    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Select up to `limit` links with a NULL or empty title.
    pub fn blank_titles(limit: usize) -> Self {
        Self {
            id: None,
            blank_title_only: true,
            limit: Some(limit),
        }
    }

    /// Whether a record satisfies this filter (ignoring `limit`).
    ///
    /// Mirrors the store-level predicate: whitespace-only titles do NOT
    /// match `blank_title_only` here.
    pub fn matches(&self, link: &LinkRecord) -> bool {
        if let Some(id) = self.id {
            if link.id != id {
                return false;
            }
        }
        if self.blank_title_only {
            return link.title.as_deref().map_or(true, str::is_empty);
        }
        true
    }
}

/// Persistent link storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Fetch links matching the filter, ordered by `created_at` descending.
    async fn select(&self, query: &LinkQuery) -> StoreResult<Vec<LinkRecord>>;

    /// Apply an update to one link and return the stored row.
    ///
    /// Must be a single atomic write. Fails with `StoreError::NotFound`
    /// when no row has this id.
    async fn update_by_id(&self, id: i64, update: &LinkUpdate) -> StoreResult<LinkRecord>;

    /// Get the store name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
