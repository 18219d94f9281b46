//! Aggregate report of one backfill run.

use serde::{Deserialize, Serialize};

/// A link that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFailure {
    pub id: i64,
    pub url: String,
    #[serde(rename = "error")]
    pub message: String,
}

/// A link that was written, or considered and left unchanged.
///
/// `title`/`summary` hold the values written; both are `None` for a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDetail {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl LinkDetail {
    /// Whether nothing was written for this link.
    pub fn is_unchanged(&self) -> bool {
        self.title.is_none() && self.summary.is_none()
    }
}

/// Result of a backfill run.
///
/// `processed == errors.len() + details.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Candidates attempted
    pub processed: usize,

    /// Links actually written
    pub updated: usize,

    pub errors: Vec<LinkFailure>,

    pub details: Vec<LinkDetail>,
}

impl BatchOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed candidate.
    pub fn record_failure(&mut self, id: i64, url: impl Into<String>, message: impl Into<String>) {
        self.processed += 1;
        self.errors.push(LinkFailure {
            id,
            url: url.into(),
            message: message.into(),
        });
    }

    /// Record a candidate that was written to the store.
    pub fn record_update(&mut self, detail: LinkDetail) {
        self.processed += 1;
        self.updated += 1;
        self.details.push(detail);
    }

    /// Record a candidate with nothing worth writing.
    pub fn record_unchanged(&mut self, id: i64, url: impl Into<String>) {
        self.processed += 1;
        self.details.push(LinkDetail {
            id,
            url: url.into(),
            title: None,
            summary: None,
        });
    }

    /// Whether no candidates were found.
    pub fn is_empty(&self) -> bool {
        self.processed == 0
    }
}
