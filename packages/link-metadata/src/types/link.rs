//! Link records as stored, and the partial updates the backfill writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an optional text field counts as unset.
///
/// `None`, `""` and whitespace-only strings are all blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// A stored link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct LinkRecord {
    pub id: i64,

    /// Immutable after creation
    pub url: String,

    pub title: Option<String>,

    pub summary: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LinkRecord {
    /// Create a link with no title or summary.
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: None,
            summary: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// A link is a backfill candidate iff its title is blank.
    pub fn needs_metadata(&self) -> bool {
        is_blank(self.title.as_deref())
    }

    /// Whether the summary is unset (and may be filled).
    pub fn summary_is_blank(&self) -> bool {
        is_blank(self.summary.as_deref())
    }

    /// Apply an update in place (used by in-memory backends).
    pub fn apply(&mut self, update: &LinkUpdate) {
        if let Some(title) = &update.title {
            self.title = Some(title.clone());
        }
        if let Some(summary) = &update.summary {
            self.summary = Some(summary.clone());
        }
        self.updated_at = Some(update.updated_at);
    }
}

/// Field-level update payload for one link.
///
/// Absent fields are left untouched by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl LinkUpdate {
    /// Whether the update would change any content field.
    pub fn is_noop(&self) -> bool {
        self.title.is_none() && self.summary.is_none()
    }
}
