//! Metadata extracted from a fetched page.

use serde::{Deserialize, Serialize};

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Title and description for one URL. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageMetadata {
    /// Create metadata, applying the length limits.
    pub fn new(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title: truncate(title, MAX_TITLE_LENGTH),
            description: truncate(description, MAX_DESCRIPTION_LENGTH),
        }
    }

    /// Non-empty title, if any.
    pub fn usable_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Non-empty description, if any.
    pub fn usable_description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// Hard cut at `max` characters; empty input becomes `None`.
pub fn truncate(value: Option<String>, max: usize) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    match value.char_indices().nth(max) {
        Some((byte_idx, _)) => Some(value[..byte_idx].to_string()),
        None => Some(value),
    }
}
