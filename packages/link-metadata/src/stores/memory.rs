//! In-memory link storage for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::{LinkQuery, LinkStore};
use crate::types::link::{LinkRecord, LinkUpdate};

/// In-memory storage for links.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart. Failures can be injected to exercise
/// error paths.
#[derive(Default)]
pub struct MemoryLinkStore {
    links: RwLock<HashMap<i64, LinkRecord>>,
    select_failure: RwLock<Option<String>>,
    update_failures: RwLock<HashMap<i64, String>>,
    update_calls: RwLock<Vec<(i64, LinkUpdate)>>,
}

impl MemoryLinkStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a link (replacing any with the same id).
    pub fn insert(&self, link: LinkRecord) {
        self.links.write().unwrap().insert(link.id, link);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_link(self, link: LinkRecord) -> Self {
        self.insert(link);
        self
    }

    /// Make every `select` fail with `message`.
    pub fn fail_select(self, message: impl Into<String>) -> Self {
        *self.select_failure.write().unwrap() = Some(message.into());
        self
    }

    /// Make `update_by_id` fail for `id` with `message`.
    pub fn fail_update(self, id: i64, message: impl Into<String>) -> Self {
        self.update_failures.write().unwrap().insert(id, message.into());
        self
    }

    /// Get a link by id.
    pub fn get(&self, id: i64) -> Option<LinkRecord> {
        self.links.read().unwrap().get(&id).cloned()
    }

    /// Updates attempted so far, in call order.
    pub fn update_calls(&self) -> Vec<(i64, LinkUpdate)> {
        self.update_calls.read().unwrap().clone()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn select(&self, query: &LinkQuery) -> StoreResult<Vec<LinkRecord>> {
        if let Some(message) = self.select_failure.read().unwrap().clone() {
            return Err(StoreError::Other(message));
        }

        let mut links: Vec<LinkRecord> = self
            .links
            .read()
            .unwrap()
            .values()
            .filter(|link| query.matches(link))
            .cloned()
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        if let Some(limit) = query.limit {
            links.truncate(limit);
        }

        Ok(links)
    }

    async fn update_by_id(&self, id: i64, update: &LinkUpdate) -> StoreResult<LinkRecord> {
        self.update_calls.write().unwrap().push((id, update.clone()));

        if let Some(message) = self.update_failures.read().unwrap().get(&id) {
            return Err(StoreError::Other(message.clone()));
        }

        let mut links = self.links.write().unwrap();
        let link = links.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        link.apply(update);
        Ok(link.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
