//! PostgREST (Supabase) link storage.
//!
//! Talks to the `links` table through the REST API:
//! - select: `GET /rest/v1/links?select=*&order=created_at.desc&...`
//! - update: `PATCH /rest/v1/links?id=eq.N` with `Prefer: return=representation`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{StoreError, StoreResult};
use crate::security::StoreCredentials;
use crate::traits::store::{LinkQuery, LinkStore};
use crate::types::link::{LinkRecord, LinkUpdate};

const LINKS_TABLE: &str = "links";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
}

/// Link store backed by a PostgREST endpoint.
pub struct PostgrestLinkStore {
    client: reqwest::Client,
    credentials: StoreCredentials,
}

impl PostgrestLinkStore {
    /// Create a store for the given project credentials.
    pub fn new(credentials: StoreCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    fn endpoint(&self) -> String {
        self.credentials.table_url(LINKS_TABLE)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let key = self.credentials.api_key.expose();
        request
            .header("apikey", key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", key))
    }

    /// Build the PostgREST query string for a [`LinkQuery`].
    fn query_params(query: &LinkQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(id) = query.id {
            params.push(("id", format!("eq.{}", id)));
        }
        if query.blank_title_only {
            // title.is.null matches NULL, title.eq. (no value) matches ''
            params.push(("or", "(title.is.null,title.eq.)".to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    async fn read_rows(response: reqwest::Response) -> StoreResult<Vec<LinkRecord>> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::api_error(status, response).await);
        }
        response
            .json::<Vec<LinkRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> StoreError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body
                }
            });
        StoreError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl LinkStore for PostgrestLinkStore {
    #[instrument(skip(self), fields(table = LINKS_TABLE))]
    async fn select(&self, query: &LinkQuery) -> StoreResult<Vec<LinkRecord>> {
        let response = self
            .authorized(self.client.get(self.endpoint()))
            .query(&Self::query_params(query))
            .send()
            .await
            .map_err(StoreError::Request)?;

        let rows = Self::read_rows(response).await?;
        debug!(rows = rows.len(), "PostgREST select complete");
        Ok(rows)
    }

    #[instrument(skip(self, update), fields(table = LINKS_TABLE))]
    async fn update_by_id(&self, id: i64, update: &LinkUpdate) -> StoreResult<LinkRecord> {
        let response = self
            .authorized(self.client.patch(self.endpoint()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await
            .map_err(StoreError::Request)?;

        Self::read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound { id })
    }

    fn name(&self) -> &str {
        "postgrest"
    }
}
