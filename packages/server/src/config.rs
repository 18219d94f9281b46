use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use link_metadata::stores::{PostgresLinkStore, PostgrestLinkStore};
use link_metadata::{ApiKey, FetchConfig, HttpMetadataExtractor, LinkStore, StoreCredentials};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<ApiKey>,
    pub database_url: Option<String>,
    pub user_agent: Option<String>,
}

/// Where link records live.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// Direct Postgres connection
    Postgres(String),

    /// PostgREST endpoint (Supabase)
    Postgrest(StoreCredentials),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            supabase_url: var("SUPABASE_URL"),
            supabase_key: var("SB_PUBLISHABLE_KEY").map(ApiKey::from),
            database_url: var("DATABASE_URL"),
            user_agent: var("METADATA_USER_AGENT"),
        })
    }

    /// The configured store backend, if any. `DATABASE_URL` wins.
    pub fn store_backend(&self) -> Option<StoreBackend> {
        if let Some(url) = &self.database_url {
            return Some(StoreBackend::Postgres(url.clone()));
        }

        match (&self.supabase_url, &self.supabase_key) {
            (Some(url), Some(key)) => Some(StoreBackend::Postgrest(StoreCredentials {
                base_url: url.clone(),
                api_key: key.clone(),
            })),
            _ => None,
        }
    }

    /// Fetch settings for the metadata extractor.
    pub fn fetch_config(&self) -> FetchConfig {
        match &self.user_agent {
            Some(agent) => FetchConfig::default().with_user_agent(agent.clone()),
            None => FetchConfig::default(),
        }
    }

    /// Build the metadata extractor.
    pub fn extractor(&self) -> Result<HttpMetadataExtractor> {
        HttpMetadataExtractor::with_config(self.fetch_config())
            .context("Failed to create metadata extractor")
    }

    /// Connect to the configured store, or `None` when nothing is configured.
    pub async fn connect_store(&self) -> Result<Option<Arc<dyn LinkStore>>> {
        let store: Arc<dyn LinkStore> = match self.store_backend() {
            Some(StoreBackend::Postgres(url)) => Arc::new(
                PostgresLinkStore::new(&url)
                    .await
                    .context("Failed to connect to database")?,
            ),
            Some(StoreBackend::Postgrest(credentials)) => {
                Arc::new(PostgrestLinkStore::new(credentials))
            }
            None => return Ok(None),
        };

        tracing::info!(backend = store.name(), "Link store configured");
        Ok(Some(store))
    }
}
