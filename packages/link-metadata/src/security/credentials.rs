//! Store API keys.
//!
//! Keys live in a `secrecy` box so `Debug` output and log fields never carry
//! the value; call [`ApiKey::expose`] only when building a request.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// PostgREST service key (`sb_secret_*`).
pub struct ApiKey(SecretBox<str>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretBox::new(key.into().into_boxed_str()))
    }

    /// Raw key, for the `apikey` and `Authorization` headers.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for ApiKey {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Connection details for a PostgREST-compatible link store.
#[derive(Clone, Debug)]
pub struct StoreCredentials {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub base_url: String,

    pub api_key: ApiKey,
}

impl StoreCredentials {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: ApiKey::new(api_key),
        }
    }

    /// REST endpoint for `table`, tolerating a trailing slash on the base URL.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}
