//! Outbound-fetch security: SSRF policy and store key handling.

pub mod credentials;
pub mod url_policy;

pub use credentials::{ApiKey, StoreCredentials};
pub use url_policy::UrlPolicy;
