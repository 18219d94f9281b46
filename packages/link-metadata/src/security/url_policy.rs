//! URL policy for SSRF protection.
//!
//! Checks are purely syntactic and run before any network I/O:
//! - Scheme must be http or https
//! - Loopback names/addresses (localhost, 127.0.0.1, ::1) are rejected
//! - Literal IPv4 hosts in private or link-local ranges are rejected
//!
//! Hostnames are NOT resolved, so a public name pointing at a private
//! address passes, and IPv6 private ranges are not covered. Redirect targets
//! are not re-checked either.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use url::{Host, Url};

use crate::error::{ExtractionError, ExtractionResult};

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

/// URL validator applied to every link before it is fetched.
#[derive(Debug, Clone)]
pub struct UrlPolicy {
    /// Blocked hostnames (lowercase, IPv6 without brackets)
    loopback_hosts: HashSet<String>,

    /// Blocked IPv4 ranges
    private_ranges: Vec<Ipv4Net>,

    /// Hosts that bypass host checks (scheme is still enforced)
    allowed_hosts: HashSet<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlPolicy {
    /// Create a policy with the default deny rules.
    pub fn new() -> Self {
        Self {
            loopback_hosts: LOOPBACK_HOSTS.into_iter().map(String::from).collect(),
            private_ranges: vec![
                Ipv4Net::new(Ipv4Addr::new(10, 0, 0, 0), 8).expect("valid prefix"),
                Ipv4Net::new(Ipv4Addr::new(172, 16, 0, 0), 12).expect("valid prefix"),
                Ipv4Net::new(Ipv4Addr::new(192, 168, 0, 0), 16).expect("valid prefix"),
                // Link-local / cloud metadata
                Ipv4Net::new(Ipv4Addr::new(169, 254, 0, 0), 16).expect("valid prefix"),
            ],
            allowed_hosts: HashSet::new(),
        }
    }

    /// Add an allowed host (bypasses loopback and private-range checks).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into().to_ascii_lowercase());
        self
    }

    /// Validate a URL, returning the parsed form on success.
    pub fn validate(&self, url: &str) -> ExtractionResult<Url> {
        let parsed = Url::parse(url).map_err(|_| ExtractionError::InvalidUrl)?;

        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(ExtractionError::SchemeNotAllowed(parsed.scheme().to_string()));
        }

        let host = match parsed.host() {
            Some(host) => host,
            None => return Err(ExtractionError::InvalidUrl),
        };

        let hostname = match &host {
            Host::Domain(domain) => domain.to_ascii_lowercase(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6(addr) => addr.to_string(),
        };

        if self.allowed_hosts.contains(&hostname) {
            return Ok(parsed);
        }

        if self.loopback_hosts.contains(&hostname) {
            return Err(ExtractionError::LoopbackNotAllowed);
        }

        if let Host::Ipv4(addr) = host {
            if self.private_ranges.iter().any(|net| net.contains(&addr)) {
                return Err(ExtractionError::PrivateAddressNotAllowed);
            }
        }

        Ok(parsed)
    }
}
