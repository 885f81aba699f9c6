//! Client configuration: where the `/users` resource lives.
//!
//! The base URL is passed explicitly to the backend at construction. Reading
//! it from the environment is a convenience for binaries, done once.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::record::RecordId;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "USERS_API_URL";
/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_ENV: &str = "USERS_API_TIMEOUT_SECS";
/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const COLLECTION: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Parse a base URL such as `http://localhost:8000` or `https://host/api/`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeABase(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            timeout: None,
        })
    }

    /// Per-request timeout. Unset means requests wait indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read [`BASE_URL_ENV`] and [`TIMEOUT_ENV`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = lookup(BASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base.trim())?;

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `{base}/users`
    pub fn collection_url(&self) -> Url {
        self.url_with(&[COLLECTION])
    }

    /// `{base}/users/{id}`, with the id percent-encoded as one path segment.
    pub fn item_url(&self, id: &RecordId) -> Url {
        self.url_with(&[COLLECTION, &id.to_string()])
    }

    fn url_with(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected in `new`, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
