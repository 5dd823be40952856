//! Store configuration.

use std::env;
use std::time::Duration;

/// Default remote origin.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Default key of the overlay slot.
pub const DEFAULT_STORAGE_KEY: &str = "users";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`crate::UserStore`] and its [`crate::HttpRemote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the remote origin, without the `users` path
    pub base_url: String,
    /// Key under which the overlay blob is stored
    pub storage_key: String,
    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StoreConfig {
    /// Default config pointed at another remote origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the overlay key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `UMAPP_API_BASE_URL` (default [`DEFAULT_BASE_URL`])
    /// - `UMAPP_STORAGE_KEY` (default [`DEFAULT_STORAGE_KEY`])
    /// - `UMAPP_REQUEST_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            env::var("UMAPP_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(base_url));
        }

        let storage_key =
            env::var("UMAPP_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());

        let timeout_secs: u64 = env::var("UMAPP_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            base_url,
            storage_key,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// URL of the users collection.
    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url.trim_end_matches('/'))
    }

    /// URL of a single user.
    pub fn user_url(&self, id: crate::UserId) -> String {
        format!("{}/{id}", self.users_url())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("UMAPP_API_BASE_URL must be an http(s) URL, got {0:?}")]
    InvalidUrl(String),

    #[error("Invalid UMAPP_REQUEST_TIMEOUT_SECS value")]
    InvalidTimeout,
}
