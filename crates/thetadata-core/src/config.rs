//! Client configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, ThetaError};

/// Default terminal URL for a terminal running on the local machine.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:25503";

/// Path prefix of the v3 REST API.
pub const API_PREFIX: &str = "/v3";

/// Authoritative error-code table published by Theta Data.
pub const DEFAULT_ERROR_CODES_URL: &str = "https://www.dropbox.com/scl/fi/c1zbaq8e45djf5zb8cy26/ErrorCodes.csv?rlkey=ryepbxvk6zmtcwq3n2s3wrf0h&dl=1";

/// Immutable configuration for a Theta Data client.
///
/// Values are fixed once the client is constructed. Use the `with_*` methods to
/// override defaults:
///
/// ```
/// use std::time::Duration;
/// use thetadata_core::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:25503")
///     .with_request_timeout(Duration::from_secs(60))
///     .with_max_concurrent_connections(4);
///
/// assert_eq!(config.max_concurrent_connections, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Terminal URL without the `/v3` prefix, e.g. `http://localhost:25503`.
    pub base_url: String,
    /// Timeout applied to every request.
    pub request_timeout: Duration,
    /// Number of times a request is re-sent after a transport failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for every further attempt.
    pub retry_base_delay: Duration,
    /// Upper bound on in-flight requests, matching the terminal's queue size.
    pub max_concurrent_connections: usize,
    /// Directory holding the error-code cache file.
    pub cache_dir: PathBuf,
    /// Location of the remote error-code document.
    pub error_codes_url: String,
    /// Age after which the cached error-code table is refreshed.
    pub error_codes_max_age_days: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(250),
            max_concurrent_connections: 16,
            cache_dir: PathBuf::from(".cache"),
            error_codes_url: DEFAULT_ERROR_CODES_URL.to_string(),
            error_codes_max_age_days: 30,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the terminal at `base_url` with default settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the number of retries after transport failures. `0` disables retrying.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry.
    #[must_use]
    pub const fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the maximum number of concurrent requests.
    #[must_use]
    pub const fn with_max_concurrent_connections(mut self, connections: usize) -> Self {
        self.max_concurrent_connections = connections;
        self
    }

    /// Set the cache directory.
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl AsRef<Path>) -> Self {
        self.cache_dir = cache_dir.as_ref().to_path_buf();
        self
    }

    /// Set the URL the error-code table is downloaded from.
    #[must_use]
    pub fn with_error_codes_url(mut self, url: impl Into<String>) -> Self {
        self.error_codes_url = url.into();
        self
    }

    /// Set the freshness window of the cached error-code table.
    #[must_use]
    pub const fn with_error_codes_max_age_days(mut self, days: u32) -> Self {
        self.error_codes_max_age_days = days;
        self
    }

    /// Returns the API root: the base URL without trailing slashes plus `/v3`.
    ///
    /// # Errors
    /// Returns [`ThetaError::InvalidParameter`] if the base URL does not parse, has
    /// no host, or does not use the `http`/`https` scheme.
    pub fn api_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ThetaError::InvalidParameter(
                "terminal base URL is empty".to_string(),
            ));
        }

        let url = Url::parse(trimmed).map_err(|e| {
            ThetaError::InvalidParameter(format!("invalid terminal base URL {trimmed}: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ThetaError::InvalidParameter(format!(
                "terminal base URL must use http or https, got {trimmed}"
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ThetaError::InvalidParameter(format!(
                "terminal base URL has no host: {trimmed}"
            )));
        }

        Ok(format!("{trimmed}{API_PREFIX}"))
    }

    /// Check the settings that would make a client unusable.
    ///
    /// # Errors
    /// Returns [`ThetaError::InvalidParameter`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.api_url()?;
        if self.max_concurrent_connections == 0 {
            return Err(ThetaError::InvalidParameter(
                "max_concurrent_connections must be at least 1".to_string(),
            ));
        }
        if self.error_codes_url.trim().is_empty() {
            return Err(ThetaError::InvalidParameter(
                "error_codes_url is empty".to_string(),
            ));
        }
        Ok(())
    }
}
