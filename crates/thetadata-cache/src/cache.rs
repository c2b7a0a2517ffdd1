//! Error-code cache with a freshness window.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use thetadata_core::config::DEFAULT_ERROR_CODES_URL;
use thetadata_core::{ClientConfig, ErrorCodeTable, Result, ThetaError};
use tracing::{debug, info, instrument, warn};

use crate::document::{fetch_document, parse_error_codes};
use crate::store::{is_fresh, modified_at, read_cache, write_cache};

/// File name of the cached table inside the cache directory.
pub const CACHE_FILE_NAME: &str = "error_codes.parquet";

/// Default freshness window in days.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 30;

/// Default timeout for downloading the error-code document.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Loads the terminal's error-code table, keeping a parquet copy on disk.
///
/// The cache is meant to be loaded once per client. Two processes refreshing a
/// cold cache at the same time may both download and write the file.
#[derive(Debug, Clone)]
pub struct ErrorCodeCache {
    cache_dir: PathBuf,
    max_age_days: u32,
    source_url: String,
    client: reqwest::Client,
}

/// What was found on disk before deciding whether to download.
enum CachedTable {
    Missing,
    Stale,
    Fresh(Result<ErrorCodeTable>),
}

impl ErrorCodeCache {
    /// Create a cache rooted at `cache_dir` with the default source, window and
    /// download timeout.
    #[must_use]
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            source_url: DEFAULT_ERROR_CODES_URL.to_string(),
            client: download_client(DEFAULT_DOWNLOAD_TIMEOUT),
        }
    }

    /// Create a cache from the client configuration. Downloads use the
    /// configured request timeout.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.cache_dir)
            .with_max_age_days(config.error_codes_max_age_days)
            .with_source_url(config.error_codes_url.clone())
            .with_timeout(config.request_timeout)
    }

    /// Set the freshness window.
    #[must_use]
    pub const fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    /// Set the URL of the error-code document.
    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Set the download timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = download_client(timeout);
        self
    }

    /// Use a custom HTTP client for downloads.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Path of the cache file.
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    /// When the cache file was last written, if it exists.
    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        modified_at(&self.cache_path()).map(DateTime::<Utc>::from)
    }

    /// Returns the error-code table.
    ///
    /// A cache file younger than the freshness window is read without touching the
    /// network. A missing, stale or unreadable file triggers a download.
    ///
    /// # Errors
    /// Returns [`ThetaError::Fetch`] if the document cannot be downloaded, or a
    /// parse/cache error if it cannot be processed or stored. Download failures
    /// are not retried.
    #[instrument(skip(self), fields(path = %self.cache_path().display()))]
    pub async fn load(&self) -> Result<ErrorCodeTable> {
        let path = self.cache_path();
        let max_age = TimeDelta::days(i64::from(self.max_age_days));

        let cached = tokio::task::spawn_blocking(move || read_if_fresh(&path, max_age))
            .await
            .map_err(|e| ThetaError::Cache(e.to_string()))?;

        match cached {
            CachedTable::Fresh(Ok(table)) => {
                debug!(entries = table.len(), "Using cached error codes");
                return Ok(table);
            }
            CachedTable::Fresh(Err(e)) => warn!("Ignoring unreadable error code cache: {}", e),
            CachedTable::Stale => debug!("Error code cache is stale"),
            CachedTable::Missing => debug!("No error code cache"),
        }

        self.refresh().await
    }

    /// Downloads the error-code document and rewrites the cache file.
    ///
    /// # Errors
    /// Same as [`ErrorCodeCache::load`].
    pub async fn refresh(&self) -> Result<ErrorCodeTable> {
        let bytes = fetch_document(&self.client, &self.source_url).await?;
        let mut df = parse_error_codes(&bytes)?;
        let table = ErrorCodeTable::from_dataframe(&df)?;

        let path = self.cache_path();
        tokio::task::spawn_blocking(move || write_cache(&path, &mut df))
            .await
            .map_err(|e| ThetaError::Cache(e.to_string()))??;
        info!(entries = table.len(), "Refreshed error code cache");

        Ok(table)
    }
}

/// Runs on a blocking thread: stat, freshness check and parquet read.
fn read_if_fresh(path: &Path, max_age: TimeDelta) -> CachedTable {
    match modified_at(path) {
        None => CachedTable::Missing,
        Some(modified) if !is_fresh(modified, Utc::now(), max_age) => CachedTable::Stale,
        Some(_) => CachedTable::Fresh(
            read_cache(path).and_then(|df| ErrorCodeTable::from_dataframe(&df)),
        ),
    }
}

fn download_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::default()
        })
}
