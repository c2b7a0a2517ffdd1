//! Error types for SDK operations.
//!
//! This module defines [`ThetaError`], which covers every failure surfaced by the
//! SDK, and [`ApiError`], the enriched form of a non-success terminal response.

use thiserror::Error;

use crate::error_codes::DOCS_URL;

/// Errors that can occur while talking to the Theta Data terminal.
#[derive(Error, Debug)]
pub enum ThetaError {
    /// Network or connection failure reaching the terminal.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote error-code document could not be retrieved.
    #[error("Failed to fetch error code reference: {0}")]
    Fetch(String),

    /// The terminal answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The connectivity self-test run during client construction failed.
    #[error("Failed to connect to the Theta Data terminal: {0}")]
    Connection(String),

    /// Error reading or writing the local cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Error parsing a document or response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ThetaError {
    /// Returns true for failures that may succeed when the request is sent again.
    ///
    /// Only transport failures qualify; the terminal's own rejections are final.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias using [`ThetaError`].
pub type Result<T> = std::result::Result<T, ThetaError>;

/// A non-success response from the terminal, enriched from the error-code table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "HTTP {status} ({name}): {description}. See {docs} for more information.",
    docs = DOCS_URL
)]
pub struct ApiError {
    /// HTTP status code returned by the terminal.
    pub status: u16,
    /// Short error name, e.g. `NO_DATA`.
    pub name: String,
    /// Human-readable description of the error.
    pub description: String,
    /// Response body, truncated.
    pub body: String,
    /// Whether the status was found in the error-code table.
    pub known: bool,
}

impl ApiError {
    /// Name used when a status code is missing from the error-code table.
    pub const UNKNOWN_NAME: &'static str = "UNKNOWN_ERROR_CODE";

    /// Link to the terminal's error-code documentation.
    #[must_use]
    pub const fn docs_url(&self) -> &'static str {
        DOCS_URL
    }
}
