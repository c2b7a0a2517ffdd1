//! Response types and tabular parsing.

use std::borrow::Cow;
use std::io::Cursor;

use polars::prelude::*;

use crate::error::{Result, ThetaError};

/// A fully drained HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Body of a successful endpoint call.
///
/// Endpoint modules hand the payload back untouched; converting it into a
/// [`DataFrame`] is a separate call to [`ResponseEnvelope::to_dataframe`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseEnvelope {
    bytes: Vec<u8>,
}

impl ResponseEnvelope {
    /// Wraps a response body.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Returns the raw body.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the envelope, returning the raw body.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Parses the body into a [`DataFrame`].
    ///
    /// `format` must be the format the request was made with. `ndjson` and `csv`
    /// are supported; an empty body yields an empty frame.
    ///
    /// # Errors
    /// Returns [`ThetaError::Parse`] for unsupported formats or malformed bodies.
    pub fn to_dataframe(&self, format: &str) -> Result<DataFrame> {
        if self.bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(DataFrame::empty());
        }

        let cursor = Cursor::new(self.bytes.as_slice());
        match format {
            "ndjson" => JsonReader::new(cursor)
                .with_json_format(JsonFormat::JsonLines)
                .finish()
                .map_err(|e| ThetaError::Parse(e.to_string())),
            "csv" => CsvReadOptions::default()
                .with_has_header(true)
                .into_reader_with_file_handle(cursor)
                .finish()
                .map_err(|e| ThetaError::Parse(e.to_string())),
            other => Err(ThetaError::Parse(format!(
                "cannot parse responses in {other} format into a table"
            ))),
        }
    }
}

impl From<RawResponse> for ResponseEnvelope {
    fn from(response: RawResponse) -> Self {
        Self::new(response.body)
    }
}

impl AsRef<[u8]> for ResponseEnvelope {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
