//! Error-code reference table and response translation.
//!
//! The terminal signals failures with custom HTTP status codes (e.g. `472 NO_DATA`).
//! [`ErrorCodeTable`] maps those codes to their names and descriptions and turns
//! failed responses into [`ApiError`]s.

use std::collections::HashMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApiError, Result, ThetaError};
use crate::response::RawResponse;

/// Documentation page listing the terminal's error codes.
pub const DOCS_URL: &str =
    "https://docs.thetadata.us/Articles/Errors-Exchanges-Conditions/Error-Codes.html";

/// Column holding the status code.
pub const HTTP_CODE_COLUMN: &str = "HttpCode";
/// Column holding the short error name.
pub const ERROR_NAME_COLUMN: &str = "ErrorName";
/// Column holding the description.
pub const DESCRIPTION_COLUMN: &str = "Description";

const MAX_BODY_LEN: usize = 2000;

/// One row of the error-code table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCodeEntry {
    /// HTTP status code.
    pub http_code: u16,
    /// Short error name.
    pub error_name: String,
    /// Human-readable description.
    pub description: String,
}

impl ErrorCodeEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        http_code: u16,
        error_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            http_code,
            error_name: error_name.into(),
            description: description.into(),
        }
    }
}

/// Lookup table from status code to [`ErrorCodeEntry`].
///
/// Codes are unique: when the source holds duplicates, the first row wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorCodeTable {
    entries: HashMap<u16, ErrorCodeEntry>,
}

impl ErrorCodeTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from entries, keeping the first entry for each code.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ErrorCodeEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Builds a table from a frame with `HttpCode`, `ErrorName` and `Description` columns.
    ///
    /// Rows without a usable status code are skipped.
    ///
    /// # Errors
    /// Returns [`ThetaError::Parse`] if a required column is missing.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let codes = http_codes(df.column(HTTP_CODE_COLUMN).map_err(parse_err)?)?;
        let names = strings(df.column(ERROR_NAME_COLUMN).map_err(parse_err)?)?;
        let descriptions = strings(df.column(DESCRIPTION_COLUMN).map_err(parse_err)?)?;

        let mut table = Self::new();
        for (row, ((code, name), description)) in
            codes.into_iter().zip(names).zip(descriptions).enumerate()
        {
            let Some(code) = code else {
                warn!(row, "Skipping error code row without a valid HTTP code");
                continue;
            };
            table.insert(ErrorCodeEntry::new(
                code,
                name.unwrap_or_default(),
                description.unwrap_or_default(),
            ));
        }

        Ok(table)
    }

    fn insert(&mut self, entry: ErrorCodeEntry) {
        if self.entries.contains_key(&entry.http_code) {
            warn!(
                http_code = entry.http_code,
                "Duplicate error code row ignored"
            );
            return;
        }
        self.entries.insert(entry.http_code, entry);
    }

    /// Looks up a status code.
    #[must_use]
    pub fn get(&self, http_code: u16) -> Option<&ErrorCodeEntry> {
        self.entries.get(&http_code)
    }

    /// Number of codes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorCodeEntry> {
        self.entries.values()
    }

    /// Passes successful responses through and converts failures into [`ApiError`].
    ///
    /// Codes missing from the table produce an error named
    /// [`ApiError::UNKNOWN_NAME`] carrying the raw status and a truncated body.
    ///
    /// # Errors
    /// Returns an [`ApiError`] for every non-2xx response.
    pub fn translate(&self, response: RawResponse) -> std::result::Result<RawResponse, ApiError> {
        if response.is_success() {
            return Ok(response);
        }

        let body = truncate_body(&response.text());
        let err = match self.get(response.status) {
            Some(entry) => ApiError {
                status: response.status,
                name: entry.error_name.clone(),
                description: entry.description.clone(),
                body,
                known: true,
            },
            None => ApiError {
                status: response.status,
                name: ApiError::UNKNOWN_NAME.to_string(),
                description: format!(
                    "status code {} is not in the error code table",
                    response.status
                ),
                body,
                known: false,
            },
        };

        Err(err)
    }
}

impl FromIterator<ErrorCodeEntry> for ErrorCodeTable {
    fn from_iter<I: IntoIterator<Item = ErrorCodeEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

fn parse_err(e: PolarsError) -> ThetaError {
    ThetaError::Parse(e.to_string())
}

/// Reads the status code column, which may arrive as integers or padded strings.
fn http_codes(column: &Column) -> Result<Vec<Option<u16>>> {
    let series = column.as_materialized_series();
    if series.dtype() == &DataType::String {
        let values = series.str().map_err(parse_err)?;
        return Ok(values
            .into_iter()
            .map(|v| v.and_then(|s| s.trim().parse::<u16>().ok()))
            .collect());
    }

    let cast = series.cast(&DataType::Int64).map_err(parse_err)?;
    let values = cast.i64().map_err(parse_err)?;
    Ok(values
        .into_iter()
        .map(|v| v.and_then(|code| u16::try_from(code).ok()))
        .collect())
}

fn strings(column: &Column) -> Result<Vec<Option<String>>> {
    let cast = column
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(parse_err)?;
    let values = cast.str().map_err(parse_err)?;
    Ok(values
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_LEN {
        return body.to_string();
    }
    let mut end = MAX_BODY_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}
