//! Download and parsing of the published error-code document.

use std::io::Cursor;

use polars::prelude::*;
use thetadata_core::error_codes::HTTP_CODE_COLUMN;
use thetadata_core::{Result, ThetaError};
use tracing::debug;

/// Downloads the error-code document from `url`, following redirects.
///
/// # Errors
/// Returns [`ThetaError::Fetch`] if the request fails or the server answers with a
/// non-success status.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    debug!("Fetching error code document: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ThetaError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ThetaError::Fetch(format!("HTTP {status} from {url}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ThetaError::Fetch(e.to_string()))?;

    Ok(bytes.to_vec())
}

/// Parses the error-code CSV into a [`DataFrame`].
///
/// Over-long rows are truncated to the header width. Column names are trimmed,
/// as is every string cell outside the `HttpCode` column.
///
/// # Errors
/// Returns [`ThetaError::Parse`] if the document is not valid CSV.
pub fn parse_error_codes(bytes: &[u8]) -> Result<DataFrame> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| ThetaError::Parse(e.to_string()))?;

    let columns = raw
        .get_columns()
        .iter()
        .map(trim_column)
        .collect::<Result<Vec<_>>>()?;

    DataFrame::new(columns).map_err(|e| ThetaError::Parse(e.to_string()))
}

fn trim_column(column: &Column) -> Result<Column> {
    let name = PlSmallStr::from(column.name().trim());

    if name.as_str() == HTTP_CODE_COLUMN || column.dtype() != &DataType::String {
        return Ok(column.clone().with_name(name));
    }

    let values = column
        .as_materialized_series()
        .str()
        .map_err(|e| ThetaError::Parse(e.to_string()))?;
    let trimmed: Vec<Option<&str>> = values.into_iter().map(|v| v.map(str::trim)).collect();

    Ok(Column::new(name, trimmed))
}
