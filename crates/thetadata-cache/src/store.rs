//! Parquet cache file helpers.

use std::fs::{self, File};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, TimeDelta, Utc};
use polars::prelude::*;
use thetadata_core::{Result, ThetaError};

/// Reads a cached error-code frame.
///
/// # Errors
/// Returns [`ThetaError::Cache`] if the file cannot be opened or is not valid parquet.
pub fn read_cache(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .map_err(|e| ThetaError::Cache(format!("{}: {e}", path.display())))?;

    ParquetReader::new(file)
        .finish()
        .map_err(|e| ThetaError::Cache(format!("{}: {e}", path.display())))
}

/// Writes an error-code frame, creating parent directories as needed.
///
/// # Errors
/// Returns [`ThetaError::Cache`] if the directory or file cannot be written.
pub fn write_cache(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ThetaError::Cache(format!("{}: {e}", parent.display())))?;
    }

    let file = File::create(path)
        .map_err(|e| ThetaError::Cache(format!("{}: {e}", path.display())))?;

    ParquetWriter::new(file)
        .finish(df)
        .map_err(|e| ThetaError::Cache(e.to_string()))?;

    Ok(())
}

/// Returns true if a file modified at `modified` is younger than `max_age` at `now`.
#[must_use]
pub fn is_fresh(modified: SystemTime, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
    DateTime::<Utc>::from(modified) > now - max_age
}

/// Returns the modification time of `path`, or `None` if it does not exist.
pub(crate) fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
