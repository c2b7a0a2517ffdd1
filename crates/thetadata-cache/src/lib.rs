#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/thetadata-rs/thetadata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Error-code reference cache for the Theta Data terminal SDK.
//!
//! - [`ErrorCodeCache`] - Loads the error-code table, refreshing it when stale
//! - [`document`] - Download and parsing of the published CSV document
//! - [`store`] - Parquet persistence and freshness checks

/// Error-code cache with a freshness window.
pub mod cache;
/// Remote error-code document.
pub mod document;
/// Parquet cache file helpers.
pub mod store;

pub use cache::{CACHE_FILE_NAME, DEFAULT_DOWNLOAD_TIMEOUT, ErrorCodeCache};
pub use document::parse_error_codes;
pub use store::{is_fresh, read_cache, write_cache};
