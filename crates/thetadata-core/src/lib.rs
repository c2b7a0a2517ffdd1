#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/thetadata-rs/thetadata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the Theta Data terminal SDK.
//!
//! - [`Transport`](transport::Transport) - Seam between endpoint modules and the HTTP layer
//! - [`ErrorCodeTable`](error_codes::ErrorCodeTable) - Status code lookup and error translation
//! - [`RequestSpec`](request::RequestSpec) - Per-call path and query parameters
//! - [`ResponseEnvelope`](response::ResponseEnvelope) - Successful response bodies
//! - [`ClientConfig`](config::ClientConfig) - Client configuration

/// Client configuration.
pub mod config;
/// Error types for SDK operations.
pub mod error;
/// Error-code reference table and response translation.
pub mod error_codes;
/// Request description types.
pub mod request;
/// Response types and tabular parsing.
pub mod response;
/// Transport trait used by endpoint modules.
pub mod transport;

pub use config::ClientConfig;
pub use error::{ApiError, Result, ThetaError};
pub use error_codes::{DOCS_URL, ErrorCodeEntry, ErrorCodeTable};
pub use request::{ALL_STRIKES, DEFAULT_FORMAT, RequestSpec, RequestType, Right};
pub use response::{RawResponse, ResponseEnvelope};
pub use transport::Transport;
