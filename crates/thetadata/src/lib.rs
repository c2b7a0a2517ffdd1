#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/thetadata-rs/thetadata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Client SDK for the Theta Data terminal.
//!
//! This crate re-exports the core types and endpoint modules, and provides
//! [`ThetaDataClient`], which wires them to an [`HttpTransport`].

// Core types and traits
pub use thetadata_core::*;

// Error-code cache
pub use thetadata_cache::ErrorCodeCache;

// Endpoint modules
pub use thetadata_options::{
    ContractsQuery, DatesQuery, DateSelection, Endpoint, HistoryKind, HistoryQuery, Options,
    OptionsHistory, OptionsList, RetryPolicy,
};

mod client;
mod transport;

pub use client::{CONNECTION_CHECK_PATH, ThetaDataClient};
pub use transport::HttpTransport;
