#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/thetadata-rs/thetadata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Option endpoints of the Theta Data terminal.
//!
//! - [`Options`] - Groups the option endpoint modules
//! - [`OptionsList`] - `/option/list/*` endpoints
//! - [`OptionsHistory`] - `/option/history/*` endpoints
//! - [`Endpoint`] - Shared request path with retries and error translation

/// Shared request path for endpoint modules.
pub mod endpoint;
/// Option history endpoints.
pub mod history;
/// Option list endpoints.
pub mod list;

#[cfg(test)]
mod testing;

pub use endpoint::{Endpoint, RetryPolicy};
pub use history::{DateSelection, HistoryKind, HistoryQuery, OptionsHistory};
pub use list::{ContractsQuery, DatesQuery, OptionsList};

/// Option endpoint modules sharing one transport and error-code table.
#[derive(Debug, Clone)]
pub struct Options {
    list: OptionsList,
    history: OptionsHistory,
}

impl Options {
    /// Create the option modules on top of `endpoint`.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            list: OptionsList::new(endpoint.clone()),
            history: OptionsHistory::new(endpoint),
        }
    }

    /// `/option/list/*` endpoints.
    #[must_use]
    pub const fn list(&self) -> &OptionsList {
        &self.list
    }

    /// `/option/history/*` endpoints.
    #[must_use]
    pub const fn history(&self) -> &OptionsHistory {
        &self.history
    }
}
