//! Request description types.
//!
//! A [`RequestSpec`] is built fresh for every endpoint call and describes the path
//! and query parameters of a single GET against the terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThetaError;

/// Response format requested when the caller does not pick one.
pub const DEFAULT_FORMAT: &str = "ndjson";

/// Strike wildcard matching every strike of an expiration.
pub const ALL_STRIKES: &str = "*";

/// Path and query parameters of a single terminal request.
///
/// Parameters keep their insertion order. A parameter whose value is `None` is
/// part of the description but is never sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestSpec {
    path: String,
    query: Vec<(String, Option<String>)>,
}

impl RequestSpec {
    /// Creates a request for `path`, relative to the API root (e.g. `/option/list/symbols`).
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), Some(value.into())));
        self
    }

    /// Adds a query parameter that is omitted from the wire when `value` is `None`.
    #[must_use]
    pub fn optional_param(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.query.push((key.into(), value.map(Into::into)));
        self
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the value of a parameter that will be sent, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Returns the parameters that are actually sent, in insertion order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
            .collect()
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for (i, (k, v)) in self.query_pairs().into_iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

/// Selects the trade or quote flavour of list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// Trade data.
    Trade,
    /// Quote data.
    Quote,
}

impl RequestType {
    /// Path segment for this request type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trade => "trade",
            Self::Quote => "quote",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = ThetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trade" => Ok(Self::Trade),
            "quote" => Ok(Self::Quote),
            other => Err(ThetaError::InvalidParameter(format!(
                "request type must be trade or quote, got {other}"
            ))),
        }
    }
}

/// Put/call designation of an option contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Right {
    /// Call options.
    Call,
    /// Put options.
    Put,
    /// Both calls and puts.
    #[default]
    Both,
}

impl Right {
    /// Query parameter value sent to the terminal.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Right {
    type Err = ThetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "call" => Ok(Self::Call),
            "p" | "put" => Ok(Self::Put),
            "both" => Ok(Self::Both),
            other => Err(ThetaError::InvalidParameter(format!(
                "right must be call, put or both, got {other}"
            ))),
        }
    }
}
