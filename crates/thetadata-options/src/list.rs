//! Option list endpoints.
//!
//! These endpoints enumerate what the terminal has data for: root symbols,
//! expirations of a root, strikes of an expiration, trading dates of a contract
//! and the contracts that traded or quoted on a date.

use thetadata_core::{
    ALL_STRIKES, DEFAULT_FORMAT, RequestSpec, RequestType, ResponseEnvelope, Result, Right,
};

use crate::endpoint::Endpoint;

const LIST_PATH: &str = "/option/list";

/// Request for `/option/list/symbols`.
#[must_use]
pub fn symbols_request(format: &str) -> RequestSpec {
    RequestSpec::new(format!("{LIST_PATH}/symbols")).param("format", format)
}

/// Request for `/option/list/expirations`.
#[must_use]
pub fn expirations_request(symbol: &str, format: &str) -> RequestSpec {
    RequestSpec::new(format!("{LIST_PATH}/expirations"))
        .param("symbol", symbol)
        .param("format", format)
}

/// Request for `/option/list/strikes`.
#[must_use]
pub fn strikes_request(symbol: &str, expiration: &str, format: &str) -> RequestSpec {
    RequestSpec::new(format!("{LIST_PATH}/strikes"))
        .param("symbol", symbol)
        .param("expiration", expiration)
        .param("format", format)
}

/// Parameters of `/option/list/dates/{trade|quote}`.
///
/// Strike defaults to every strike and right to both rights.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatesQuery {
    symbol: String,
    expiration: String,
    request_type: RequestType,
    strike: String,
    right: Right,
    format: String,
}

impl DatesQuery {
    /// Dates with trade or quote data for contracts of `symbol` expiring on `expiration`.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        expiration: impl Into<String>,
        request_type: RequestType,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            expiration: expiration.into(),
            request_type,
            strike: ALL_STRIKES.to_string(),
            right: Right::default(),
            format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// Restrict to a single strike, e.g. `"285"`.
    #[must_use]
    pub fn strike(mut self, strike: impl Into<String>) -> Self {
        self.strike = strike.into();
        self
    }

    /// Restrict to calls or puts.
    #[must_use]
    pub const fn right(mut self, right: Right) -> Self {
        self.right = right;
        self
    }

    /// Response format.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Builds the terminal request.
    #[must_use]
    pub fn to_request(&self) -> RequestSpec {
        RequestSpec::new(format!("{LIST_PATH}/dates/{}", self.request_type))
            .param("symbol", &self.symbol)
            .param("expiration", &self.expiration)
            .param("strike", &self.strike)
            .param("right", self.right.as_str())
            .param("format", &self.format)
    }
}

/// Parameters of `/option/list/contracts/{trade|quote}`.
///
/// Without a symbol the terminal lists the contracts of every root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractsQuery {
    date: String,
    request_type: RequestType,
    symbol: Option<String>,
    format: String,
}

impl ContractsQuery {
    /// Contracts with trade or quote data on `date`.
    #[must_use]
    pub fn new(date: impl Into<String>, request_type: RequestType) -> Self {
        Self {
            date: date.into(),
            request_type,
            symbol: None,
            format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// Restrict to one root symbol, or a comma-separated list of them.
    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Restrict to several root symbols.
    #[must_use]
    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = symbols
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.symbol = (!joined.is_empty()).then_some(joined);
        self
    }

    /// Response format.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Builds the terminal request.
    #[must_use]
    pub fn to_request(&self) -> RequestSpec {
        RequestSpec::new(format!("{LIST_PATH}/contracts/{}", self.request_type))
            .optional_param("symbol", self.symbol.as_deref())
            .param("date", &self.date)
            .param("format", &self.format)
    }
}

/// `/option/list/*` endpoints.
///
/// ```rust,ignore
/// use thetadata_options::DatesQuery;
/// use thetadata_core::{RequestType, Right};
///
/// let body = client
///     .options()
///     .list()
///     .dates(&DatesQuery::new("AAPL", "2025-12-05", RequestType::Trade).strike("285").right(Right::Call))
///     .await?;
/// let df = body.to_dataframe("ndjson")?;
/// ```
#[derive(Debug, Clone)]
pub struct OptionsList {
    endpoint: Endpoint,
}

impl OptionsList {
    /// Create the list endpoints on top of `endpoint`.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// Lists every option root symbol.
    ///
    /// # Errors
    /// Returns an error if the request fails or the terminal rejects it.
    pub async fn symbols(&self, format: &str) -> Result<ResponseEnvelope> {
        self.endpoint.get(symbols_request(format)).await
    }

    /// Lists the expirations of `symbol`.
    ///
    /// # Errors
    /// Returns an error if the request fails or the terminal rejects it.
    pub async fn expirations(&self, symbol: &str, format: &str) -> Result<ResponseEnvelope> {
        self.endpoint.get(expirations_request(symbol, format)).await
    }

    /// Lists the strikes of `symbol` for one expiration.
    ///
    /// # Errors
    /// Returns an error if the request fails or the terminal rejects it.
    pub async fn strikes(
        &self,
        symbol: &str,
        expiration: &str,
        format: &str,
    ) -> Result<ResponseEnvelope> {
        self.endpoint
            .get(strikes_request(symbol, expiration, format))
            .await
    }

    /// Lists the dates with trade or quote data for a contract selection.
    ///
    /// # Errors
    /// Returns an error if the request fails or the terminal rejects it.
    pub async fn dates(&self, query: &DatesQuery) -> Result<ResponseEnvelope> {
        self.endpoint.get(query.to_request()).await
    }

    /// Lists the contracts with trade or quote data on a date.
    ///
    /// # Errors
    /// Returns an error if the request fails or the terminal rejects it.
    pub async fn contracts(&self, query: &ContractsQuery) -> Result<ResponseEnvelope> {
        self.endpoint.get(query.to_request()).await
    }
}
