//! Option history endpoints.

use std::fmt;

use thetadata_core::{
    ALL_STRIKES, DEFAULT_FORMAT, RequestSpec, ResponseEnvelope, Result, Right, ThetaError,
};

use crate::endpoint::Endpoint;

const HISTORY_PATH: &str = "/option/history";

/// History endpoint flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    /// End-of-day reports.
    Eod,
    /// OHLC bars aggregated by interval.
    Ohlc,
    /// NBBO quotes, optionally sampled by interval.
    Quote,
    /// Every trade.
    Trade,
    /// Open interest.
    OpenInterest,
}

impl HistoryKind {
    /// Path segment for this endpoint.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eod => "eod",
            Self::Ohlc => "ohlc",
            Self::Quote => "quote",
            Self::Trade => "trade",
            Self::OpenInterest => "open_interest",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day or date range covered by a history request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateSelection {
    /// A single trading day.
    Day(String),
    /// An inclusive range of trading days.
    Range {
        /// First day.
        start: String,
        /// Last day.
        end: String,
    },
}

/// Parameters shared by the history endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryQuery {
    symbol: String,
    expiration: String,
    strike: String,
    right: Right,
    dates: DateSelection,
    interval: Option<String>,
    format: String,
}

impl HistoryQuery {
    fn with_dates(symbol: String, expiration: String, dates: DateSelection) -> Self {
        Self {
            symbol,
            expiration,
            strike: ALL_STRIKES.to_string(),
            right: Right::default(),
            dates,
            interval: None,
            format: DEFAULT_FORMAT.to_string(),
        }
    }

    /// History of `symbol` contracts expiring on `expiration`, for one day.
    #[must_use]
    pub fn on_date(
        symbol: impl Into<String>,
        expiration: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self::with_dates(
            symbol.into(),
            expiration.into(),
            DateSelection::Day(date.into()),
        )
    }

    /// History of `symbol` contracts expiring on `expiration`, for a date range.
    #[must_use]
    pub fn between(
        symbol: impl Into<String>,
        expiration: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self::with_dates(
            symbol.into(),
            expiration.into(),
            DateSelection::Range {
                start: start.into(),
                end: end.into(),
            },
        )
    }

    /// Restrict to a single strike.
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

    /// Aggregation interval, e.g. `"1m"` or `"1h"`.
    #[must_use]
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    /// Response format.
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Builds the request for one history endpoint.
    ///
    /// # Errors
    /// Returns [`ThetaError::InvalidParameter`] when end-of-day data is requested
    /// for a single day, or OHLC bars without an interval.
    pub fn to_request(&self, kind: HistoryKind) -> Result<RequestSpec> {
        match (kind, &self.dates) {
            (HistoryKind::Eod, DateSelection::Day(_)) => {
                return Err(ThetaError::InvalidParameter(
                    "end-of-day history needs a start and end date".to_string(),
                ));
            }
            (HistoryKind::Ohlc, _) if self.interval.is_none() => {
                return Err(ThetaError::InvalidParameter(
                    "OHLC history needs an interval".to_string(),
                ));
            }
            _ => {}
        }

        let spec = RequestSpec::new(format!("{HISTORY_PATH}/{kind}"))
            .param("symbol", &self.symbol)
            .param("expiration", &self.expiration)
            .param("strike", &self.strike)
            .param("right", self.right.as_str());

        let spec = match &self.dates {
            DateSelection::Day(date) => spec.param("date", date),
            DateSelection::Range { start, end } => {
                spec.param("start_date", start).param("end_date", end)
            }
        };

        let interval = match kind {
            HistoryKind::Ohlc | HistoryKind::Quote => self.interval.as_deref(),
            _ => None,
        };

        Ok(spec
            .optional_param("interval", interval)
            .param("format", &self.format))
    }
}

/// `/option/history/*` endpoints.
#[derive(Debug, Clone)]
pub struct OptionsHistory {
    endpoint: Endpoint,
}

impl OptionsHistory {
    /// Create the history endpoints on top of `endpoint`.
    #[must_use]
    pub const fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    async fn fetch(&self, kind: HistoryKind, query: &HistoryQuery) -> Result<ResponseEnvelope> {
        self.endpoint.get(query.to_request(kind)?).await
    }

    /// End-of-day reports over a date range.
    ///
    /// # Errors
    /// Returns an error for invalid queries, failed requests or terminal errors.
    pub async fn eod(&self, query: &HistoryQuery) -> Result<ResponseEnvelope> {
        self.fetch(HistoryKind::Eod, query).await
    }

    /// OHLC bars; the query must carry an interval.
    ///
    /// # Errors
    /// Returns an error for invalid queries, failed requests or terminal errors.
    pub async fn ohlc(&self, query: &HistoryQuery) -> Result<ResponseEnvelope> {
        self.fetch(HistoryKind::Ohlc, query).await
    }

    /// Quotes, every change or sampled by the query's interval.
    ///
    /// # Errors
    /// Returns an error for failed requests or terminal errors.
    pub async fn quote(&self, query: &HistoryQuery) -> Result<ResponseEnvelope> {
        self.fetch(HistoryKind::Quote, query).await
    }

    /// Every trade.
    ///
    /// # Errors
    /// Returns an error for failed requests or terminal errors.
    pub async fn trade(&self, query: &HistoryQuery) -> Result<ResponseEnvelope> {
        self.fetch(HistoryKind::Trade, query).await
    }

    /// Open interest.
    ///
    /// # Errors
    /// Returns an error for failed requests or terminal errors.
    pub async fn open_interest(&self, query: &HistoryQuery) -> Result<ResponseEnvelope> {
        self.fetch(HistoryKind::OpenInterest, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, sample_error_codes};
    use std::sync::Arc;

    #[test]
    fn test_single_day_request() {
        let spec = HistoryQuery::on_date("SPY", "2025-12-19", "2025-11-03")
            .strike("600")
            .right(Right::Put)
            .interval("1m")
            .to_request(HistoryKind::Ohlc)
            .unwrap();

        assert_eq!(spec.path(), "/option/history/ohlc");
        assert_eq!(
            spec.query_pairs(),
            vec![
                ("symbol", "SPY"),
                ("expiration", "2025-12-19"),
                ("strike", "600"),
                ("right", "P"),
                ("date", "2025-11-03"),
                ("interval", "1m"),
                ("format", "ndjson"),
            ]
        );
    }

    #[test]
    fn test_range_request() {
        let spec = HistoryQuery::between("SPY", "2025-12-19", "2025-11-03", "2025-11-07")
            .to_request(HistoryKind::Eod)
            .unwrap();

        assert_eq!(spec.path(), "/option/history/eod");
        assert_eq!(spec.get("start_date"), Some("2025-11-03"));
        assert_eq!(spec.get("end_date"), Some("2025-11-07"));
        assert_eq!(spec.get("date"), None);
        assert_eq!(spec.get("strike"), Some("*"));
        assert_eq!(spec.get("right"), Some("both"));
    }

    #[test]
    fn test_interval_only_sent_where_supported() {
        let query = HistoryQuery::on_date("SPY", "2025-12-19", "2025-11-03").interval("5m");

        let quote = query.to_request(HistoryKind::Quote).unwrap();
        assert_eq!(quote.get("interval"), Some("5m"));

        let trade = query.to_request(HistoryKind::Trade).unwrap();
        assert_eq!(trade.get("interval"), None);

        let oi = query.to_request(HistoryKind::OpenInterest).unwrap();
        assert_eq!(oi.path(), "/option/history/open_interest");
    }

    #[test]
    fn test_invalid_queries() {
        let day = HistoryQuery::on_date("SPY", "2025-12-19", "2025-11-03");
        assert!(matches!(
            day.to_request(HistoryKind::Eod),
            Err(ThetaError::InvalidParameter(_))
        ));
        assert!(matches!(
            day.to_request(HistoryKind::Ohlc),
            Err(ThetaError::InvalidParameter(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_query_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::default());
        let history = OptionsHistory::new(Endpoint::new(
            transport.clone(),
            Arc::new(sample_error_codes()),
        ));

        let query = HistoryQuery::on_date("SPY", "2025-12-19", "2025-11-03");
        assert!(history.eod(&query).await.is_err());
        assert_eq!(transport.calls(), 0);

        history.trade(&query).await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().path(),
            "/option/history/trade"
        );
    }
}
