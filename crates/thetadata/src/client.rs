//! Top-level client.

use std::sync::Arc;

use chrono::Local;
use thetadata_cache::ErrorCodeCache;
use thetadata_core::{ClientConfig, ErrorCodeTable, RequestSpec, Result, ThetaError, Transport};
use thetadata_options::{Endpoint, Options, RetryPolicy};
use tracing::{debug, info};

use crate::transport::HttpTransport;

/// Cheap endpoint used to check that the terminal answers.
pub const CONNECTION_CHECK_PATH: &str = "/calendar/on_date";

/// Client for a Theta Data terminal.
///
/// Construction is fail-fast: it validates the configuration, builds the
/// transport, loads the error-code table and runs one connectivity check before
/// any endpoint module is handed out.
#[derive(Debug)]
pub struct ThetaDataClient {
    config: ClientConfig,
    api_url: String,
    error_codes: Arc<ErrorCodeTable>,
    transport: Arc<dyn Transport>,
    options: Options,
}

impl ThetaDataClient {
    /// Connect to the terminal described by `config` over HTTP.
    ///
    /// # Errors
    /// - [`ThetaError::InvalidParameter`] for an invalid configuration
    /// - [`ThetaError::Fetch`] if the error-code table cannot be downloaded
    /// - [`ThetaError::Connection`] if the terminal does not answer the check
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(config, transport).await
    }

    /// Connect using a caller-supplied transport.
    ///
    /// # Errors
    /// Same as [`ThetaDataClient::connect`].
    pub async fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let api_url = config.api_url()?;

        tokio::fs::create_dir_all(&config.cache_dir)
            .await
            .map_err(|e| ThetaError::Cache(format!("{}: {e}", config.cache_dir.display())))?;

        let cache = ErrorCodeCache::from_config(&config);
        let error_codes = Arc::new(cache.load().await?);

        check_connection(transport.as_ref()).await?;

        let endpoint = Endpoint::new(transport.clone(), error_codes.clone())
            .with_retry(RetryPolicy::from_config(&config));
        let options = Options::new(endpoint);

        info!(
            terminal = %api_url,
            request_timeout = ?config.request_timeout,
            max_retries = config.max_retries,
            max_concurrent_connections = config.max_concurrent_connections,
            cache_dir = %config.cache_dir.display(),
            error_codes = error_codes.len(),
            error_codes_refreshed = ?cache.last_refreshed(),
            "Connected to Theta Data terminal"
        );

        Ok(Self {
            config,
            api_url,
            error_codes,
            transport,
            options,
        })
    }

    /// Option endpoints.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// API root, e.g. `http://localhost:25503/v3`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.api_url
    }

    /// Error-code table used to translate terminal errors.
    #[must_use]
    pub fn error_codes(&self) -> &ErrorCodeTable {
        &self.error_codes
    }

    /// Transport shared by the endpoint modules.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }
}

/// Sends a single, unretried request to the calendar endpoint.
async fn check_connection(transport: &dyn Transport) -> Result<()> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let request = RequestSpec::new(CONNECTION_CHECK_PATH).param("date", today);
    debug!(request = %request, "Checking terminal connection");

    match transport.send(&request).await {
        Ok(response) if response.is_success() => Ok(()),
        Ok(response) => Err(ThetaError::Connection(format!(
            "HTTP {} from {}; check the terminal URL and that the terminal is running",
            response.status, CONNECTION_CHECK_PATH
        ))),
        Err(e) => Err(ThetaError::Connection(format!(
            "{e}; check the terminal URL and that the terminal is running"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::TcpListener;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use thetadata_core::{RawResponse, RequestType};
    use thetadata_options::{ContractsQuery, DatesQuery};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate, Times};

    const ERROR_CODES_CSV: &str = "HttpCode, ErrorName, Description\n\
        472, NO_DATA, There was no data found for the request.\n\
        473, INVALID_PARAMS, The request parameters are invalid.\n";

    async fn mount_error_codes(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/ErrorCodes.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ERROR_CODES_CSV))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    async fn mount_calendar(server: &MockServer, status: u16) {
        mount_calendar_expecting(server, status, 1_u64..).await;
    }

    async fn mount_calendar_expecting(
        server: &MockServer,
        status: u16,
        expected_calls: impl Into<Times>,
    ) {
        Mock::given(method("GET"))
            .and(path("/v3/calendar/on_date"))
            .respond_with(ResponseTemplate::new(status).set_body_string("{\"type\":\"open\"}\n"))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn config_for(server: &MockServer, cache_dir: &Path) -> ClientConfig {
        ClientConfig::new(server.uri())
            .with_cache_dir(cache_dir)
            .with_error_codes_url(format!("{}/ErrorCodes.csv", server.uri()))
            .with_max_retries(0)
    }

    fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn test_connect_and_list_dates() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        mount_calendar(&server, 200).await;
        Mock::given(method("GET"))
            .and(path("/v3/option/list/dates/trade"))
            .and(query_param("symbol", "AAPL"))
            .and(query_param("expiration", "2025-12-05"))
            .and(query_param("strike", "285"))
            .and(query_param("right", "C"))
            .and(query_param("format", "ndjson"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{\"date\":\"2025-11-03\"}\n{\"date\":\"2025-11-04\"}\n"),
            )
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let client = ThetaDataClient::connect(config_for(&server, dir.path()))
            .await
            .unwrap();
        assert_eq!(client.base_url(), format!("{}/v3", server.uri()));
        assert_eq!(client.error_codes().len(), 2);

        let query = DatesQuery::new("AAPL", "2025-12-05", RequestType::Trade)
            .strike("285")
            .right("C".parse().unwrap());
        let body = client.options().list().dates(&query).await.unwrap();

        assert_eq!(body.to_dataframe("ndjson").unwrap().height(), 2);
    }

    #[tokio::test]
    async fn test_terminal_error_becomes_api_error() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        mount_calendar(&server, 200).await;
        Mock::given(method("GET"))
            .and(path("/v3/option/list/contracts/quote"))
            .respond_with(ResponseTemplate::new(472).set_body_string("No data for 2025-01-02"))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let client = ThetaDataClient::connect(config_for(&server, dir.path()))
            .await
            .unwrap();
        let err = client
            .options()
            .list()
            .contracts(&ContractsQuery::new("2025-01-02", RequestType::Quote))
            .await
            .unwrap_err();

        match err {
            ThetaError::Api(api) => {
                assert_eq!(api.status, 472);
                assert_eq!(api.name, "NO_DATA");
                assert_eq!(api.description, "There was no data found for the request.");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_terminal_is_connection_error() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&server, dir.path());
        let config = ClientConfig {
            base_url: closed_port_url(),
            ..config
        };

        let result = ThetaDataClient::connect(config).await;

        assert!(matches!(result, Err(ThetaError::Connection(_))));
    }

    #[tokio::test]
    async fn test_failed_self_test_is_connection_error() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        mount_calendar(&server, 500).await;
        let dir = tempfile::tempdir().unwrap();

        let result = ThetaDataClient::connect(config_for(&server, dir.path())).await;

        assert!(matches!(result, Err(ThetaError::Connection(_))));
    }

    #[tokio::test]
    async fn test_error_code_fetch_failure_fails_construction() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ErrorCodes.csv"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v3/calendar/on_date"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let result = ThetaDataClient::connect(config_for(&server, dir.path())).await;

        assert!(matches!(result, Err(ThetaError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_cached_error_codes_are_reused() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        mount_calendar(&server, 200).await;
        let dir = tempfile::tempdir().unwrap();

        ThetaDataClient::connect(config_for(&server, dir.path()))
            .await
            .unwrap();
        let second = ThetaDataClient::connect(config_for(&server, dir.path()))
            .await
            .unwrap();

        assert_eq!(second.error_codes().len(), 2);
        assert!(dir.path().join("error_codes.parquet").exists());
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_network() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 0).await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&server, dir.path()).with_max_concurrent_connections(0);

        let result = ThetaDataClient::connect(config).await;

        assert!(matches!(result, Err(ThetaError::InvalidParameter(_))));
    }

    #[tokio::test]
    async fn test_malformed_base_url_fails_before_network() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 0).await;
        let dir = tempfile::tempdir().unwrap();

        for base_url in ["http:// bad host", "http://[::1", "https://:99999"] {
            let config = ClientConfig {
                base_url: base_url.to_string(),
                ..config_for(&server, dir.path())
            };

            let result = ThetaDataClient::connect(config).await;

            assert!(
                matches!(result, Err(ThetaError::InvalidParameter(_))),
                "{base_url} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_self_test_is_sent_once_with_retries_enabled() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        mount_calendar_expecting(&server, 500, 1_u64).await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&server, dir.path())
            .with_max_retries(3)
            .with_retry_base_delay(Duration::from_millis(1));

        let result = ThetaDataClient::connect(config).await;

        assert!(matches!(result, Err(ThetaError::Connection(_))));
    }

    #[derive(Debug, Default)]
    struct FailingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _request: &RequestSpec) -> Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ThetaError::Transport("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_transport_failure_during_self_test_is_not_retried() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&server, dir.path())
            .with_max_retries(5)
            .with_retry_base_delay(Duration::from_millis(1));
        let transport = Arc::new(FailingTransport::default());

        let result = ThetaDataClient::with_transport(config, transport.clone()).await;

        assert!(matches!(result, Err(ThetaError::Connection(_))));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_endpoints_share_client_transport() {
        let server = MockServer::start().await;
        mount_error_codes(&server, 1).await;
        mount_calendar_expecting(&server, 200, 2_u64).await;
        let dir = tempfile::tempdir().unwrap();

        let client = ThetaDataClient::connect(config_for(&server, dir.path()))
            .await
            .unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();
        let response = client
            .transport()
            .send(&RequestSpec::new(CONNECTION_CHECK_PATH).param("date", today))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.text(), "{\"type\":\"open\"}\n");
    }
}
