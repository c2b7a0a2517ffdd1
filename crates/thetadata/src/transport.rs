//! reqwest-backed transport.

use async_trait::async_trait;
use thetadata_core::{ClientConfig, RawResponse, RequestSpec, Result, ThetaError, Transport};
use tokio::sync::Semaphore;
use tracing::debug;

/// HTTP transport to the terminal.
///
/// Shares one pooled `reqwest` client between all endpoint modules. The number of
/// requests in flight is capped at the configured connection limit, matching the
/// terminal's own queue size.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
    permits: Semaphore,
}

impl HttpTransport {
    /// Create a transport for the terminal described by `config`.
    ///
    /// # Errors
    /// Returns [`ThetaError::InvalidParameter`] for an invalid configuration, or
    /// [`ThetaError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(config.max_concurrent_connections)
            .build()
            .map_err(|e| ThetaError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url()?,
            permits: Semaphore::new(config.max_concurrent_connections),
        })
    }

    /// API root requests are sent to, e.g. `http://localhost:25503/v3`.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| ThetaError::Transport(e.to_string()))?;

        let url = format!("{}{}", self.api_url, request.path());
        debug!("GET {}", url);

        let mut response = self
            .client
            .get(&url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| ThetaError::Transport(e.to_string()))?;

        let status = response.status().as_u16();

        // Drain the stream; the connection goes back to the pool when `response` drops.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ThetaError::Transport(e.to_string()))?
        {
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse::new(status, body))
    }
}
