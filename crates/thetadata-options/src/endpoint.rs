//! Shared request path for endpoint modules.

use std::sync::Arc;
use std::time::Duration;

use thetadata_core::{
    ClientConfig, ErrorCodeTable, RawResponse, RequestSpec, ResponseEnvelope, Result, Transport,
};
use tokio::time::sleep;
use tracing::{debug, warn};

/// How often and how patiently transport failures are retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Policy taken from the client configuration.
    #[must_use]
    pub const fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: config.retry_base_delay,
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

/// Sends requests for the endpoint modules.
///
/// Transport failures are retried according to the [`RetryPolicy`]; responses are
/// then run through the [`ErrorCodeTable`]. Terminal errors are never retried.
#[derive(Debug, Clone)]
pub struct Endpoint {
    transport: Arc<dyn Transport>,
    error_codes: Arc<ErrorCodeTable>,
    retry: RetryPolicy,
}

impl Endpoint {
    /// Create an endpoint that does not retry.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, error_codes: Arc<ErrorCodeTable>) -> Self {
        Self {
            transport,
            error_codes,
            retry: RetryPolicy::none(),
        }
    }

    /// Set the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the error-code table used for translation.
    #[must_use]
    pub fn error_codes(&self) -> &ErrorCodeTable {
        &self.error_codes
    }

    /// Sends `request` and returns the body of a successful response.
    ///
    /// # Errors
    /// Returns [`ThetaError::Api`](thetadata_core::ThetaError::Api) for non-success
    /// statuses, or the last transport error once retries are exhausted.
    pub async fn get(&self, request: RequestSpec) -> Result<ResponseEnvelope> {
        debug!(request = %request, "Terminal request");

        let response = self.send_with_retry(&request).await?;
        let response = self.error_codes.translate(response)?;

        Ok(response.into())
    }

    async fn send_with_retry(&self, request: &RequestSpec) -> Result<RawResponse> {
        let mut attempt = 0;
        loop {
            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        ?delay,
                        path = request.path(),
                        "Retrying after transport error: {}",
                        e
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
