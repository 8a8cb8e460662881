//! HTTP client with session cookies and retry logic for zamunda.net
//!
//! Wraps a cookie-bearing `reqwest::Client` carrying the browser header
//! profile. Connection-level failures are retried with exponential
//! backoff; timeouts and every other request error fail fast.

use std::future::Future;
use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::Serialize;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{Result, ZamundaError};
use crate::headers;
use crate::url::absolute_url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the site (default: `https://zamunda.net`)
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Maximum retries after the first attempt (default: 4)
    pub max_retries: u32,
    /// Multiplier applied to the delay between retries (default: 2)
    pub backoff_factor: u32,
    /// Delay before the first retry (default: 1s)
    pub initial_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://zamunda.net".to_string(),
            timeout_secs: 10,
            max_retries: 4,
            backoff_factor: 2,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// HTTP client wrapper holding the session state
///
/// One instance owns one cookie store; a successful login mutates the
/// cookies and every later request carries them. All requests go out
/// strictly sequentially — the retry suspension is an awaited sleep.
pub struct ZamundaClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ZamundaClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(headers::USER_AGENT)
            .cookie_store(true)
            .default_headers(headers::browser_profile())
            .build()?;

        Ok(Self { client, config })
    }

    /// Base URL the client was configured with
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a single GET request against a site path
    ///
    /// `path` may be site-relative (`/bananas?...`) or a full URL.
    /// Transport errors come back classified into connection failure,
    /// timeout or plain HTTP error; the response status is not checked.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = absolute_url(&self.config.base_url, path);
        let response = self.client.get(&url).send().await?;
        Ok(response)
    }

    /// GET with the retry policy applied
    pub async fn get_with_retry(&self, path: &str) -> Result<reqwest::Response> {
        self.with_retry(|| self.get(path)).await
    }

    /// Submit a form-encoded POST request with extra per-request headers
    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        path: &str,
        extra_headers: HeaderMap,
        form: &T,
    ) -> Result<reqwest::Response> {
        let url = absolute_url(&self.config.base_url, path);
        let response = self
            .client
            .post(&url)
            .headers(extra_headers)
            .form(form)
            .send()
            .await?;
        Ok(response)
    }

    /// Run an operation under the retry policy
    ///
    /// Only connection-level failures are retried, up to `max_retries`
    /// times after the first attempt. The delay before retry N (0-based)
    /// is `initial_delay * backoff_factor^N`. Every other error, and the
    /// last connection failure once retries are exhausted, is returned
    /// as-is.
    pub(crate) async fn with_retry<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if Self::is_retryable(&e) && attempt < self.config.max_retries => {
                    let delay = self.backoff_delay(attempt);
                    debug!(
                        "Attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Delay before retry `attempt` (0-based): 1s, 2s, 4s, 8s at the defaults
    pub(crate) fn backoff_delay(&self, attempt: u32) -> Duration {
        self.config.initial_delay * self.config.backoff_factor.pow(attempt)
    }

    /// Check if an error is retryable
    ///
    /// Timeouts are deliberately not: a server that accepted the
    /// connection and sat on it will do so again.
    fn is_retryable(error: &ZamundaError) -> bool {
        matches!(error, ZamundaError::ConnectionFailed(_))
    }
}
