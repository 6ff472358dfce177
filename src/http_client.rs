use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, instrument, warn};

use crate::fetch_error::FetchError;

/// Shared HTTP client with bounded retries for transient upstream failures.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    max_retries: usize,
    min_retry_delay: Duration,
}

impl UpstreamClient {
    pub fn new(timeout: Duration, max_retries: usize) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            max_retries,
            min_retry_delay: Duration::from_millis(250),
        })
    }

    /// Overrides the first backoff delay (tests use a tiny one).
    pub fn with_min_retry_delay(mut self, delay: Duration) -> Self {
        self.min_retry_delay = delay;
        self
    }

    /// GETs `url` with `query` and returns the body of a successful response.
    ///
    /// Connection errors, timeouts, 429 and 5xx are retried with exponential
    /// backoff; anything else fails immediately.
    #[instrument(skip(self, query), fields(url = %url))]
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_retry_delay)
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(self.max_retries)
            .with_jitter();

        (|| self.get_once(url, query))
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(FetchError::is_transient)
            .notify(|e: &FetchError, delay: Duration| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Retrying upstream request");
            })
            .await
    }

    async fn get_once(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        debug!("Sending HTTP request");
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Retrieved response body, size: {} bytes", body.len());
        Ok(body)
    }
}
