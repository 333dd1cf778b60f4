//! API config cache client.
//!
//! # Responsibilities
//! - Issue the GET against the configured cache endpoint
//! - Retry server errors with exponential backoff (when enabled)
//! - Classify failures into client / service / transport errors
//! - Decode the payload into a reference snapshot

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::apiconfig::error::FetchError;
use crate::apiconfig::payload;
use crate::config::{ApiConfigSettings, RetryConfig};
use crate::observability::metrics;
use crate::reference::source::ReferenceSource;
use crate::reference::types::ReferenceSnapshot;
use crate::resilience::backoff::BackoffPolicy;
use crate::resilience::retries::StatusClass;

/// Header carrying the subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Result of a single HTTP attempt.
enum Attempt {
    Success(Vec<u8>),
    Status { class: StatusClass, status: u16 },
    Transport(reqwest::Error),
}

/// Client for the remote API config cache.
#[derive(Clone)]
pub struct ApiConfigClient {
    http: Client,
    url: String,
    api_key: String,
    /// `None` when retries are disabled.
    backoff: Option<BackoffPolicy>,
}

impl ApiConfigClient {
    /// Create a new client.
    pub fn new(settings: &ApiConfigSettings, retry: &RetryConfig) -> Result<Self, FetchError> {
        let url = settings.url();
        let http = Client::builder()
            .connect_timeout(Duration::from_millis(settings.connect_timeout_millis))
            .timeout(Duration::from_millis(settings.read_timeout_millis))
            .build()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let backoff = retry.enabled.then(|| BackoffPolicy::from(retry));

        tracing::info!(
            url = %url,
            retry_enabled = retry.enabled,
            "API config client initialized"
        );

        Ok(Self {
            http,
            url,
            api_key: settings.api_key.clone(),
            backoff,
        })
    }

    /// The URL requested by [`get_cache`](Self::get_cache).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch both reference lists.
    ///
    /// With retries enabled, server errors are retried until the backoff's
    /// elapsed-time budget runs out; the last error is then returned.
    pub async fn get_cache(&self) -> Result<ReferenceSnapshot, FetchError> {
        let mut backoff = self.backoff.as_ref().map(BackoffPolicy::start);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let (class, status) = match self.send_once().await {
                Attempt::Success(body) => {
                    metrics::record_fetch_attempt(StatusClass::Success.as_str());
                    return payload::decode(&body).map_err(|source| FetchError::Decode {
                        url: self.url.clone(),
                        source,
                    });
                }
                Attempt::Transport(source) => {
                    metrics::record_fetch_attempt("transport");
                    tracing::error!(url = %self.url, attempt, error = %source, "API config cache unreachable");
                    return Err(FetchError::Transport {
                        url: self.url.clone(),
                        source,
                    });
                }
                Attempt::Status { class, status } => (class, status),
            };

            metrics::record_fetch_attempt(class.as_str());

            if class.is_retryable() {
                if let Some(delay) = backoff.as_mut().and_then(|b| b.next_backoff()) {
                    tracing::info!(
                        url = %self.url,
                        attempt,
                        status,
                        delay = ?delay,
                        "Retrying API config cache request"
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }

            tracing::warn!(url = %self.url, attempt, status, "API config cache request failed");
            return Err(self.status_error(class, status));
        }
    }

    async fn send_once(&self) -> Attempt {
        let response = match self
            .http
            .get(&self.url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Transport(e),
        };

        let status = response.status();
        match StatusClass::of(status) {
            StatusClass::Success => match response.bytes().await {
                Ok(body) => Attempt::Success(body.to_vec()),
                Err(e) => Attempt::Transport(e),
            },
            class => Attempt::Status {
                class,
                status: status.as_u16(),
            },
        }
    }

    fn status_error(&self, class: StatusClass, status: u16) -> FetchError {
        let url = self.url.clone();
        match class {
            StatusClass::ClientError => FetchError::Client { status, url },
            StatusClass::ServerError => FetchError::Service { status, url },
            StatusClass::Success | StatusClass::Unexpected => {
                FetchError::UnexpectedStatus { status, url }
            }
        }
    }
}

#[async_trait]
impl ReferenceSource for ApiConfigClient {
    async fn fetch(&self) -> Result<ReferenceSnapshot, FetchError> {
        self.get_cache().await
    }
}
