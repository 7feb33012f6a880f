//! Shared HTTP plumbing for provider adapters: error classification, bounded
//! retries and JSON body parsing.

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;

use crate::domain::entities::{OutcomeState, ProviderOutcome};

/// Upper bound on the number of retries any adapter may perform.
pub const MAX_RETRIES_CAP: usize = 2;

/// Longest single backoff sleep between two attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// Failure of a single upstream call, internal to the adapters.
///
/// Converted to an [`OutcomeState`] before leaving the adapter.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited (HTTP {0})")]
    RateLimited(StatusCode),

    #[error("upstream returned HTTP {0}")]
    Status(StatusCode),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Classifies an HTTP status that is not a success.
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited(status)
        } else {
            Self::Status(status)
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited(_) | Self::Transport(_) => true,
            Self::Status(status) => status.is_server_error(),
            Self::Malformed(_) => false,
        }
    }

    pub fn state(&self) -> OutcomeState {
        match self {
            Self::Timeout => OutcomeState::TimedOut,
            Self::Malformed(_) => OutcomeState::MalformedResponse,
            Self::RateLimited(_) | Self::Status(_) | Self::Transport(_) => {
                OutcomeState::Unavailable
            }
        }
    }

    pub fn into_outcome(self, provider: &'static str) -> ProviderOutcome {
        ProviderOutcome::new(provider, self.state(), self.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status)
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Bounded exponential backoff applied to each upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt, clamped to [`MAX_RETRIES_CAP`].
    pub max_retries: usize,
    /// Delay before the first retry; doubles for each following one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, base_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.min(MAX_RETRIES_CAP),
            base_delay,
        }
    }

    /// Sleep durations between attempts: `base`, `2 * base`, ... capped at
    /// [`MAX_BACKOFF`], at most `max_retries` of them.
    pub fn delays(&self) -> std::iter::Take<ExponentialBackoff> {
        let half = (self.base_delay.as_millis() as u64 / 2).max(1);
        ExponentialBackoff::from_millis(2)
            .factor(half)
            .max_delay(MAX_BACKOFF)
            .take(self.max_retries)
    }

    /// Runs `action` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent.
    pub async fn run<T, A, Fut>(&self, provider: &'static str, action: A) -> Result<T, ProviderError>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        RetryIf::spawn(self.delays(), action, |e: &ProviderError| {
            let retry = e.is_retryable();
            if retry {
                tracing::debug!(provider, error = %e, "Retrying provider request");
            }
            retry
        })
        .await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES_CAP, Duration::from_millis(200))
    }
}

/// Builds the HTTP client used by one adapter.
pub fn build_client(request_timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(request_timeout)
        .user_agent(concat!("linkcheck/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fails on non-2xx statuses, then parses the body as JSON.
///
/// A 2xx body that is not JSON is [`ProviderError::Malformed`].
pub async fn read_json(response: Response) -> Result<Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::from_status(status));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
}
