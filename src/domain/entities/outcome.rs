//! Per-provider result of a single reputation query.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Closed vocabulary every provider response is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeState {
    MatchedThreat,
    MatchedSuspicious,
    Clean,
    Unavailable,
    TimedOut,
    MalformedResponse,
}

impl OutcomeState {
    /// Whether the provider actually answered the question.
    pub fn is_conclusive(self) -> bool {
        matches!(
            self,
            Self::MatchedThreat | Self::MatchedSuspicious | Self::Clean
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MatchedThreat => "matched-threat",
            Self::MatchedSuspicious => "matched-suspicious",
            Self::Clean => "clean",
            Self::Unavailable => "unavailable",
            Self::TimedOut => "timed-out",
            Self::MalformedResponse => "malformed-response",
        }
    }
}

/// What one provider said about one URL.
///
/// `detail` is a human-readable line used for the verdict explanation; `raw`
/// keeps the provider-native payload for consumers that still read it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome {
    pub provider: &'static str,
    pub state: OutcomeState,
    pub detail: String,
    pub raw: Option<Value>,
    pub latency: Duration,
}

impl ProviderOutcome {
    pub fn new(provider: &'static str, state: OutcomeState, detail: impl Into<String>) -> Self {
        Self {
            provider,
            state,
            detail: detail.into(),
            raw: None,
            latency: Duration::ZERO,
        }
    }

    /// Outcome for a provider that did not answer within its budget.
    pub fn timed_out(provider: &'static str, after: Duration) -> Self {
        Self::new(
            provider,
            OutcomeState::TimedOut,
            format!("no response within {} ms", after.as_millis()),
        )
        .with_latency(after)
    }

    /// Outcome for a provider that could not be reached or refused the request.
    pub fn unavailable(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::new(provider, OutcomeState::Unavailable, reason)
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}
