//! Aggregated verdict and the reduction rules that produce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

use super::outcome::{OutcomeState, ProviderOutcome};
use super::target_url::TargetUrl;

/// Score for a URL at least one provider flagged as a threat.
pub const DANGER_SCORE: u8 = 10;
/// Score for a URL flagged as suspicious but not malicious.
pub const SUSPICIOUS_SCORE: u8 = 60;
/// Score for a URL at least one provider reported clean.
pub const SAFE_SCORE: u8 = 95;
/// Score when no provider produced a usable answer.
pub const DEGRADED_SCORE: u8 = 50;

/// `provider_used` value when no provider determined the status.
pub const NO_PROVIDER: &str = "none";

/// Explanation line prepended to degraded verdicts.
pub const DEGRADED_NOTICE: &str =
    "The check could not be completed; treat this link with caution.";

/// Trust level presented to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Safe,
    Warning,
    Danger,
}

impl VerdictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Inclusive score range allowed for this status.
    pub fn score_range(self) -> (u8, u8) {
        match self {
            Self::Danger => (0, 20),
            Self::Warning => (21, 70),
            Self::Safe => (71, 100),
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerdictStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(Self::Safe),
            "warning" => Ok(Self::Warning),
            "danger" => Ok(Self::Danger),
            other => Err(format!("unknown verdict status '{other}'")),
        }
    }
}

/// Normalized result of checking one URL against every configured provider.
///
/// Built once by [`Verdict::from_outcomes`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub url: String,
    pub status: VerdictStatus,
    pub score: u8,
    pub explanation: Vec<String>,
    pub provider_used: String,
    /// Provider-native payload of `provider_used`, if it returned one.
    pub evidence: Option<Value>,
    pub checked_at: DateTime<Utc>,
    pub providers_consulted: usize,
    pub providers_answered: usize,
}

impl Verdict {
    /// Reduces provider outcomes to a single verdict.
    ///
    /// Severity wins first (`matched-threat` > `matched-suspicious` > `clean` >
    /// failure); among outcomes of equal severity the provider that appears
    /// earliest in `priority` is cited. Providers missing from `priority` rank
    /// after every listed one, ordered by name. The result depends only on the
    /// set of outcomes, never on their order in the slice.
    ///
    /// When nothing conclusive came back the verdict is `warning`: the absence
    /// of a negative signal is never reported as safety.
    pub fn from_outcomes(url: &TargetUrl, outcomes: &[ProviderOutcome], priority: &[&str]) -> Self {
        let mut ordered: Vec<&ProviderOutcome> = outcomes.iter().collect();
        ordered.sort_by(|a, b| compare_by_priority(a, b, priority));

        let first_in = |state: OutcomeState| ordered.iter().copied().find(|o| o.state == state);

        let (status, score, deciding) =
            if let Some(o) = first_in(OutcomeState::MatchedThreat) {
                (VerdictStatus::Danger, DANGER_SCORE, Some(o))
            } else if let Some(o) = first_in(OutcomeState::MatchedSuspicious) {
                (VerdictStatus::Warning, SUSPICIOUS_SCORE, Some(o))
            } else if let Some(o) = first_in(OutcomeState::Clean) {
                (VerdictStatus::Safe, SAFE_SCORE, Some(o))
            } else {
                (VerdictStatus::Warning, DEGRADED_SCORE, None)
            };

        let mut explanation = Vec::with_capacity(ordered.len() + 1);
        if deciding.is_none() {
            explanation.push(DEGRADED_NOTICE.to_string());
        }
        explanation.extend(
            ordered
                .iter()
                .map(|o| format!("{}: {}", o.provider, o.detail)),
        );

        Self {
            url: url.to_string(),
            status,
            score,
            explanation,
            provider_used: deciding
                .map(|o| o.provider.to_string())
                .unwrap_or_else(|| NO_PROVIDER.to_string()),
            evidence: deciding.and_then(|o| o.raw.clone()),
            checked_at: Utc::now(),
            providers_consulted: outcomes.len(),
            providers_answered: outcomes.iter().filter(|o| o.state.is_conclusive()).count(),
        }
    }

    /// No provider produced a conclusive answer.
    pub fn is_degraded(&self) -> bool {
        self.providers_answered == 0
    }

    /// Every consulted provider produced a conclusive answer.
    pub fn is_complete(&self) -> bool {
        self.providers_consulted > 0 && self.providers_answered == self.providers_consulted
    }

    pub fn threat_found(&self) -> bool {
        self.status == VerdictStatus::Danger
    }

    /// Checks the status/score bounds and the `provider_used` rule.
    pub fn is_consistent(&self) -> bool {
        let (lo, hi) = self.status.score_range();
        let score_ok = (lo..=hi).contains(&self.score);
        let provider_ok = (self.providers_answered > 0) == (self.provider_used != NO_PROVIDER);
        score_ok && provider_ok
    }
}

fn severity(state: OutcomeState) -> u8 {
    match state {
        OutcomeState::MatchedThreat => 0,
        OutcomeState::MatchedSuspicious => 1,
        OutcomeState::Clean => 2,
        OutcomeState::MalformedResponse => 3,
        OutcomeState::Unavailable => 4,
        OutcomeState::TimedOut => 5,
    }
}

fn compare_by_priority(a: &ProviderOutcome, b: &ProviderOutcome, priority: &[&str]) -> Ordering {
    let rank = |name: &str| {
        priority
            .iter()
            .position(|p| *p == name)
            .unwrap_or(priority.len())
    };

    rank(a.provider)
        .cmp(&rank(b.provider))
        .then_with(|| a.provider.cmp(b.provider))
        .then_with(|| severity(a.state).cmp(&severity(b.state)))
        .then_with(|| a.detail.cmp(&b.detail))
}
