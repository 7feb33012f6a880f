//! Concurrent fan-out to reputation providers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::entities::{OutcomeState, ProviderOutcome, TargetUrl, Verdict};
use crate::domain::providers::ReputationProvider;

/// Queries every configured provider concurrently and reduces the answers
/// to a [`Verdict`].
///
/// Each provider runs in its own task under `provider_timeout`. The join is a
/// race against `overall_timeout`: when the deadline fires, unfinished tasks
/// are aborted and reported as `timed-out`. A provider failure of any kind
/// only affects its own outcome.
pub struct VerdictAggregator {
    providers: Vec<Arc<dyn ReputationProvider>>,
    provider_timeout: Duration,
    overall_timeout: Duration,
}

impl VerdictAggregator {
    /// Provider order defines tie-break priority: earlier providers are cited first.
    pub fn new(
        providers: Vec<Arc<dyn ReputationProvider>>,
        provider_timeout: Duration,
        overall_timeout: Duration,
    ) -> Self {
        Self {
            providers,
            provider_timeout,
            overall_timeout,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in priority order.
    pub fn priority(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn aggregate(&self, url: &TargetUrl) -> Verdict {
        let started = Instant::now();
        let deadline = started + self.overall_timeout;
        let priority = self.priority();

        let mut tasks = JoinSet::new();
        let mut slots = HashMap::with_capacity(self.providers.len());

        for (slot, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let url = url.clone();
            let timeout = self.provider_timeout;

            let handle = tasks.spawn(async move {
                let started = Instant::now();
                match tokio::time::timeout(timeout, provider.query(&url)).await {
                    Ok(outcome) => outcome.with_latency(started.elapsed()),
                    Err(_) => ProviderOutcome::timed_out(provider.name(), timeout),
                }
            });
            slots.insert(handle.id(), slot);
        }

        let mut outcomes: Vec<Option<ProviderOutcome>> = vec![None; self.providers.len()];

        let overall = tokio::time::sleep_until(deadline);
        tokio::pin!(overall);

        loop {
            tokio::select! {
                joined = tasks.join_next_with_id() => match joined {
                    Some(Ok((id, outcome))) => {
                        if let Some(&slot) = slots.get(&id) {
                            outcomes[slot] = Some(outcome);
                        }
                    }
                    Some(Err(e)) => {
                        if let Some(&slot) = slots.get(&e.id()) {
                            let name = priority[slot];
                            warn!(provider = name, error = %e, "Provider task failed");
                            outcomes[slot] =
                                Some(ProviderOutcome::unavailable(name, "provider task failed"));
                        }
                    }
                    None => break,
                },
                _ = &mut overall => {
                    debug!(url = %url, "Overall deadline reached, aborting pending providers");
                    tasks.abort_all();
                    break;
                }
            }
        }

        let outcomes: Vec<ProviderOutcome> = outcomes
            .into_iter()
            .zip(&priority)
            .map(|(outcome, &name)| {
                outcome.unwrap_or_else(|| ProviderOutcome::timed_out(name, self.overall_timeout))
            })
            .collect();

        for outcome in &outcomes {
            record_outcome(outcome);
        }

        let verdict = Verdict::from_outcomes(url, &outcomes, &priority);

        info!(
            url = %url,
            status = %verdict.status,
            score = verdict.score,
            provider_used = %verdict.provider_used,
            answered = verdict.providers_answered,
            consulted = verdict.providers_consulted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Verdict computed"
        );

        verdict
    }
}

fn record_outcome(outcome: &ProviderOutcome) {
    let state = outcome.state.as_str();
    let latency_ms = outcome.latency.as_millis() as u64;

    match outcome.state {
        OutcomeState::Unavailable | OutcomeState::TimedOut | OutcomeState::MalformedResponse => {
            warn!(provider = outcome.provider, state, latency_ms, detail = %outcome.detail, "Provider failed");
        }
        _ => {
            debug!(provider = outcome.provider, state, latency_ms, "Provider answered");
        }
    }

    metrics::counter!(
        "linkcheck_provider_outcomes_total",
        "provider" => outcome.provider,
        "state" => state
    )
    .increment(1);
    metrics::histogram!("linkcheck_provider_latency_seconds", "provider" => outcome.provider)
        .record(outcome.latency.as_secs_f64());
}
