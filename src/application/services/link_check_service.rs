//! The single-URL check use case.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::application::services::VerdictAggregator;
use crate::domain::entities::{CallerIdentity, NewScanRecord, ScanSource, TargetUrl, Verdict};
use crate::domain::repositories::ScanRecordRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{VerdictCache, cache_key};

/// Validates a URL, obtains a verdict and records it for identified callers.
///
/// Cache writes and history appends run in detached tasks; their failures are
/// logged and never change the response.
pub struct LinkCheckService {
    aggregator: Arc<VerdictAggregator>,
    cache: Arc<dyn VerdictCache>,
    history: Arc<dyn ScanRecordRepository>,
    cache_ttl_seconds: Option<u64>,
}

impl LinkCheckService {
    pub fn new(
        aggregator: Arc<VerdictAggregator>,
        cache: Arc<dyn VerdictCache>,
        history: Arc<dyn ScanRecordRepository>,
        cache_ttl_seconds: Option<u64>,
    ) -> Self {
        Self {
            aggregator,
            cache,
            history,
            cache_ttl_seconds,
        }
    }

    /// Names of the configured providers, in priority order.
    pub fn providers(&self) -> Vec<&'static str> {
        self.aggregator.priority()
    }

    /// Checks one URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] for empty or non-`http(s)` input; no provider is contacted
    /// - [`AppError::ServiceUnavailable`] when no provider is configured
    ///
    /// Provider failures are never errors: they yield a degraded `warning` verdict.
    pub async fn check(
        &self,
        raw_url: &str,
        caller: Option<CallerIdentity>,
        source: ScanSource,
    ) -> Result<Verdict, AppError> {
        let url = TargetUrl::parse(raw_url)?;
        let requested_at = Utc::now();

        if self.aggregator.is_empty() {
            return Err(AppError::service_unavailable(
                "No reputation providers are configured",
                json!({}),
            ));
        }

        let key = cache_key(&url);
        let verdict = match self.cache.get_verdict(&key).await {
            Ok(Some(cached)) => {
                debug!(url = %url, "Serving verdict from cache");
                cached
            }
            Ok(None) => self.fresh_verdict(&url, key).await,
            Err(e) => {
                warn!(url = %url, error = %e, "Cache lookup failed");
                self.fresh_verdict(&url, key).await
            }
        };

        if let Some(owner) = caller {
            self.record(NewScanRecord::from_verdict(
                &verdict,
                &owner,
                source,
                requested_at,
            ));
        }

        Ok(verdict)
    }

    async fn fresh_verdict(&self, url: &TargetUrl, key: String) -> Verdict {
        let verdict = self.aggregator.aggregate(url).await;

        if verdict.is_complete() {
            let cache = Arc::clone(&self.cache);
            let ttl = self.cache_ttl_seconds;
            let cached = verdict.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_verdict(&key, &cached, ttl).await {
                    warn!(error = %e, "Failed to cache verdict");
                }
            });
        }

        verdict
    }

    fn record(&self, record: NewScanRecord) {
        let history = Arc::clone(&self.history);
        tokio::spawn(async move {
            let owner = record.owner_id.clone();
            if let Err(e) = history.append(record).await {
                warn!(owner = %owner, error = %e, "Failed to append scan record");
            }
        });
    }
}
