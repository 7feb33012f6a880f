//! Trait implemented by every upstream reputation adapter.

use crate::domain::entities::{ProviderOutcome, TargetUrl};
use async_trait::async_trait;

/// A third-party reputation service consulted for a verdict.
///
/// `query` never fails: transport errors, rate limiting, timeouts and
/// unparseable bodies are all expressed through
/// [`crate::domain::entities::OutcomeState`], so the aggregator never handles
/// provider-specific errors.
///
/// # Implementations
///
/// - [`crate::infrastructure::providers::VirusTotalProvider`] - multi-engine URL scanner
/// - [`crate::infrastructure::providers::SafeBrowsingProvider`] - threat-list lookup
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationProvider: Send + Sync {
    /// Stable display name, also used for priority ordering.
    fn name(&self) -> &'static str;

    /// Looks up a single URL.
    ///
    /// Implementations bound their own retries; callers still enforce an
    /// outer timeout.
    async fn query(&self, url: &TargetUrl) -> ProviderOutcome;
}
