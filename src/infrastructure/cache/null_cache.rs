//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, VerdictCache};
use crate::domain::entities::Verdict;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or unreachable at startup.
/// Every lookup is a miss and every write succeeds without storing anything.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerdictCache for NullCache {
    async fn get_verdict(&self, _key: &str) -> CacheResult<Option<Verdict>> {
        Ok(None)
    }

    async fn set_verdict(
        &self,
        _key: &str,
        _verdict: &Verdict,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
