//! Verdict cache trait and error types.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::entities::{TargetUrl, Verdict};

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache key for a URL: hex SHA-256 of its normalized form.
pub fn cache_key(url: &TargetUrl) -> String {
    hex::encode(Sha256::digest(url.as_str().as_bytes()))
}

/// Short-lived store of complete verdicts, saving provider quota on repeated
/// checks of the same URL.
///
/// Implementations must be fail-open: a broken cache degrades to a miss and
/// never fails a check.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerdictCache: Send + Sync {
    /// Returns the cached verdict for `key`, `Ok(None)` on miss or error.
    async fn get_verdict(&self, key: &str) -> CacheResult<Option<Verdict>>;

    /// Stores a verdict. `ttl_seconds = None` uses the implementation default.
    async fn set_verdict(
        &self,
        key: &str,
        verdict: &Verdict,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
