//! Caching layer for complete verdicts.
//!
//! Provides a [`VerdictCache`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for testing/disabled caching

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
#[cfg(test)]
pub use service::MockVerdictCache;
pub use service::{CacheError, CacheResult, VerdictCache, cache_key};
