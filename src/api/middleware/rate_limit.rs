//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Type of the per-IP limiter returned by [`layer`].
pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a per-client rate limiter for the API.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 30 requests
///
/// Each check can cost several upstream quota units, so the burst is kept
/// small. Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// The key extractor decides what "client" means, see [`peer_ip`] and
/// [`forwarded_ip`].
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/linkcheck", post(linkcheck_handler))
///     .layer(rate_limit::layer(rate_limit::peer_ip()));
/// ```
pub fn layer<K: KeyExtractor>(key_extractor: K) -> RateLimitLayer<K> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(30)
            .key_extractor(key_extractor)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(governor_conf)
}

/// Keys on the socket peer address. Requires `ConnectInfo<SocketAddr>`.
pub fn peer_ip() -> PeerIpKeyExtractor {
    PeerIpKeyExtractor
}

/// Keys on `X-Forwarded-For` / `X-Real-IP` / `Forwarded`, falling back to the
/// peer address. Only safe behind a trusted reverse proxy.
pub fn forwarded_ip() -> SmartIpKeyExtractor {
    SmartIpKeyExtractor
}
