//! HTTP server initialization and runtime setup.
//!
//! Builds provider adapters, connects the optional cache and history store,
//! and runs the Axum server until a shutdown signal arrives.

use crate::application::services::{HistoryService, LinkCheckService, VerdictAggregator};
use crate::config::Config;
use crate::domain::providers::ReputationProvider;
use crate::domain::repositories::ScanRecordRepository;
use crate::infrastructure::cache::{NullCache, RedisCache, VerdictCache};
use crate::infrastructure::persistence::{NullScanRecordRepository, PgScanRecordRepository};
use crate::infrastructure::providers::{
    RetryPolicy, SafeBrowsingProvider, SafeBrowsingSettings, VirusTotalProvider,
    VirusTotalSettings,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the configured reputation providers in priority order.
///
/// VirusTotal comes first, then Google Safe Browsing. A provider without an
/// API key is skipped.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be built or a base URL is invalid.
pub fn build_providers(config: &Config) -> Result<Vec<Arc<dyn ReputationProvider>>> {
    let retry = RetryPolicy::new(
        config.provider_max_retries,
        Duration::from_millis(config.retry_base_delay_ms),
    );
    let request_timeout = config.request_timeout();

    let mut providers: Vec<Arc<dyn ReputationProvider>> = Vec::new();

    if let Some(api_key) = &config.virustotal_api_key {
        let provider = VirusTotalProvider::new(VirusTotalSettings {
            api_key: api_key.clone(),
            base_url: config.virustotal_base_url.clone(),
            request_timeout,
            retry,
            poll_attempts: config.vt_poll_attempts,
            poll_interval: Duration::from_millis(config.vt_poll_interval_ms),
        })
        .context("Failed to build VirusTotal client")?;
        providers.push(Arc::new(provider));
    }

    if let Some(api_key) = &config.safe_browsing_api_key {
        let provider = SafeBrowsingProvider::new(SafeBrowsingSettings {
            api_key: api_key.clone(),
            base_url: config.safe_browsing_base_url.clone(),
            request_timeout,
            retry,
        })
        .context("Failed to build Google Safe Browsing client")?;
        providers.push(Arc::new(provider));
    }

    if providers.is_empty() {
        tracing::warn!("No reputation providers configured; checks will return 503");
    }

    Ok(providers)
}

/// Builds the aggregator over every configured provider.
pub fn build_aggregator(config: &Config) -> Result<VerdictAggregator> {
    Ok(VerdictAggregator::new(
        build_providers(config)?,
        config.provider_timeout(),
        config.aggregate_timeout(),
    ))
}

/// Connects Redis, falling back to [`NullCache`] when unset or unreachable.
async fn connect_cache(config: &Config) -> Arc<dyn VerdictCache> {
    match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        None => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Connects PostgreSQL and applies migrations when a database is configured.
///
/// # Errors
///
/// A configured database that cannot be reached or migrated is a startup error.
async fn connect_history(config: &Config) -> Result<Arc<dyn ScanRecordRepository>> {
    let Some(database_url) = &config.database_url else {
        tracing::info!("History disabled (no database configured)");
        return Ok(Arc::new(NullScanRecordRepository::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    Ok(Arc::new(PgScanRecordRepository::new(Arc::new(pool))))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Reputation providers and the aggregator
/// - Redis cache (or NullCache fallback)
/// - PostgreSQL history with migrations (or no-op history)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - A provider client cannot be built
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let aggregator = Arc::new(build_aggregator(&config)?);
    let cache = connect_cache(&config).await;
    let history = connect_history(&config).await?;

    let link_check_service = Arc::new(LinkCheckService::new(
        aggregator,
        Arc::clone(&cache),
        Arc::clone(&history),
        Some(config.cache_ttl_seconds),
    ));
    let history_service = Arc::new(HistoryService::new(history));

    let state = AppState::new(link_check_service, history_service, cache);

    let app = app_router(state, config.behind_proxy, &config.cors_allowed_origins);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
