//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Providers**: at least one reputation provider is configured
/// 2. **Cache**: Redis PING (always ok when caching is disabled)
/// 3. **History store**: `SELECT 1` (always ok when history is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "providers": { "status": "ok", "message": "VirusTotal, Google Safe Browsing" },
///     "cache": { "status": "ok", "message": "Cache reachable" },
///     "history_store": { "status": "ok", "message": "History store reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let providers_check = check_providers(&state);

    let (cache_check, store_check) = tokio::join!(check_cache(&state), check_history(&state));

    let all_healthy = providers_check.is_ok() && cache_check.is_ok() && store_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            providers: providers_check,
            cache: cache_check,
            history_store: store_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn check_providers(state: &AppState) -> CheckStatus {
    let providers = state.link_check_service.providers();
    if providers.is_empty() {
        CheckStatus::error("No reputation providers configured")
    } else {
        CheckStatus::ok(providers.join(", "))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache connection failed")
    }
}

async fn check_history(state: &AppState) -> CheckStatus {
    if state.history_service.health_check().await {
        CheckStatus::ok("History store reachable")
    } else {
        CheckStatus::error("History store connection failed")
    }
}
