//! Handler for the scan history endpoint.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::json;

use crate::api::dto::history::{HistoryParams, HistoryResponse};
use crate::domain::entities::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's most recent checks, newest first.
///
/// # Endpoint
///
/// `GET /api/history?limit=20`
///
/// Requires `Authorization: Bearer <id>` (enforced by
/// [`crate::api::middleware::auth::layer`]). `limit` defaults to 20 and is
/// clamped to `1..=100`.
///
/// # Response
///
/// ```json
/// {
///   "items": [
///     {
///       "id": 42,
///       "url": "https://example.com/",
///       "status": "safe",
///       "score": 95,
///       "type": "qr",
///       "createdAt": "2026-01-02T03:04:05Z",
///       "ownerId": "user-1"
///     }
///   ]
/// }
/// ```
pub async fn history_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<HistoryResponse>, AppError> {
    let Query(params) = params.map_err(|e| {
        AppError::invalid_input(
            "Invalid query parameters",
            json!({ "reason": e.body_text() }),
        )
    })?;

    let items = state.history_service.recent(&caller, params.limit).await?;

    Ok(Json(HistoryResponse { items }))
}
