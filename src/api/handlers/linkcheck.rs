//! Handler for the link check endpoint.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use validator::Validate;

use crate::api::dto::linkcheck::{LinkCheckRequest, LinkCheckResponse};
use crate::domain::entities::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Checks one URL against the configured reputation providers.
///
/// # Endpoint
///
/// `POST /api/linkcheck`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/login", "source": "qr" }
/// ```
///
/// `source` is optional (`url` or `qr`). An `Authorization: Bearer <id>`
/// header, when present, records the check in that caller's history.
///
/// # Response
///
/// ```json
/// {
///   "service": "VirusTotal",
///   "result": { "data": { "attributes": { "last_analysis_stats": { "malicious": 3 } } } },
///   "threatFound": true,
///   "status": "danger",
///   "score": 10,
///   "explanation": ["VirusTotal: 3 engines flagged as malicious", "Google Safe Browsing: No threats detected"],
///   "providerUsed": "VirusTotal",
///   "url": "https://example.com/login",
///   "checkedAt": "2026-01-02T03:04:05Z"
/// }
/// ```
///
/// A check where every provider failed is still `200 OK` with a `warning`
/// verdict and `providerUsed: "none"`.
///
/// # Errors
///
/// - `400 Bad Request` (`invalid-input`): missing/malformed body, empty or non-HTTP(S) URL
/// - `503 Service Unavailable` (`service-unavailable`): no provider configured
pub async fn linkcheck_handler(
    State(state): State<AppState>,
    caller: Option<Extension<CallerIdentity>>,
    payload: Result<Json<LinkCheckRequest>, JsonRejection>,
) -> Result<Json<LinkCheckResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let verdict = state
        .link_check_service
        .check(
            &request.url,
            caller.map(|Extension(identity)| identity),
            request.source,
        )
        .await?;

    Ok(Json(verdict.into()))
}
