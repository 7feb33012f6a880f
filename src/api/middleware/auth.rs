//! Caller identity from the `Authorization: Bearer` header.
//!
//! The bearer value is an opaque identifier issued by an external identity
//! provider. It is never validated here; it only tags and filters history.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::domain::entities::CallerIdentity;
use crate::error::AppError;

async fn bearer_identity(parts: &mut Parts) -> Option<CallerIdentity> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &()).await.ok()?;
    let token = token.trim();
    (!token.is_empty()).then(|| CallerIdentity::new(token))
}

/// Attaches a [`CallerIdentity`] to the request when a bearer value is present.
///
/// Anonymous requests pass through unchanged.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/linkcheck", post(linkcheck_handler))
///     .layer(middleware::from_fn(auth::identify));
/// ```
pub async fn identify(req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    if let Some(identity) = bearer_identity(&mut parts).await {
        parts.extensions.insert(identity);
    }

    next.run(Request::from_parts(parts, body)).await
}

/// Requires a caller identity.
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` when the header
/// is missing, malformed, or blank.
pub async fn layer(req: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let identity = match parts.extensions.get::<CallerIdentity>() {
        Some(identity) => identity.clone(),
        None => bearer_identity(&mut parts).await.ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?,
    };
    parts.extensions.insert(identity);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
