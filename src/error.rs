//! External error taxonomy and its HTTP mapping.
//!
//! Only these errors cross the service boundary. Provider failures never do:
//! they are absorbed into the verdict by the aggregator.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::entities::TargetUrlError;

/// Error body returned for every non-2xx response.
///
/// ```json
/// { "error": "Invalid URL", "kind": "invalid-input", "details": { "reason": "..." } }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input. Non-retryable, no provider contacted.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// Missing caller identity on an endpoint that requires one.
    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    /// No providers configured, or another configuration fault.
    #[error("{message}")]
    ServiceUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid-input",
            Self::Unauthorized { .. } => "unauthorized",
            Self::ServiceUnavailable { .. } => "service-unavailable",
            Self::Internal { .. } => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        let (message, details) = match self {
            Self::InvalidInput { message, details }
            | Self::Unauthorized { message, details }
            | Self::ServiceUnavailable { message, details }
            | Self::Internal { message, details } => (message, details),
        };
        ErrorBody {
            error: message.clone(),
            kind: self.kind(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.to_body())).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<TargetUrlError> for AppError {
    fn from(e: TargetUrlError) -> Self {
        AppError::invalid_input("Invalid URL", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_input("Validation failed", json!({ "fields": e.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::invalid_input("Invalid request body", json!({ "reason": e.body_text() }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_status_codes() {
        let cases = [
            (
                AppError::invalid_input("x", Value::Null),
                "invalid-input",
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::unauthorized("x", Value::Null),
                "unauthorized",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::service_unavailable("x", Value::Null),
                "service-unavailable",
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::internal("x", Value::Null),
                "internal",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, kind, status) in cases {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn test_body_omits_null_details() {
        let body = AppError::service_unavailable("No providers configured", Value::Null).to_body();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["error"], "No providers configured");
        assert_eq!(value["kind"], "service-unavailable");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_target_url_error_maps_to_invalid_input() {
        let err: AppError = TargetUrlError::Empty.into();
        assert_eq!(err.kind(), "invalid-input");
        assert_eq!(err.to_body().details["reason"], "URL must not be empty");
    }
}
