//! DTOs for the link check endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::entities::{ScanSource, Verdict, VerdictStatus};

/// Request to check one URL.
///
/// A missing `url` deserializes to an empty string so that it is rejected by
/// the same validation path as a blank one.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkCheckRequest {
    #[serde(default)]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// Where the URL came from. Defaults to `url`.
    #[serde(default)]
    pub source: ScanSource,
}

/// Verdict envelope.
///
/// `service`, `result` and `threatFound` keep the shape older clients read;
/// the remaining fields carry the normalized verdict.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCheckResponse {
    /// Deciding provider, `"none"` when degraded.
    pub service: String,
    /// Provider-native payload of `service`, or `null`.
    pub result: Option<Value>,
    pub threat_found: bool,
    pub status: VerdictStatus,
    pub score: u8,
    pub explanation: Vec<String>,
    pub provider_used: String,
    pub url: String,
    pub checked_at: DateTime<Utc>,
}

impl From<Verdict> for LinkCheckResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            service: verdict.provider_used.clone(),
            threat_found: verdict.threat_found(),
            result: verdict.evidence,
            status: verdict.status,
            score: verdict.score,
            explanation: verdict.explanation,
            provider_used: verdict.provider_used,
            url: verdict.url,
            checked_at: verdict.checked_at,
        }
    }
}
