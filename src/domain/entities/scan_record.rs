//! Scan history entries written for identified callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::verdict::{Verdict, VerdictStatus};

/// How the URL reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    /// Typed or pasted by the user.
    #[default]
    Url,
    /// Decoded from a QR code by the client.
    Qr,
}

impl ScanSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Qr => "qr",
        }
    }
}

impl fmt::Display for ScanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(Self::Url),
            "qr" => Ok(Self::Qr),
            other => Err(format!("unknown scan source '{other}'")),
        }
    }
}

/// Opaque caller identifier supplied by the identity provider.
///
/// Only used to tag and filter history; its contents are never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A persisted history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: i64,
    pub url: String,
    pub status: VerdictStatus,
    pub score: u8,
    #[serde(rename = "type")]
    pub source: ScanSource,
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
}

/// Input data for appending a history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewScanRecord {
    pub url: String,
    pub status: VerdictStatus,
    pub score: u8,
    pub source: ScanSource,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl NewScanRecord {
    /// Builds the entry for a check made at `created_at`.
    ///
    /// The verdict may come from the cache, so its `checked_at` can predate the check.
    pub fn from_verdict(
        verdict: &Verdict,
        owner: &CallerIdentity,
        source: ScanSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            url: verdict.url.clone(),
            status: verdict.status,
            score: verdict.score,
            source,
            owner_id: owner.as_str().to_string(),
            created_at,
        }
    }
}
