//! Google Safe Browsing (Lookup API v4) adapter.
//!
//! Sends every spelling from [`TargetUrl::variants`] in one
//! `threatMatches:find` request. Any match is a threat; an empty body is clean.
//!
//! API docs: https://developers.google.com/safe-browsing/v4/lookup-api

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::http::{ProviderError, RetryPolicy, build_client, read_json};
use crate::domain::entities::{OutcomeState, ProviderOutcome, TargetUrl};
use crate::domain::providers::ReputationProvider;

pub const SAFE_BROWSING: &str = "Google Safe Browsing";
pub const DEFAULT_BASE_URL: &str = "https://safebrowsing.googleapis.com";

const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

/// Connection settings for [`SafeBrowsingProvider`].
#[derive(Debug, Clone)]
pub struct SafeBrowsingSettings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

pub struct SafeBrowsingProvider {
    client: Client,
    endpoint: Url,
    retry: RetryPolicy,
}

impl SafeBrowsingProvider {
    /// # Errors
    ///
    /// Fails when `base_url` is not a valid URL or the HTTP client cannot be built.
    pub fn new(settings: SafeBrowsingSettings) -> anyhow::Result<Self> {
        let mut endpoint = Url::parse(&format!(
            "{}/v4/threatMatches:find",
            settings.base_url.trim_end_matches('/')
        ))?;
        endpoint
            .query_pairs_mut()
            .append_pair("key", &settings.api_key);

        Ok(Self {
            client: build_client(settings.request_timeout)?,
            endpoint,
            retry: settings.retry,
        })
    }

    async fn find_matches(&self, request: &FindRequest<'_>) -> Result<FindResponse, ProviderError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let body = read_json(response).await?;
        let parsed: FindResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(FindResponse { raw: body, ..parsed })
    }
}

#[async_trait]
impl ReputationProvider for SafeBrowsingProvider {
    fn name(&self) -> &'static str {
        SAFE_BROWSING
    }

    async fn query(&self, url: &TargetUrl) -> ProviderOutcome {
        let started = Instant::now();

        let variants = url.variants();
        let request = &FindRequest::new(&variants);
        debug!(url = %url, variants = variants.len(), "Querying Safe Browsing");

        let outcome = match self
            .retry
            .run(SAFE_BROWSING, move || self.find_matches(request))
            .await
        {
            Ok(found) => {
                let (state, detail) = found.classify();
                ProviderOutcome::new(SAFE_BROWSING, state, detail).with_raw(found.raw)
            }
            Err(e) => e.into_outcome(SAFE_BROWSING),
        };

        outcome.with_latency(started.elapsed())
    }
}

// --- Safe Browsing request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo,
    threat_info: ThreatInfo<'a>,
}

impl<'a> FindRequest<'a> {
    fn new(urls: &'a [String]) -> Self {
        Self {
            client: ClientInfo {
                client_id: "linkcheck",
                client_version: env!("CARGO_PKG_VERSION"),
            },
            threat_info: ThreatInfo {
                threat_types: &THREAT_TYPES,
                platform_types: &["ANY_PLATFORM"],
                threat_entry_types: &["URL"],
                threat_entries: urls.iter().map(|u| ThreatEntry { url: u }).collect(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: &'static str,
    client_version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'static [&'static str],
    platform_types: &'static [&'static str],
    threat_entry_types: &'static [&'static str],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
    #[serde(skip)]
    raw: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: String,
}

impl FindResponse {
    fn classify(&self) -> (OutcomeState, String) {
        if self.matches.is_empty() {
            return (OutcomeState::Clean, "No threats detected".to_string());
        }

        let mut types: Vec<&str> = self.matches.iter().map(|m| m.threat_type.as_str()).collect();
        types.sort_unstable();
        types.dedup();
        (
            OutcomeState::MatchedThreat,
            format!("Threat detected ({})", types.join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let urls = vec!["https://a.com/".to_string(), "https://a.com".to_string()];
        let body = serde_json::to_value(FindRequest::new(&urls)).unwrap();

        assert_eq!(body["client"]["clientId"], "linkcheck");
        assert_eq!(body["threatInfo"]["platformTypes"], json!(["ANY_PLATFORM"]));
        assert_eq!(body["threatInfo"]["threatEntryTypes"], json!(["URL"]));
        assert_eq!(body["threatInfo"]["threatTypes"].as_array().unwrap().len(), 4);
        assert_eq!(
            body["threatInfo"]["threatEntries"],
            json!([{ "url": "https://a.com/" }, { "url": "https://a.com" }])
        );
    }

    #[test]
    fn test_classify_empty_body_is_clean() {
        let found: FindResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(found.classify().0, OutcomeState::Clean);
    }

    #[test]
    fn test_classify_matches_lists_distinct_types() {
        let found: FindResponse = serde_json::from_value(json!({
            "matches": [
                { "threatType": "SOCIAL_ENGINEERING", "threat": { "url": "https://a.com/" } },
                { "threatType": "MALWARE", "threat": { "url": "https://a.com" } },
                { "threatType": "MALWARE", "threat": { "url": "https://www.a.com/" } }
            ]
        }))
        .unwrap();

        let (state, detail) = found.classify();
        assert_eq!(state, OutcomeState::MatchedThreat);
        assert_eq!(detail, "Threat detected (MALWARE, SOCIAL_ENGINEERING)");
    }

    #[test]
    fn test_endpoint_carries_key() {
        let provider = SafeBrowsingProvider::new(SafeBrowsingSettings {
            api_key: "k3y".to_string(),
            base_url: "http://localhost:9/".to_string(),
            request_timeout: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        })
        .unwrap();

        assert_eq!(
            provider.endpoint.as_str(),
            "http://localhost:9/v4/threatMatches:find?key=k3y"
        );
    }
}
