//! VirusTotal (API v3) URL reputation adapter.
//!
//! Prefers the direct report lookup by URL identifier; URLs VirusTotal has
//! never seen are submitted for analysis and polled a fixed number of times.
//!
//! API docs: https://docs.virustotal.com/reference/url-info

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::debug;

use super::http::{ProviderError, RetryPolicy, build_client, read_json};
use crate::domain::entities::{OutcomeState, ProviderOutcome, TargetUrl};
use crate::domain::providers::ReputationProvider;

pub const VIRUSTOTAL: &str = "VirusTotal";
pub const DEFAULT_BASE_URL: &str = "https://www.virustotal.com";

/// Connection and polling settings for [`VirusTotalProvider`].
#[derive(Debug, Clone)]
pub struct VirusTotalSettings {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub poll_attempts: usize,
    pub poll_interval: Duration,
}

/// Per-engine verdict counts as reported by VirusTotal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    #[serde(default)]
    pub malicious: u32,
    #[serde(default)]
    pub suspicious: u32,
    #[serde(default)]
    pub harmless: u32,
    #[serde(default)]
    pub undetected: u32,
}

impl AnalysisStats {
    /// Maps engine counts to an outcome state and explanation line.
    pub fn classify(&self) -> (OutcomeState, String) {
        if self.malicious > 0 {
            (
                OutcomeState::MatchedThreat,
                format!("{} engines flagged as malicious", self.malicious),
            )
        } else if self.suspicious > 0 {
            (
                OutcomeState::MatchedSuspicious,
                format!("{} engines flagged as suspicious", self.suspicious),
            )
        } else {
            (OutcomeState::Clean, "No threats detected".to_string())
        }
    }
}

/// Stats plus the payload handed to legacy consumers.
#[derive(Debug)]
struct Report {
    stats: AnalysisStats,
    raw: Value,
}

pub struct VirusTotalProvider {
    client: Client,
    settings: VirusTotalSettings,
}

impl VirusTotalProvider {
    pub fn new(settings: VirusTotalSettings) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(settings.request_timeout)?,
            settings,
        })
    }

    /// VirusTotal's URL identifier: unpadded URL-safe base64 of the URL.
    pub fn url_id(url: &TargetUrl) -> String {
        URL_SAFE_NO_PAD.encode(url.as_str())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn lookup(&self, url: &TargetUrl) -> Result<Report, ProviderError> {
        let retry = self.settings.retry;

        if let Some(report) = retry.run(VIRUSTOTAL, move || self.fetch_report(url)).await? {
            return Ok(report);
        }

        debug!(url = %url, "URL unknown to VirusTotal, submitting for analysis");
        let analysis_id = retry.run(VIRUSTOTAL, move || self.submit(url)).await?;
        self.poll(&analysis_id).await
    }

    /// `Ok(None)` when VirusTotal has no report for the URL yet.
    async fn fetch_report(&self, url: &TargetUrl) -> Result<Option<Report>, ProviderError> {
        let response = self
            .client
            .get(self.endpoint(&format!("urls/{}", Self::url_id(url))))
            .header("x-apikey", &self.settings.api_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = read_json(response).await?;
        let stats = stats_at(&body, "/data/attributes/last_analysis_stats")?;
        Ok(Some(Report { stats, raw: body }))
    }

    /// Submits the URL and returns the analysis identifier.
    async fn submit(&self, url: &TargetUrl) -> Result<String, ProviderError> {
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("url", url.as_str())
            .finish();

        let response = self
            .client
            .post(self.endpoint("urls"))
            .header("x-apikey", &self.settings.api_key)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await?;

        let body = read_json(response).await?;
        body.pointer("/data/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Malformed("missing data.id in submission".to_string()))
    }

    /// Polls a submitted analysis until it completes or attempts run out.
    async fn poll(&self, analysis_id: &str) -> Result<Report, ProviderError> {
        let retry = self.settings.retry;

        for attempt in 1..=self.settings.poll_attempts {
            tokio::time::sleep(self.settings.poll_interval).await;

            let body = retry
                .run(VIRUSTOTAL, move || async move {
                    let response = self
                        .client
                        .get(self.endpoint(&format!("analyses/{analysis_id}")))
                        .header("x-apikey", &self.settings.api_key)
                        .send()
                        .await?;
                    read_json(response).await
                })
                .await?;

            let status = body
                .pointer("/data/attributes/status")
                .and_then(Value::as_str)
                .unwrap_or_default();
            debug!(analysis_id, attempt, status, "Polled VirusTotal analysis");

            if status == "completed" {
                let stats = stats_at(&body, "/data/attributes/stats")?;
                let raw = json!({
                    "data": {
                        "id": analysis_id,
                        "attributes": { "last_analysis_stats": stats }
                    }
                });
                return Ok(Report { stats, raw });
            }
        }

        Err(ProviderError::Timeout)
    }
}

fn stats_at(body: &Value, pointer: &str) -> Result<AnalysisStats, ProviderError> {
    let stats = body
        .pointer(pointer)
        .ok_or_else(|| ProviderError::Malformed(format!("missing {pointer}")))?;
    serde_json::from_value(stats.clone()).map_err(|e| ProviderError::Malformed(e.to_string()))
}

#[async_trait]
impl ReputationProvider for VirusTotalProvider {
    fn name(&self) -> &'static str {
        VIRUSTOTAL
    }

    async fn query(&self, url: &TargetUrl) -> ProviderOutcome {
        let started = Instant::now();

        let outcome = match self.lookup(url).await {
            Ok(report) => {
                let (state, detail) = report.stats.classify();
                ProviderOutcome::new(VIRUSTOTAL, state, detail).with_raw(report.raw)
            }
            Err(e) => e.into_outcome(VIRUSTOTAL),
        };

        outcome.with_latency(started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_stats() {
        let threat = AnalysisStats {
            malicious: 3,
            suspicious: 1,
            ..Default::default()
        };
        assert_eq!(
            threat.classify(),
            (
                OutcomeState::MatchedThreat,
                "3 engines flagged as malicious".to_string()
            )
        );

        let suspicious = AnalysisStats {
            suspicious: 2,
            harmless: 60,
            ..Default::default()
        };
        assert_eq!(suspicious.classify().0, OutcomeState::MatchedSuspicious);
        assert_eq!(suspicious.classify().1, "2 engines flagged as suspicious");

        let clean = AnalysisStats {
            harmless: 70,
            undetected: 20,
            ..Default::default()
        };
        assert_eq!(clean.classify().0, OutcomeState::Clean);
    }

    #[test]
    fn test_url_id_is_unpadded_base64url() {
        let url = TargetUrl::parse("http://www.example.com/").unwrap();
        assert_eq!(
            VirusTotalProvider::url_id(&url),
            "aHR0cDovL3d3dy5leGFtcGxlLmNvbS8"
        );
    }

    #[test]
    fn test_stats_at_rejects_missing_or_mistyped() {
        let body = json!({ "data": { "attributes": { "last_analysis_stats": { "malicious": "many" } } } });
        assert!(matches!(
            stats_at(&body, "/data/attributes/last_analysis_stats"),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            stats_at(&json!({}), "/data/attributes/stats"),
            Err(ProviderError::Malformed(_))
        ));
    }
}
