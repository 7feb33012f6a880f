use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkcheck::domain::entities::{OutcomeState, TargetUrl};
use linkcheck::domain::providers::ReputationProvider;
use linkcheck::infrastructure::providers::{RetryPolicy, VirusTotalProvider, VirusTotalSettings};

const URL: &str = "https://bad.example/login";

fn report_path() -> String {
    let url = TargetUrl::parse(URL).unwrap();
    format!("/api/v3/urls/{}", VirusTotalProvider::url_id(&url))
}

fn provider(server: &MockServer) -> VirusTotalProvider {
    VirusTotalProvider::new(VirusTotalSettings {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        request_timeout: Duration::from_secs(2),
        retry: RetryPolicy::new(2, Duration::from_millis(10)),
        poll_attempts: 3,
        poll_interval: Duration::from_millis(10),
    })
    .unwrap()
}

fn stats(malicious: u32, suspicious: u32) -> serde_json::Value {
    json!({
        "malicious": malicious,
        "suspicious": suspicious,
        "harmless": 60,
        "undetected": 10
    })
}

#[tokio::test]
async fn test_existing_report_with_detections_is_threat() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .and(header("x-apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "abc", "attributes": { "last_analysis_stats": stats(3, 0) } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::MatchedThreat);
    assert_eq!(outcome.detail, "3 engines flagged as malicious");
    let raw = outcome.raw.unwrap();
    assert_eq!(raw["data"]["attributes"]["last_analysis_stats"]["malicious"], 3);
}

#[tokio::test]
async fn test_unknown_url_is_submitted_and_polled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "NotFoundError" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/urls"))
        .and(body_string_contains("url=https%3A%2F%2Fbad.example%2Flogin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "type": "analysis", "id": "u-123" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/analyses/u-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "attributes": { "status": "completed", "stats": stats(0, 2) } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::MatchedSuspicious);
    assert_eq!(outcome.detail, "2 engines flagged as suspicious");
    let raw = outcome.raw.unwrap();
    assert_eq!(raw["data"]["id"], "u-123");
    assert_eq!(raw["data"]["attributes"]["last_analysis_stats"]["suspicious"], 2);
}

#[tokio::test]
async fn test_analysis_that_never_completes_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/urls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "u-9" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/analyses/u-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "attributes": { "status": "queued", "stats": stats(0, 0) } }
        })))
        .expect(3)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::TimedOut);
    assert!(outcome.raw.is_none());
}

#[tokio::test]
async fn test_rate_limit_is_retried_a_bounded_number_of_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::Unavailable);
    assert!(outcome.detail.contains("429"), "detail: {}", outcome.detail);
}

#[tokio::test]
async fn test_rate_limit_then_success_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "attributes": { "last_analysis_stats": stats(0, 0) } }
        })))
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::Clean);
    assert_eq!(outcome.detail, "No threats detected");
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::Unavailable);
}

#[tokio::test]
async fn test_rejected_api_key_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::Unavailable);
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider(&server).query(&url).await;

    assert_eq!(outcome.state, OutcomeState::MalformedResponse);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(report_path()))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let provider = VirusTotalProvider::new(VirusTotalSettings {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        request_timeout: Duration::from_millis(100),
        retry: RetryPolicy::new(0, Duration::from_millis(10)),
        poll_attempts: 1,
        poll_interval: Duration::from_millis(10),
    })
    .unwrap();

    let url = TargetUrl::parse(URL).unwrap();
    let outcome = provider.query(&url).await;

    assert_eq!(outcome.state, OutcomeState::TimedOut);
}
