//! End-to-end tests of the analyzer over real HTTP using wiremock.

mod common;

use apidrift::adapters::ReqwestHttpClient;
use apidrift::analyzer::StreamConsumer;
use apidrift::config::AnalyzerConfig;
use apidrift::risk::RiskScore;
use apidrift::state::{AnalysisSession, SessionPhase};
use common::*;
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_against(config: AnalyzerConfig) -> Vec<AnalysisSession> {
    let client = ReqwestHttpClient::from_config(&config).unwrap();
    StreamConsumer::new(Arc::new(client), &config)
        .run(test_request())
        .collect()
        .await
}

fn config_for(server: &MockServer) -> AnalyzerConfig {
    AnalyzerConfig::default().with_base_url(server.uri())
}

#[tokio::test]
async fn test_complete_run_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/stream"))
        .and(header("accept", "text/event-stream"))
        .and(body_string_contains("name=\"old\""))
        .and(body_string_contains("name=\"new\""))
        .and(body_string_contains("filename=\"petstore-v1.yaml\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(scenario_complete().to_vec(), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let snapshots = run_against(config_for(&mock_server)).await;

    let session = snapshots.last().unwrap();
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.partial_text(), "ok ");
    assert_eq!(session.analysis(), Some(&json!("fine")));
    assert_eq!(session.risk_score(), Some(RiskScore::new(2)));
}

#[tokio::test]
async fn test_upstream_error_frame_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(scenario_error().to_vec(), "text/event-stream"),
        )
        .mount(&mock_server)
        .await;

    let snapshots = run_against(config_for(&mock_server)).await;

    let session = snapshots.last().unwrap();
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert_eq!(session.error_message(), Some("bad spec"));
}

#[tokio::test]
async fn test_server_error_with_empty_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let snapshots = run_against(config_for(&mock_server)).await;

    let session = snapshots.last().unwrap();
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert_eq!(
        session.error_message(),
        Some("Server error (500): Internal Server Error")
    );
}

#[tokio::test]
async fn test_server_error_body_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze/stream"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Both files are required\n"))
        .mount(&mock_server)
        .await;

    let snapshots = run_against(config_for(&mock_server)).await;

    assert_eq!(
        snapshots.last().unwrap().error_message(),
        Some("Server error (400): Both files are required")
    );
}

#[tokio::test]
async fn test_custom_endpoint() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/analyze/stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(scenario_error().to_vec(), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server).with_endpoint("v2/analyze/stream");
    let snapshots = run_against(config).await;

    assert_eq!(snapshots.last().unwrap().phase(), SessionPhase::Failed);
}

#[tokio::test]
async fn test_connection_refused_fails_run() {
    let config = AnalyzerConfig::default()
        .with_base_url("http://127.0.0.1:59998")
        .with_connect_timeout(Duration::from_secs(2));

    let snapshots = run_against(config).await;

    let session = snapshots.last().unwrap();
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert!(session.error_message().is_some());
}
