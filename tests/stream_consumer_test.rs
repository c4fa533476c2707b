//! Integration tests for the stream consumer driven by the mock transport.

mod common;

use apidrift::risk::RiskScore;
use apidrift::state::{AnalysisSession, SessionPhase};
use bytes::Bytes;
use common::*;
use serde_json::json;

fn last(snapshots: &[AnalysisSession]) -> &AnalysisSession {
    snapshots.last().expect("run yielded no snapshots")
}

#[tokio::test]
async fn test_scenario_complete() {
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![scenario_complete()]));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.partial_text(), "ok ");
    assert_eq!(session.analysis(), Some(&json!("fine")));
    assert_eq!(session.risk_score(), Some(RiskScore::new(2)));
    assert!(session.error_message().is_none());
}

#[tokio::test]
async fn test_scenario_upstream_error() {
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![scenario_error()]));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert_eq!(session.error_message(), Some("bad spec"));
    assert!(session.diff().is_none());
}

#[tokio::test]
async fn test_scenario_server_error_status() {
    let client = MockHttpClient::with_default(MockResponse::Error(HttpError::ServerError {
        status: 500,
        message: "Internal Server Error".to_string(),
    }));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert!(session.error_message().unwrap().contains("500"));
    assert_eq!(
        snapshots.iter().map(|s| s.phase()).collect::<Vec<_>>(),
        vec![SessionPhase::Idle, SessionPhase::Failed]
    );
}

#[tokio::test]
async fn test_first_snapshot_is_reset() {
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![scenario_complete()]));
    let snapshots = collect_run(&client, test_request()).await;
    assert_eq!(snapshots[0], AnalysisSession::new());
    assert_eq!(snapshots[1].phase(), SessionPhase::AwaitingAi);
}

#[tokio::test]
async fn test_split_at_every_offset_gives_same_result() {
    for body in [scenario_complete(), scenario_multibyte()] {
        let whole = MockHttpClient::with_default(MockResponse::Stream(vec![body.clone()]));
        let expected = last(&collect_run(&whole, test_request()).await).clone();

        for offset in 0..=body.len() {
            let client = MockHttpClient::with_default(MockResponse::Stream(split_at(&body, offset)));
            let snapshots = collect_run(&client, test_request()).await;
            assert_eq!(last(&snapshots), &expected, "split at byte {}", offset);
        }
    }
}

#[tokio::test]
async fn test_tiny_chunks_keep_multibyte_tokens_intact() {
    let client =
        MockHttpClient::with_default(MockResponse::Stream(chunked(&scenario_multibyte(), 1)));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Complete);
    assert_eq!(session.partial_text(), "Änderung ist riskant 🚨");
    assert_eq!(session.analysis(), Some(&json!({"summary": "ok"})));
    assert_eq!(session.risk_score(), Some(RiskScore::new(5)));
}

#[tokio::test]
async fn test_partial_text_monotonic_across_snapshots() {
    let client = MockHttpClient::with_default(MockResponse::Stream(chunked(&scenario_complete(), 7)));
    let snapshots = collect_run(&client, test_request()).await;

    let mut previous = 0;
    for session in &snapshots {
        assert!(session.partial_text().len() >= previous);
        previous = session.partial_text().len();
    }
}

#[tokio::test]
async fn test_truncated_stream_stays_in_last_phase() {
    let body = scenario_complete();
    // Drop the final frame and leave half a line behind
    let cut = body.len() - 20;
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![body.slice(..cut)]));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Streaming);
    assert_eq!(session.partial_text(), "ok ");
    assert!(session.analysis().is_none());
    assert!(session.error_message().is_none());
}

#[tokio::test]
async fn test_empty_body_stays_awaiting() {
    let client = MockHttpClient::with_default(MockResponse::Stream(Vec::new()));
    let snapshots = collect_run(&client, test_request()).await;
    assert_eq!(last(&snapshots).phase(), SessionPhase::AwaitingAi);
}

#[tokio::test]
async fn test_mid_stream_transport_error() {
    let client = MockHttpClient::with_default(MockResponse::StreamThenError(
        vec![
            Bytes::from(frame(r#"{"type":"diff","diff":{},"risk_score":6}"#)),
            Bytes::from(frame(r#"{"type":"ai_token","token":"Half"}"#)),
        ],
        HttpError::Io("connection reset by peer".to_string()),
    ));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert_eq!(
        session.error_message(),
        Some("IO error: connection reset by peer")
    );
    assert_eq!(session.partial_text(), "Half");
    assert_eq!(session.risk_score(), Some(RiskScore::new(6)));
}

#[tokio::test]
async fn test_garbage_between_frames_is_skipped() {
    let body = [
        ": keep-alive\n".to_string(),
        "\n".to_string(),
        "data: {not json}\n".to_string(),
        frame(r#"{"type":"mystery"}"#),
        frame(r#"{"no_type":true}"#),
        "event: message\r\n".to_string(),
        frame(r#"{"type":"ai_token","token":"still here"}"#),
    ]
    .concat();
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![Bytes::from(body)]));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Streaming);
    assert_eq!(session.partial_text(), "still here");
}

#[tokio::test]
async fn test_events_after_error_are_ignored() {
    let body = [
        frame(r#"{"type":"error","message":"quota exceeded"}"#),
        frame(r#"{"type":"ai_done","ai_analysis":"too late","risk_score":1}"#),
    ]
    .concat();
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![Bytes::from(body)]));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert_eq!(session.error_message(), Some("quota exceeded"));
    assert!(session.analysis().is_none());
}

#[tokio::test]
async fn test_request_carries_both_specs() {
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![scenario_error()]));

    collect_run(&client, test_request()).await;

    let requests = client.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://localhost:5000/analyze/stream");

    let parts = &requests[0].parts;
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].field, "old");
    assert_eq!(parts[0].file_name, "petstore-v1.yaml");
    assert_eq!(parts[0].content, Bytes::from(OLD_SPEC));
    assert_eq!(parts[1].field, "new");
    assert_eq!(parts[1].file_name, "petstore-v2.yaml");
    assert_eq!(parts[1].content, Bytes::from(NEW_SPEC));
}

#[tokio::test]
async fn test_scorer_object_risk_score() {
    let body = frame(
        r#"{"type":"ai_done","ai_analysis":"fine","risk_score":{"score":8,"breakdown":{"removed_endpoints":6},"total_raw":14}}"#,
    );
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![Bytes::from(body)]));

    let snapshots = collect_run(&client, test_request()).await;

    assert_eq!(last(&snapshots).risk_score(), Some(RiskScore::new(8)));
}

#[tokio::test]
async fn test_error_frame_with_object_message_fails_session() {
    let body = [
        frame(r#"{"type":"diff","diff":{},"risk_score":3}"#),
        frame(r#"{"type":"error","message":{"detail":"model quota exceeded"}}"#),
    ]
    .concat();
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![Bytes::from(body)]));

    let snapshots = collect_run(&client, test_request()).await;

    let session = last(&snapshots);
    assert_eq!(session.phase(), SessionPhase::Failed);
    assert!(session
        .error_message()
        .unwrap()
        .contains("model quota exceeded"));
}

#[tokio::test]
async fn test_numeric_token_is_appended_as_text() {
    let body = [
        frame(r#"{"type":"ai_token","token":"Risk "}"#),
        frame(r#"{"type":"ai_token","token":42}"#),
    ]
    .concat();
    let client = MockHttpClient::with_default(MockResponse::Stream(vec![Bytes::from(body)]));

    let snapshots = collect_run(&client, test_request()).await;

    assert_eq!(last(&snapshots).partial_text(), "Risk 42");
}
