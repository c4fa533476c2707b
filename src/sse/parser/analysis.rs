//! Per-event payload parsers

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::risk::RiskScore;
use crate::sse::events::AnalysisEvent;
use crate::sse::payloads::{DiffPayload, DonePayload, ErrorPayload, TokenPayload};

/// Payload structs only hold defaulted `Value` fields, so decoding an object
/// never fails; anything else falls back to the defaults.
fn decode_payload<T: DeserializeOwned + Default>(payload: Value) -> T {
    serde_json::from_value(payload).unwrap_or_default()
}

/// Text carried by a loosely typed field: strings as-is, null as `None`,
/// anything else as its JSON rendering.
fn field_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Parse diff event
pub(super) fn parse_diff_event(payload: Value) -> AnalysisEvent {
    let payload: DiffPayload = decode_payload(payload);
    AnalysisEvent::Diff {
        risk_score: RiskScore::from_json(&payload.risk_score),
        diff: payload.diff,
    }
}

/// Parse ai_token event
pub(super) fn parse_token_event(payload: Value) -> AnalysisEvent {
    let payload: TokenPayload = decode_payload(payload);
    AnalysisEvent::Token {
        token: field_text(payload.token).unwrap_or_default(),
    }
}

/// Parse ai_done event
pub(super) fn parse_done_event(payload: Value) -> AnalysisEvent {
    let payload: DonePayload = decode_payload(payload);
    AnalysisEvent::Done {
        risk_score: RiskScore::from_json(&payload.risk_score),
        analysis: payload.ai_analysis,
    }
}

/// Parse error event
pub(super) fn parse_error_event(payload: Value) -> AnalysisEvent {
    let payload: ErrorPayload = decode_payload(payload);
    AnalysisEvent::Error {
        message: field_text(payload.message).unwrap_or_else(|| "Unknown error".to_string()),
    }
}
