//! Frame payload deserialization structs
//!
//! Internal structs used to deserialize the JSON payload of each frame. Every
//! field is kept as a raw `Value` and defaults when missing, so a frame with a
//! known `type` always produces an event whatever shape its fields have; the
//! `type` field itself is ignored here.

use serde::Deserialize;
use serde_json::Value;

/// `type=diff` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DiffPayload {
    #[serde(default)]
    pub diff: Value,
    /// Integer or scorer object; interpreted by `RiskScore::from_json`
    #[serde(default)]
    pub risk_score: Value,
}

/// `type=ai_token` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TokenPayload {
    #[serde(default)]
    pub token: Value,
}

/// `type=ai_done` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DonePayload {
    #[serde(default)]
    pub ai_analysis: Value,
    #[serde(default)]
    pub risk_score: Value,
}

/// `type=error` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(default)]
    pub message: Value,
}
