//! Analysis stream event types and definitions
//!
//! Contains the AnalysisEvent enum with the four event variants the analysis
//! service emits, plus the reasons a frame line can be skipped.

use serde_json::Value;

use crate::risk::RiskScore;

/// Prefix that marks a line as a frame.
pub const FRAME_PREFIX: &str = "data: ";

/// Structural diff between two spec versions.
///
/// Opaque to the stream consumer: a mapping of change category to change
/// descriptors, passed through unchanged.
pub type StructuralDiff = Value;

/// Final analysis produced by the model: either free text or a mapping of
/// section name to value.
pub type AnalysisResult = Value;

/// Typed events from the analysis stream
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    /// Structural diff with a preliminary risk score
    Diff {
        diff: StructuralDiff,
        risk_score: Option<RiskScore>,
    },
    /// One incremental fragment of generated analysis text
    Token { token: String },
    /// Final structured analysis with a possibly revised risk score
    Done {
        analysis: AnalysisResult,
        risk_score: Option<RiskScore>,
    },
    /// Failure reported by the analysis service
    Error { message: String },
}

impl AnalysisEvent {
    /// Returns the wire discriminant for this event.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            AnalysisEvent::Diff { .. } => "diff",
            AnalysisEvent::Token { .. } => "ai_token",
            AnalysisEvent::Done { .. } => "ai_done",
            AnalysisEvent::Error { .. } => "error",
        }
    }
}

/// Why a line did not produce an event
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSkip {
    /// Line does not start with the frame prefix (keep-alive, blank line)
    NotAFrame,
    /// Payload after the prefix is not valid JSON
    InvalidJson { source: String },
    /// Payload has no string `type` field
    MissingType,
    /// Discriminant is not one of the known event types
    UnknownEventType(String),
}

impl std::fmt::Display for FrameSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameSkip::NotAFrame => write!(f, "Line is not a data frame"),
            FrameSkip::InvalidJson { source } => write!(f, "Invalid JSON in frame: {}", source),
            FrameSkip::MissingType => write!(f, "Frame payload has no type field"),
            FrameSkip::UnknownEventType(t) => write!(f, "Unknown event type: {}", t),
        }
    }
}

impl std::error::Error for FrameSkip {}
