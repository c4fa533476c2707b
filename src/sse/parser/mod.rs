//! Frame parsing logic
//!
//! Contains the stateless `parse_frame_line` entry point and the counting
//! `FrameParser` wrapper used by the stream consumer.

mod analysis;

use serde_json::Value;

use crate::sse::events::{AnalysisEvent, FrameSkip, FRAME_PREFIX};

use analysis::{parse_diff_event, parse_done_event, parse_error_event, parse_token_event};

/// Parse one line into an event, or `None` if the line carries no event.
///
/// Never fails: noise lines, invalid JSON and unknown event types all yield
/// `None`. Fields of a known event type are not shape-checked.
pub fn parse_frame_line(line: &str) -> Option<AnalysisEvent> {
    try_parse_frame_line(line).ok()
}

/// Parse one line, reporting why it was skipped when it carries no event.
pub fn try_parse_frame_line(line: &str) -> Result<AnalysisEvent, FrameSkip> {
    let data = line.strip_prefix(FRAME_PREFIX).ok_or(FrameSkip::NotAFrame)?;

    let payload: Value = serde_json::from_str(data).map_err(|e| FrameSkip::InvalidJson {
        source: e.to_string(),
    })?;

    let event_type = payload
        .get("type")
        .and_then(Value::as_str)
        .ok_or(FrameSkip::MissingType)?
        .to_string();

    match event_type.as_str() {
        "diff" => Ok(parse_diff_event(payload)),
        "ai_token" => Ok(parse_token_event(payload)),
        "ai_done" => Ok(parse_done_event(payload)),
        "error" => Ok(parse_error_event(payload)),
        other => Err(FrameSkip::UnknownEventType(other.to_string())),
    }
}

/// Line parser that keeps counts of accepted and skipped frames
#[derive(Debug, Default)]
pub struct FrameParser {
    accepted: u64,
    skipped: u64,
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded line, returning the event it carries if any.
    ///
    /// Non-frame lines are ignored silently; frames that fail to parse are
    /// counted and logged at debug level.
    pub fn feed_line(&mut self, line: &str) -> Option<AnalysisEvent> {
        match try_parse_frame_line(line) {
            Ok(event) => {
                self.accepted += 1;
                Some(event)
            }
            Err(FrameSkip::NotAFrame) => None,
            Err(skip) => {
                self.skipped += 1;
                tracing::debug!("Skipping frame: {}", skip);
                None
            }
        }
    }

    /// Number of frames that produced an event
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Number of frames dropped as corrupt or unknown
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
