//! Analysis session state machine.
//!
//! [`AnalysisSession`] is the fold accumulator for one analysis request and
//! the value the rendering layer observes. It is only ever changed through
//! [`AnalysisSession::apply`] and [`AnalysisSession::mark_awaiting`], which
//! mirror the phased protocol: diff first, then a token stream, then a final
//! result, with an error possible at any point.

use crate::risk::{RiskLevel, RiskScore};
use crate::sse::{AnalysisEvent, AnalysisResult, StructuralDiff};

/// Position of a session in the diff → streaming → complete/failed lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No request in flight
    #[default]
    Idle,
    /// Request accepted, waiting for the diff
    AwaitingAi,
    /// Diff received, analysis tokens streaming
    Streaming,
    /// Final analysis received
    Complete,
    /// Transport or upstream failure
    Failed,
}

impl SessionPhase {
    /// `Complete` and `Failed` end a session; later events are dropped.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionPhase::Complete | SessionPhase::Failed)
    }

    /// A request is running and more events are expected.
    pub fn is_in_progress(self) -> bool {
        matches!(self, SessionPhase::AwaitingAi | SessionPhase::Streaming)
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::AwaitingAi => "awaiting analysis",
            SessionPhase::Streaming => "streaming",
            SessionPhase::Complete => "complete",
            SessionPhase::Failed => "failed",
        }
    }
}

/// Accumulated, observable result state of one analysis request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisSession {
    diff: Option<StructuralDiff>,
    risk_score: Option<RiskScore>,
    analysis: Option<AnalysisResult>,
    partial_text: String,
    phase: SessionPhase,
    error_message: Option<String>,
}

impl AnalysisSession {
    /// Fresh session in the `Idle` phase.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diff(&self) -> Option<&StructuralDiff> {
        self.diff.as_ref()
    }

    /// Latest reported score; the final result's score overrides the diff's.
    pub fn risk_score(&self) -> Option<RiskScore> {
        self.risk_score
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.risk_score.map(RiskScore::level)
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Token text accumulated so far.
    pub fn partial_text(&self) -> &str {
        &self.partial_text
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase.is_in_progress()
    }

    /// Move from `Idle` to `AwaitingAi` once the request is accepted.
    ///
    /// Returns `false` if the session was not idle.
    pub fn mark_awaiting(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.phase = SessionPhase::AwaitingAi;
        true
    }

    /// Fold one event into the session.
    ///
    /// Returns `true` when the event changed the session. Events arriving
    /// after a terminal phase, and a second diff once tokens are streaming,
    /// are dropped and return `false`.
    pub fn apply(&mut self, event: AnalysisEvent) -> bool {
        if self.phase.is_terminal() {
            tracing::debug!(
                "Dropping {} event after session reached {}",
                event.event_type_name(),
                self.phase.label()
            );
            return false;
        }

        match event {
            AnalysisEvent::Diff { diff, risk_score } => {
                if self.phase == SessionPhase::Streaming {
                    tracing::debug!("Dropping duplicate diff event while streaming");
                    return false;
                }
                self.diff = Some(diff);
                if risk_score.is_some() {
                    self.risk_score = risk_score;
                }
                self.partial_text.clear();
                self.phase = SessionPhase::Streaming;
            }
            AnalysisEvent::Token { token } => {
                self.partial_text.push_str(&token);
                self.phase = SessionPhase::Streaming;
            }
            AnalysisEvent::Done {
                analysis,
                risk_score,
            } => {
                self.analysis = Some(analysis);
                if risk_score.is_some() {
                    self.risk_score = risk_score;
                }
                self.phase = SessionPhase::Complete;
            }
            AnalysisEvent::Error { message } => {
                self.error_message = Some(message);
                self.phase = SessionPhase::Failed;
            }
        }
        true
    }
}
