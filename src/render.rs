//! Plain-text rendering of analysis sessions.
//!
//! [`TerminalRenderer`] observes successive [`AnalysisSession`] snapshots and
//! writes only what changed since the previous one, so tokens appear as they
//! stream in.

use serde_json::Value;
use std::io::{self, Write};

use crate::state::{AnalysisSession, SessionPhase};

/// True when the diff reports removed endpoints or changed methods.
pub fn diff_has_breaking_changes(diff: &Value) -> bool {
    let non_empty = |key: &str| match diff.get(key) {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        _ => false,
    };
    non_empty("removed_endpoints") || non_empty("method_changes")
}

/// Format a final analysis for the terminal.
///
/// A string is returned as-is. A mapping is printed section by section,
/// with lists as bullet points and mappings as `key: value` lines. Nested
/// lists and mappings are indented one level deeper.
pub fn format_analysis(analysis: &Value) -> String {
    match analysis {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(sections) => {
            let mut out = String::new();
            for (key, value) in sections {
                out.push_str(&key.replace('_', " "));
                out.push_str(":\n");
                format_section(&mut out, &parse_embedded(value), 1);
            }
            out
        }
        other => other.to_string(),
    }
}

fn format_section(out: &mut String, value: &Value, depth: usize) {
    let pad = "  ".repeat(depth);
    match value {
        Value::Array(items) if items.is_empty() => {
            out.push_str(&format!("{}None\n", pad));
        }
        Value::Array(items) => {
            for item in items {
                let item = parse_embedded(item);
                if is_compound(&item) {
                    out.push_str(&format!("{}-\n", pad));
                    format_section(out, &item, depth + 1);
                } else {
                    out.push_str(&format!("{}- {}\n", pad, scalar_text(&item)));
                }
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                let item = parse_embedded(item);
                if is_compound(&item) {
                    out.push_str(&format!("{}{}:\n", pad, key));
                    format_section(out, &item, depth + 1);
                } else {
                    out.push_str(&format!("{}{}: {}\n", pad, key, scalar_text(&item)));
                }
            }
        }
        other => {
            out.push_str(&format!("{}{}\n", pad, scalar_text(other)));
        }
    }
}

fn is_compound(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Sections sometimes arrive as stringified lists or mappings, including
/// Python-style literals. Recover the structure when possible.
fn parse_embedded(value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    let trimmed = text.trim();
    let bracketed = (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'));
    if !bracketed {
        return value.clone();
    }
    if let Ok(parsed) = serde_json::from_str(trimmed) {
        return parsed;
    }
    let normalized = trimmed
        .replace('\'', "\"")
        .replace("None", "null")
        .replace("True", "true")
        .replace("False", "false");
    serde_json::from_str(&normalized).unwrap_or_else(|_| value.clone())
}

/// Incremental writer of session snapshots.
pub struct TerminalRenderer<W: Write> {
    out: W,
    phase: SessionPhase,
    diff_shown: bool,
    text_shown: usize,
    outcome_shown: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            phase: SessionPhase::Idle,
            diff_shown: false,
            text_shown: 0,
            outcome_shown: false,
        }
    }

    /// Write whatever `session` adds over the previously rendered snapshot.
    pub fn render(&mut self, session: &AnalysisSession) -> io::Result<()> {
        if session.phase() == SessionPhase::Idle {
            self.reset();
            return Ok(());
        }

        if session.phase() == SessionPhase::AwaitingAi && self.phase != SessionPhase::AwaitingAi {
            writeln!(self.out, "Waiting for analysis...")?;
        }

        if let Some(diff) = session.diff() {
            if !self.diff_shown {
                self.write_diff(diff, session)?;
                self.diff_shown = true;
            }
        }

        let text = session.partial_text();
        if let Some(delta) = text.get(self.text_shown..) {
            if !delta.is_empty() {
                write!(self.out, "{}", delta)?;
                self.text_shown = text.len();
            }
        }

        if session.is_terminal() && !self.outcome_shown {
            if self.text_shown > 0 {
                writeln!(self.out)?;
            }
            match session.phase() {
                SessionPhase::Complete => self.write_result(session)?,
                _ => writeln!(
                    self.out,
                    "Error: {}",
                    session.error_message().unwrap_or("Unknown error")
                )?,
            }
            self.outcome_shown = true;
        }

        self.phase = session.phase();
        self.out.flush()
    }

    /// Note a run that ended without a terminal event.
    pub fn finish(&mut self, session: &AnalysisSession) -> io::Result<()> {
        if session.is_in_progress() {
            if self.text_shown > 0 {
                writeln!(self.out)?;
            }
            writeln!(
                self.out,
                "Analysis stream ended before completion ({})",
                session.phase().label()
            )?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.diff_shown = false;
        self.text_shown = 0;
        self.outcome_shown = false;
    }

    fn write_diff(&mut self, diff: &Value, session: &AnalysisSession) -> io::Result<()> {
        writeln!(self.out, "== Structural diff ==")?;
        let pretty = serde_json::to_string_pretty(diff).unwrap_or_else(|_| diff.to_string());
        writeln!(self.out, "{}", pretty)?;
        if !diff_has_breaking_changes(diff) {
            writeln!(self.out, "No breaking changes detected")?;
        }
        if let Some(score) = session.risk_score() {
            writeln!(self.out, "Risk score: {} ({})", score, score.level())?;
        }
        writeln!(self.out, "== AI security analysis ==")
    }

    fn write_result(&mut self, session: &AnalysisSession) -> io::Result<()> {
        if let Some(analysis) = session.analysis() {
            let formatted = format_analysis(analysis);
            if !formatted.is_empty() {
                writeln!(self.out, "== Result ==")?;
                write!(self.out, "{}", formatted)?;
                if !formatted.ends_with('\n') {
                    writeln!(self.out)?;
                }
            }
        }
        if let Some(score) = session.risk_score() {
            writeln!(self.out, "Final risk score: {} ({})", score, score.level())?;
        }
        Ok(())
    }
}
