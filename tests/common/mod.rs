//! Common test utilities for integration tests.
//!
//! This module provides wire fixtures for the analysis event stream and
//! helpers to slice them into arbitrary chunks.
//!
//! # Example
//!
//! ```ignore
//! use common::{scenario_complete, split_at};
//!
//! let chunks = split_at(&scenario_complete(), 17);
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use apidrift::analyzer::{AnalysisRequest, SpecDocument};
use bytes::Bytes;

pub const OLD_SPEC: &str = "openapi: 3.0.0\ninfo:\n  title: Pets\npaths:\n  /pets:\n    get: {}\n    delete: {}\n";
pub const NEW_SPEC: &str = "openapi: 3.0.0\ninfo:\n  title: Pets\npaths:\n  /pets:\n    get: {}\n";

/// One wire frame carrying `json`.
pub fn frame(json: &str) -> String {
    format!("data: {}\n", json)
}

/// Diff (score 2), tokens "o", "k", " ", then the final analysis "fine".
pub fn scenario_complete() -> Bytes {
    let frames = [
        frame(r#"{"type":"diff","diff":{"removed_endpoints":[],"method_changes":{"/pets":{"removed":["DELETE"]}}},"risk_score":2}"#),
        frame(r#"{"type":"ai_token","token":"o"}"#),
        frame(r#"{"type":"ai_token","token":"k"}"#),
        frame(r#"{"type":"ai_token","token":" "}"#),
        frame(r#"{"type":"ai_done","ai_analysis":"fine","risk_score":2}"#),
    ];
    Bytes::from(frames.concat())
}

/// A single upstream error frame.
pub fn scenario_error() -> Bytes {
    Bytes::from(frame(r#"{"type":"error","message":"bad spec"}"#))
}

/// Tokens containing multi-byte characters, so chunk splits can land inside
/// a character.
pub fn scenario_multibyte() -> Bytes {
    let frames = [
        frame(r#"{"type":"diff","diff":{},"risk_score":5}"#),
        frame(r#"{"type":"ai_token","token":"Änderung "}"#),
        frame(r#"{"type":"ai_token","token":"ist riskant 🚨"}"#),
        frame(r#"{"type":"ai_done","ai_analysis":{"summary":"ok"}}"#),
    ];
    Bytes::from(frames.concat())
}

/// Split `body` into two chunks at `offset`.
pub fn split_at(body: &Bytes, offset: usize) -> Vec<Bytes> {
    vec![body.slice(..offset), body.slice(offset..)]
}

/// Split `body` into chunks of at most `size` bytes.
pub fn chunked(body: &Bytes, size: usize) -> Vec<Bytes> {
    (0..body.len())
        .step_by(size)
        .map(|start| body.slice(start..(start + size).min(body.len())))
        .collect()
}

pub fn test_request() -> AnalysisRequest {
    AnalysisRequest::new(
        SpecDocument::new("petstore-v1.yaml", OLD_SPEC),
        SpecDocument::new("petstore-v2.yaml", NEW_SPEC),
    )
}
