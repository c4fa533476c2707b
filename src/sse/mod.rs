//! Analysis stream framing and parsing
//!
//! The analysis service streams its result as newline-delimited text:
//! - `data: <json>` - one frame carrying one event, discriminated by its
//!   `type` field (`diff`, `ai_token`, `ai_done`, `error`)
//! - anything else - noise (keep-alive comments, blank lines), ignored
//!
//! # Module structure
//! - `decoder` - Byte chunks to complete lines (FrameDecoder)
//! - `events` - Event type definitions (AnalysisEvent, FrameSkip)
//! - `payloads` - Internal payload deserialization structs
//! - `parser` - Line to event parsing (parse_frame_line, FrameParser)

mod decoder;
mod events;
mod parser;
mod payloads;

// Re-export public types
pub use decoder::FrameDecoder;
pub use events::{AnalysisEvent, AnalysisResult, FrameSkip, StructuralDiff, FRAME_PREFIX};
pub use parser::{parse_frame_line, try_parse_frame_line, FrameParser};
