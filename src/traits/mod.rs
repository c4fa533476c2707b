//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming multipart upload to the analysis service

pub mod http;

pub use http::{ByteStream, FilePart, HttpClient, HttpError};
