//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client replaying scripted streaming bodies

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
