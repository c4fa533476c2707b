//! HTTP client trait abstraction.
//!
//! Provides a trait-based abstraction for the one HTTP exchange the analyzer
//! performs, enabling dependency injection and mocking in tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Streaming response body: byte chunks in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// One file part of a multipart request body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// File contents
    pub content: Bytes,
}

impl FilePart {
    /// Create a new file part.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, content: Bytes) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content,
        }
    }
}

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned an error status
    ServerError { status: u16, message: String },
    /// Response body failed mid-stream
    Io(String),
    /// Invalid URL or request
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for HTTP client operations.
///
/// Implementations include the production reqwest-based client and a mock
/// client for tests.
///
/// # Example
///
/// ```ignore
/// use apidrift::traits::{FilePart, HttpClient};
///
/// async fn upload<C: HttpClient>(client: &C, spec: Bytes) -> Result<(), HttpError> {
///     let parts = vec![FilePart::new("old", "old.yaml", spec)];
///     let mut body = client.post_multipart_stream("http://localhost:5000/analyze/stream", parts).await?;
///     while let Some(chunk) = body.next().await {
///         println!("{} bytes", chunk?.len());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a multipart POST request and return the streaming response body.
    ///
    /// A non-success status must be reported as [`HttpError::ServerError`]
    /// without yielding any body chunks.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `parts` - File parts of the `multipart/form-data` body
    ///
    /// # Returns
    /// A stream of body chunks or an error
    async fn post_multipart_stream(
        &self,
        url: &str,
        parts: Vec<FilePart>,
    ) -> Result<ByteStream, HttpError>;
}
