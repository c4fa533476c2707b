//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that replays scripted response
//! bodies chunk by chunk, or fails, and records every request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::traits::{ByteStream, FilePart, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Multipart file parts
    pub parts: Vec<FilePart>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Successful response whose body yields these chunks, then ends
    Stream(Vec<Bytes>),
    /// Successful response whose body yields these chunks, then fails
    StreamThenError(Vec<Bytes>, HttpError),
    /// Successful response whose body yields these chunks, then never ends
    StreamThenHang(Vec<Bytes>),
    /// The request itself fails (connection error, non-success status)
    Error(HttpError),
}

/// Mock HTTP client for testing.
///
/// Responses are served from a FIFO queue; once the queue is empty the
/// default response (if any) is used for every further request.
///
/// # Example
///
/// ```ignore
/// use apidrift::adapters::mock::{MockHttpClient, MockResponse};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.push_response(MockResponse::Stream(vec![
///     Bytes::from("data: {\"type\":\"error\",\"message\":\"bad spec\"}\n"),
/// ]));
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Responses served in order
    queue: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Response used once the queue is drained
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Response bodies handed out and not yet dropped
    open_streams: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            open_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a client that answers every request with `response`.
    pub fn with_default(response: MockResponse) -> Self {
        let client = Self::new();
        client.set_default_response(response);
        client
    }

    /// Queue a response for the next request.
    pub fn push_response(&self, response: MockResponse) {
        self.queue.lock().unwrap().push_back(response);
    }

    /// Set a default response for requests once the queue is empty.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of response bodies that are still alive.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    fn record_request(&self, url: &str, parts: Vec<FilePart>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            parts,
        });
    }

    fn next_response(&self) -> Option<MockResponse> {
        if let Some(response) = self.queue.lock().unwrap().pop_front() {
            return Some(response);
        }
        self.default_response.lock().unwrap().clone()
    }

    fn tracked(&self, inner: ByteStream) -> ByteStream {
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedStream {
            inner,
            open_streams: self.open_streams.clone(),
        })
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Body wrapper that decrements the open-stream count when dropped.
struct TrackedStream {
    inner: ByteStream,
    open_streams: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = Result<Bytes, HttpError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.open_streams.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_multipart_stream(
        &self,
        url: &str,
        parts: Vec<FilePart>,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, parts);

        let chunks_of = |chunks: Vec<Bytes>| {
            futures::stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
        };

        match self.next_response() {
            Some(MockResponse::Stream(chunks)) => Ok(self.tracked(Box::pin(chunks_of(chunks)))),
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let failing = futures::stream::once(async move { Err(err) });
                Ok(self.tracked(Box::pin(futures::StreamExt::chain(
                    chunks_of(chunks),
                    failing,
                ))))
            }
            Some(MockResponse::StreamThenHang(chunks)) => Ok(self.tracked(Box::pin(
                futures::StreamExt::chain(chunks_of(chunks), futures::stream::pending()),
            ))),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
