//! Streaming analysis runs.
//!
//! [`StreamConsumer`] owns one request lifecycle against the analysis
//! service: it uploads both spec documents, feeds the streamed response
//! through [`FrameDecoder`] and [`FrameParser`] into an [`AnalysisSession`],
//! and yields every new session snapshot. [`AnalysisController`] sits on top
//! and keeps one observable session across successive runs.

pub mod controller;

pub use controller::AnalysisController;

use bytes::Bytes;
use futures::stream::{self, Stream};
use futures_util::StreamExt;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::AnalyzerConfig;
use crate::sse::{AnalysisEvent, FrameDecoder, FrameParser};
use crate::state::AnalysisSession;
use crate::traits::{ByteStream, FilePart, HttpClient};

/// Form field carrying the previous spec version
pub const OLD_SPEC_FIELD: &str = "old";

/// Form field carrying the proposed spec version
pub const NEW_SPEC_FIELD: &str = "new";

/// One API specification document as uploaded to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    pub file_name: String,
    pub content: Bytes,
}

impl SpecDocument {
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// The two spec versions to compare.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub old: SpecDocument,
    pub new: SpecDocument,
}

impl AnalysisRequest {
    pub fn new(old: SpecDocument, new: SpecDocument) -> Self {
        Self { old, new }
    }

    /// Multipart body parts, `old` first.
    pub fn into_parts(self) -> Vec<FilePart> {
        vec![
            FilePart::new(OLD_SPEC_FIELD, self.old.file_name, self.old.content),
            FilePart::new(NEW_SPEC_FIELD, self.new.file_name, self.new.content),
        ]
    }
}

/// Drives a single analysis request from upload to terminal phase.
///
/// A consumer is single-use: [`run`](Self::run) takes `self`. Snapshots are
/// yielded as stream items and mirrored into a watch channel, so a view can
/// either drive the stream or [`subscribe`](Self::subscribe) to it.
///
/// # Example
///
/// ```ignore
/// let consumer = StreamConsumer::new(client, &AnalyzerConfig::from_env());
/// let mut snapshots = Box::pin(consumer.run(request));
/// while let Some(session) = snapshots.next().await {
///     println!("{}", session.phase().label());
/// }
/// ```
pub struct StreamConsumer {
    client: Arc<dyn HttpClient>,
    url: String,
    run_id: Uuid,
    session_tx: watch::Sender<AnalysisSession>,
}

impl StreamConsumer {
    pub fn new(client: Arc<dyn HttpClient>, config: &AnalyzerConfig) -> Self {
        let (session_tx, _) = watch::channel(AnalysisSession::new());
        Self {
            client,
            url: config.stream_url(),
            run_id: Uuid::new_v4(),
            session_tx,
        }
    }

    /// Watch the latest published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisSession> {
        self.session_tx.subscribe()
    }

    /// Identifier recorded on this run's tracing span.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Start the run.
    ///
    /// Nothing happens until the returned stream is polled. The first item
    /// is always the reset `Idle` session. The stream ends after a terminal
    /// phase or when the response body is exhausted; a truncated body leaves
    /// the last phase in place. Dropping the stream releases the response.
    pub fn run(
        self,
        request: AnalysisRequest,
    ) -> impl Stream<Item = AnalysisSession> + Send + 'static {
        let span = tracing::info_span!("analysis_run", run_id = %self.run_id);
        let state = RunState {
            client: self.client,
            url: self.url,
            session_tx: self.session_tx,
            session: AnalysisSession::new(),
            stage: Stage::Reset(request),
            decoder: FrameDecoder::new(),
            parser: FrameParser::new(),
            pending: VecDeque::new(),
            span,
        };

        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(snapshot) = state.pending.pop_front() {
                    return Some((snapshot, state));
                }
                if matches!(state.stage, Stage::Finished) {
                    return None;
                }
                let span = state.span.clone();
                state.advance().instrument(span).await;
            }
        })
    }
}

enum Stage {
    Reset(AnalysisRequest),
    Connect(AnalysisRequest),
    Body(ByteStream),
    Finished,
}

struct RunState {
    client: Arc<dyn HttpClient>,
    url: String,
    session_tx: watch::Sender<AnalysisSession>,
    session: AnalysisSession,
    stage: Stage,
    decoder: FrameDecoder,
    parser: FrameParser,
    pending: VecDeque<AnalysisSession>,
    span: Span,
}

impl RunState {
    /// Run one step of the lifecycle, queueing any snapshots it produces.
    async fn advance(&mut self) {
        match std::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::Reset(request) => {
                self.session = AnalysisSession::new();
                self.publish();
                self.stage = Stage::Connect(request);
            }
            Stage::Connect(request) => {
                info!(
                    "Requesting analysis of {} -> {} from {}",
                    request.old.file_name, request.new.file_name, self.url
                );
                match self
                    .client
                    .post_multipart_stream(&self.url, request.into_parts())
                    .await
                {
                    Ok(body) => {
                        if self.session.mark_awaiting() {
                            self.publish();
                        }
                        self.stage = Stage::Body(body);
                    }
                    Err(e) => {
                        warn!("Analysis request failed: {}", e);
                        self.apply(AnalysisEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }
            Stage::Body(mut body) => match body.next().await {
                Some(Ok(chunk)) => {
                    for line in self.decoder.feed(&chunk) {
                        if let Some(event) = self.parser.feed_line(&line) {
                            self.apply(event);
                        }
                        if self.session.is_terminal() {
                            break;
                        }
                    }
                    if self.session.is_terminal() {
                        debug!(
                            "Session {}, closing response body",
                            self.session.phase().label()
                        );
                        self.log_summary();
                    } else {
                        self.stage = Stage::Body(body);
                    }
                }
                Some(Err(e)) => {
                    warn!("Analysis stream failed: {}", e);
                    self.apply(AnalysisEvent::Error {
                        message: e.to_string(),
                    });
                    self.log_summary();
                }
                None => {
                    let dropped = self.decoder.finish();
                    if dropped > 0 {
                        debug!("Discarding {} bytes of unterminated frame data", dropped);
                    }
                    if !self.session.is_terminal() {
                        info!(
                            "Analysis stream ended while {}",
                            self.session.phase().label()
                        );
                    }
                    self.log_summary();
                }
            },
            Stage::Finished => {}
        }
    }

    fn apply(&mut self, event: AnalysisEvent) {
        if self.session.apply(event) {
            self.publish();
        }
    }

    fn publish(&mut self) {
        self.session_tx.send_replace(self.session.clone());
        self.pending.push_back(self.session.clone());
    }

    fn log_summary(&self) {
        debug!(
            "Run finished: {} frames accepted, {} skipped, phase {}",
            self.parser.accepted(),
            self.parser.skipped(),
            self.session.phase().label()
        );
    }
}
