//! Observable session across successive analysis runs.

use futures_util::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{AnalysisRequest, StreamConsumer};
use crate::config::AnalyzerConfig;
use crate::state::AnalysisSession;
use crate::traits::HttpClient;

/// Owns the session a view observes and the task feeding it.
///
/// Starting a run supersedes the previous one: the old task is aborted and
/// a generation counter is bumped, so a superseded run can never write into
/// the new session even if it was mid-publish when the new run started.
pub struct AnalysisController {
    client: Arc<dyn HttpClient>,
    config: AnalyzerConfig,
    generation: Arc<AtomicU64>,
    session_tx: Arc<watch::Sender<AnalysisSession>>,
    active: Option<JoinHandle<()>>,
}

impl AnalysisController {
    pub fn new(client: Arc<dyn HttpClient>, config: AnalyzerConfig) -> Self {
        let (session_tx, _) = watch::channel(AnalysisSession::new());
        Self {
            client,
            config,
            generation: Arc::new(AtomicU64::new(0)),
            session_tx: Arc::new(session_tx),
            active: None,
        }
    }

    /// Watch the current session.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisSession> {
        self.session_tx.subscribe()
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> AnalysisSession {
        self.session_tx.borrow().clone()
    }

    /// Generation of the most recently started (or cancelled) run.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Start a new run, superseding any run in flight.
    ///
    /// The session is reset to `Idle` before this returns. Must be called
    /// from within a tokio runtime.
    pub fn start(&mut self, request: AnalysisRequest) -> u64 {
        if let Some(handle) = self.active.take() {
            handle.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.session_tx.send_replace(AnalysisSession::new());

        let consumer = StreamConsumer::new(self.client.clone(), &self.config);
        info!(run_id = %consumer.run_id(), generation, "Starting analysis run");

        let current = self.generation.clone();
        let session_tx = self.session_tx.clone();
        self.active = Some(tokio::spawn(async move {
            let mut snapshots = Box::pin(consumer.run(request));
            while let Some(snapshot) = snapshots.next().await {
                let mut superseded = false;
                session_tx.send_if_modified(|session| {
                    if current.load(Ordering::SeqCst) != generation {
                        superseded = true;
                        return false;
                    }
                    *session = snapshot;
                    true
                });
                if superseded {
                    debug!(generation, "Run superseded, dropping stream");
                    break;
                }
            }
        }));

        generation
    }

    /// Stop the active run. The last published snapshot stays as it is.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.active.take() {
            handle.abort();
            debug!("Analysis run cancelled");
        }
    }

    /// Whether a run task is still alive.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the active run (if any) to finish.
    pub async fn join(&mut self) {
        if let Some(handle) = self.active.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("Analysis run task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for AnalysisController {
    fn drop(&mut self) {
        if let Some(handle) = self.active.take() {
            handle.abort();
        }
    }
}
