//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `apidrift::adapters::mock` and provides helpers to run them.

pub use apidrift::adapters::mock::{MockHttpClient, MockResponse};
pub use apidrift::traits::{HttpClient, HttpError};

use apidrift::analyzer::{AnalysisRequest, StreamConsumer};
use apidrift::config::AnalyzerConfig;
use apidrift::state::AnalysisSession;
use futures::StreamExt;
use std::sync::Arc;

/// Share a mock as the trait object the analyzer expects.
pub fn shared(client: &MockHttpClient) -> Arc<dyn HttpClient> {
    Arc::new(client.clone())
}

/// Run one analysis against `client` and collect every snapshot.
pub async fn collect_run(client: &MockHttpClient, request: AnalysisRequest) -> Vec<AnalysisSession> {
    StreamConsumer::new(shared(client), &AnalyzerConfig::default())
        .run(request)
        .collect()
        .await
}
