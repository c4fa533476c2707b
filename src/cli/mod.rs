//! CLI module for apidrift.
//!
//! This module provides the command-line front end:
//! - Argument parsing
//! - Loading spec documents from disk
//! - Driving one analysis run and rendering it to the terminal
//!
//! # Usage
//!
//! ```ignore
//! use apidrift::cli::{parse_args, run_analyze, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Analyze(args) => {
//!         let session = run_analyze(args, AnalyzerConfig::from_env()).await?;
//!     }
//!     _ => {}
//! }
//! ```

pub mod args;

pub use args::{parse_args, AnalyzeArgs, CliCommand};

use futures_util::StreamExt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::adapters::ReqwestHttpClient;
use crate::analyzer::{AnalysisRequest, SpecDocument, StreamConsumer};
use crate::config::AnalyzerConfig;
use crate::render::TerminalRenderer;
use crate::state::AnalysisSession;
use crate::traits::{HttpClient, HttpError};

/// The current version of apidrift, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text for `--help` and invalid invocations.
pub const USAGE: &str = "\
Usage: apidrift [--url <base-url>] <old-spec> <new-spec>

Compare two versions of an API specification and stream a risk analysis.

Options:
  --url <base-url>  Analysis service base URL (env: APIDRIFT_URL)
  -V, --version     Print version
  -h, --help        Print this help

Environment:
  APIDRIFT_URL                   Base URL (default http://localhost:5000)
  APIDRIFT_ENDPOINT              Stream endpoint (default /analyze/stream)
  APIDRIFT_CONNECT_TIMEOUT_SECS  Connect timeout in seconds (default 10)
  RUST_LOG                       Log filter (default apidrift=info)";

/// Errors raised before a run starts.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", .path.display())]
    ReadSpec {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Spec file {} is empty", .path.display())]
    EmptySpec { path: PathBuf },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] HttpError),
}

/// Read a spec document from disk.
pub fn load_spec(path: &Path) -> Result<SpecDocument, CliError> {
    let content = std::fs::read(path).map_err(|source| CliError::ReadSpec {
        path: path.to_path_buf(),
        source,
    })?;
    if content.is_empty() {
        return Err(CliError::EmptySpec {
            path: path.to_path_buf(),
        });
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SpecDocument::new(file_name, content))
}

/// Load both specs and run one analysis against the configured service,
/// rendering to stdout.
pub async fn run_analyze(
    args: AnalyzeArgs,
    config: AnalyzerConfig,
) -> color_eyre::Result<AnalysisSession> {
    let config = match args.base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    };
    let request = AnalysisRequest::new(load_spec(&args.old_path)?, load_spec(&args.new_path)?);
    let client = ReqwestHttpClient::from_config(&config).map_err(CliError::from)?;

    analyze_with(Arc::new(client), &config, request, std::io::stdout()).await
}

/// Drive one run to its end, rendering every snapshot into `out`.
///
/// Returns the last session; a transport or upstream failure is reported
/// through its `Failed` phase, not as an `Err`.
pub async fn analyze_with<W: Write>(
    client: Arc<dyn HttpClient>,
    config: &AnalyzerConfig,
    request: AnalysisRequest,
    out: W,
) -> color_eyre::Result<AnalysisSession> {
    let consumer = StreamConsumer::new(client, config);
    let mut renderer = TerminalRenderer::new(out);
    let mut snapshots = Box::pin(consumer.run(request));
    let mut last = AnalysisSession::new();

    while let Some(session) = snapshots.next().await {
        renderer.render(&session)?;
        last = session;
    }
    renderer.finish(&last)?;

    Ok(last)
}
