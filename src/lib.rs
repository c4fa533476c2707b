//! apidrift - streaming API spec drift analysis client
//!
//! Uploads two versions of an API specification to an analysis service and
//! follows its event stream: a structural diff, a risk score, and a
//! token-by-token natural-language analysis folded into an observable
//! [`state::AnalysisSession`].
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod render;
pub mod risk;
pub mod sse;
pub mod state;
pub mod traits;
