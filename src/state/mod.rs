//! Observable analysis state.

pub mod session;

pub use session::{AnalysisSession, SessionPhase};
