//! Debate export port
//!
//! Persists finished debates and session overviews. The markdown
//! implementation lives in the infrastructure layer.

use arena_domain::{Debate, SessionLog};
use std::path::PathBuf;
use thiserror::Error;

/// Export failure, carrying the adapter's description
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Export failed: {0}")]
pub struct ExportFailure(pub String);

pub trait DebateExporter: Send + Sync {
    /// Write one debate, returning where it was written
    fn export_debate(&self, debate: &Debate) -> Result<PathBuf, ExportFailure>;

    /// Write an overview of every debate in the session
    fn export_session_summary(&self, log: &SessionLog) -> Result<PathBuf, ExportFailure>;
}
