//! Markdown export of debates and session summaries
//!
//! Documents are written to the configured output directory, created on
//! demand. [`parse_transcript`] reads an exported document back into the
//! ordered `(speaker, text)` pairs it was rendered from.

mod markdown;
mod parser;
mod session_summary;
#[cfg(test)]
mod testing;

pub use markdown::{export_file_name, render_debate, safe_topic};
pub use parser::{parse_transcript, parse_transcript_file};
pub use session_summary::{render_session_summary, session_summary_file_name};

use arena_application::{DebateExporter, ExportFailure};
use arena_domain::{Debate, SessionLog};
use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No debate transcript section found")]
    MissingTranscript,

    #[error("No debates to summarize")]
    EmptySession,
}

/// Writes debate documents into one output directory
#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    output_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export one debate, returning the written path
    pub fn export(&self, debate: &Debate) -> Result<PathBuf, ExportError> {
        let now = Local::now();
        let path = self.output_dir.join(export_file_name(debate, now));
        self.write(&path, &render_debate(debate, now))?;
        info!("Exported debate to {}", path.display());
        Ok(path)
    }

    /// Export the session overview; fails on an empty session
    pub fn export_session_summary(&self, log: &SessionLog) -> Result<PathBuf, ExportError> {
        if log.is_empty() {
            return Err(ExportError::EmptySession);
        }
        let now = Local::now();
        let path = self.output_dir.join(session_summary_file_name(now));
        self.write(&path, &render_session_summary(log, &self.output_dir, now))?;
        info!("Exported session summary to {}", path.display());
        Ok(path)
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DebateExporter for MarkdownExporter {
    fn export_debate(&self, debate: &Debate) -> Result<PathBuf, ExportFailure> {
        self.export(debate).map_err(|e| ExportFailure(e.to_string()))
    }

    fn export_session_summary(&self, log: &SessionLog) -> Result<PathBuf, ExportFailure> {
        MarkdownExporter::export_session_summary(self, log).map_err(|e| ExportFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::DebateRecord;

    #[test]
    fn test_export_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownExporter::new(dir.path().join("nested").join("debates"));
        let debate = testing::finished_debate(&["Opening.", "Rebuttal.", "Closing."]);

        let path = exporter.export(&debate).unwrap();
        assert!(path.starts_with(exporter.output_dir()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_Universal_basic_income_political_debate.md"));
        assert_eq!(
            parse_transcript_file(&path).unwrap(),
            debate.transcript().dialogue()
        );
    }

    #[test]
    fn test_session_summary_export() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownExporter::new(dir.path());
        assert!(matches!(
            exporter.export_session_summary(&SessionLog::new()),
            Err(ExportError::EmptySession)
        ));

        let mut log = SessionLog::new();
        log.push(DebateRecord::from_debate(&testing::finished_debate(&["a"])));
        let path = exporter.export_session_summary(&log).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("# Debate Session Summary"));
    }

    #[test]
    fn test_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let exporter = MarkdownExporter::new(&blocker);
        let err = exporter
            .export(&testing::finished_debate(&["a"]))
            .unwrap_err();
        assert!(matches!(err, ExportError::CreateDir { .. }));

        let port: &dyn DebateExporter = &exporter;
        let failure = port.export_session_summary(&SessionLog::new()).unwrap_err();
        assert_eq!(failure.to_string(), "Export failed: No debates to summarize");
    }
}
