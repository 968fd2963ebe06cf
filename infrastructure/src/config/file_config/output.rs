//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Directory for exported transcripts and session summaries
    pub dir: PathBuf,
    /// Directory for the JSONL conversation log (disabled when unset)
    pub log_dir: Option<PathBuf>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("debates"),
            log_dir: None,
            color: true,
        }
    }
}
