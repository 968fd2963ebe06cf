//! JSONL event log for debates.
//!
//! Each [`ConversationEvent`] becomes one JSON object carrying `type` and
//! `timestamp` next to the event payload.

use arena_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use chrono::{Local, SecondsFormat, Utc};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Appends debate events to a `.jsonl` file.
///
/// Thread-safe via `Mutex<BufWriter<File>>`; every line is flushed so a
/// crash or Ctrl+C leaves a readable log behind.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a logger writing to `path`, creating parent directories.
    ///
    /// Returns `None` (after a warning) when the file cannot be created;
    /// debates then run without an event log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create debate log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create debate log {}: {}", path.display(), e);
                return None;
            }
        };
        debug!("Writing debate events to {}", path.display());

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Create `debate_{YYYYMMDD_HHMMSS}.jsonl` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Option<Self> {
        let name = format!("debate_{}.jsonl", Local::now().format("%Y%m%d_%H%M%S"));
        Self::new(dir.as_ref().join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent) -> Value {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    match event.payload {
        Value::Object(mut map) => {
            map.insert("type".to_string(), Value::from(event.event_type));
            map.insert("timestamp".to_string(), Value::from(timestamp));
            Value::Object(map)
        }
        other => serde_json::json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": other,
        }),
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&record(event)) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_events_written_as_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("debate.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "debate_started",
            serde_json::json!({ "topic": "Nuclear power", "kind": "political" }),
        ));
        logger.log(ConversationEvent::new(
            "tool_call",
            serde_json::json!({ "turn": 2, "tool": "web_search", "success": true }),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "debate_started");
        assert_eq!(lines[0]["topic"], "Nuclear power");
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["tool"], "web_search");
    }

    #[test]
    fn test_scalar_payload_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlConversationLogger::in_dir(dir.path()).unwrap();
        let path = logger.path().to_path_buf();
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("debate_"));

        logger.log(ConversationEvent::new("debate_aborted", serde_json::json!("Ctrl+C")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "debate_aborted");
        assert_eq!(lines[0]["data"], "Ctrl+C");
    }

    #[test]
    fn test_unwritable_location_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlConversationLogger::new(blocker.join("debate.jsonl")).is_none());
    }
}
