//! Session history: every debate run during one process lifetime

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::Debate;
use super::kind::DebateKind;
use super::state::DebateState;

/// Summary of one finished debate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebateRecord {
    pub topic: String,
    pub kind: DebateKind,
    /// `(persona label, model display name)` per seat
    pub participants: [(String, String); 2],
    pub judge_enabled: bool,
    pub tools_enabled: bool,
    pub max_turns: usize,
    pub turns: usize,
    pub state: DebateState,
    pub winner: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub export_path: Option<PathBuf>,
}

impl DebateRecord {
    pub fn from_debate(debate: &Debate) -> Self {
        let config = debate.config();
        let participant = |i: usize| {
            let p = &config.participants()[i];
            (p.label(), p.model.display_name.clone())
        };
        Self {
            topic: config.topic().to_string(),
            kind: config.kind(),
            participants: [participant(0), participant(1)],
            judge_enabled: config.judge_enabled(),
            tools_enabled: config.tools_enabled(),
            max_turns: config.max_turns(),
            turns: debate.transcript().len(),
            state: debate.state(),
            winner: debate
                .verdict()
                .and_then(|v| v.outcome.winner())
                .map(|seat| config.participant(seat).label()),
            started_at: debate.started_at(),
            ended_at: debate.ended_at(),
            export_path: None,
        }
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.state == DebateState::Completed
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.ended_at? - self.started_at?)
    }
}

/// Aggregate statistics over a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_debates: usize,
    pub completed: usize,
    pub aborted: usize,
    /// Percentage in `0.0..=100.0`
    pub completion_rate: f64,
    pub total_turns: usize,
    pub average_turns: f64,
}

/// Append-only log of the debates run in this session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionLog {
    records: Vec<DebateRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: DebateRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[DebateRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> SessionSummary {
        let total_debates = self.records.len();
        let completed = self.records.iter().filter(|r| r.is_completed()).count();
        let aborted = self
            .records
            .iter()
            .filter(|r| r.state == DebateState::Aborted)
            .count();
        let total_turns = self.records.iter().map(|r| r.turns).sum();
        let (completion_rate, average_turns) = if total_debates == 0 {
            (0.0, 0.0)
        } else {
            (
                completed as f64 / total_debates as f64 * 100.0,
                total_turns as f64 / total_debates as f64,
            )
        };
        SessionSummary {
            total_debates,
            completed,
            aborted,
            completion_rate,
            total_turns,
            average_turns,
        }
    }
}
