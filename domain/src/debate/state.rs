//! Debate lifecycle state machine

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

/// Lifecycle of a debate.
///
/// ```text
/// NotStarted ──start──▶ InProgress ──complete──▶ Completed
///                           │
///                           └──────abort───────▶ Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateState {
    NotStarted,
    InProgress,
    Completed,
    Aborted,
}

impl DebateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateState::NotStarted => "not_started",
            DebateState::InProgress => "in_progress",
            DebateState::Completed => "completed",
            DebateState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DebateState::Completed | DebateState::Aborted)
    }

    pub fn can_transition_to(&self, next: DebateState) -> bool {
        matches!(
            (self, next),
            (DebateState::NotStarted, DebateState::InProgress)
                | (DebateState::InProgress, DebateState::Completed)
                | (DebateState::InProgress, DebateState::Aborted)
        )
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn transition(self, next: DebateState) -> Result<DebateState, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

impl std::fmt::Display for DebateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DebateState::NotStarted => "Not started",
            DebateState::InProgress => "In progress",
            DebateState::Completed => "Completed",
            DebateState::Aborted => "Aborted",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for DebateState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "not_started" => Ok(DebateState::NotStarted),
            "in_progress" => Ok(DebateState::InProgress),
            "completed" => Ok(DebateState::Completed),
            "aborted" => Ok(DebateState::Aborted),
            other => Err(format!("unknown debate state: {}", other)),
        }
    }
}
