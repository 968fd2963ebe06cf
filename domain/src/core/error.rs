//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Topic cannot be empty")]
    EmptyTopic,

    #[error("Max turns must be at least 1 (got {0})")]
    InvalidMaxTurns(usize),

    #[error("Invalid debate state transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Debate is not in progress (state: {0})")]
    NotInProgress(&'static str),

    #[error("Turn limit of {0} reached")]
    TurnLimitReached(usize),

    #[error("Out-of-order turn: expected index {expected}, got {actual}")]
    TurnOutOfOrder { expected: usize, actual: usize },

    #[error("Wrong speaker for turn {index}: expected {expected}")]
    WrongSpeaker { index: usize, expected: &'static str },

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Whether the error came from a transcript invariant being violated
    pub fn is_transcript_violation(&self) -> bool {
        matches!(
            self,
            DomainError::TurnLimitReached(_)
                | DomainError::TurnOutOfOrder { .. }
                | DomainError::WrongSpeaker { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::EmptyTopic.is_cancelled());
        assert!(!DomainError::InvalidMaxTurns(0).is_cancelled());
    }

    #[test]
    fn test_transition_display() {
        let error = DomainError::InvalidTransition {
            from: "completed",
            to: "in_progress",
        };
        assert_eq!(
            error.to_string(),
            "Invalid debate state transition: completed -> in_progress"
        );
    }

    #[test]
    fn test_transcript_violation_grouping() {
        assert!(DomainError::TurnLimitReached(4).is_transcript_violation());
        assert!(
            DomainError::WrongSpeaker {
                index: 1,
                expected: "second"
            }
            .is_transcript_violation()
        );
        assert!(!DomainError::EmptyTopic.is_transcript_violation());
    }
}
