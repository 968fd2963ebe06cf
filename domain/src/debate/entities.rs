//! The debate aggregate

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::DebateConfig;
use super::state::DebateState;
use super::transcript::{Transcript, Turn};
use crate::core::error::DomainError;
use crate::judge::Verdict;

/// One debate: its configuration, lifecycle state, transcript and result.
///
/// All mutation goes through methods that enforce the lifecycle; turns can
/// only be recorded while the debate is in progress, and an aborted debate
/// keeps every turn recorded before the abort.
#[derive(Debug, Clone, Serialize)]
pub struct Debate {
    config: DebateConfig,
    state: DebateState,
    transcript: Transcript,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    abort_reason: Option<String>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl Debate {
    pub fn new(config: DebateConfig) -> Self {
        let names = [
            config.participants()[0].name().to_string(),
            config.participants()[1].name().to_string(),
        ];
        let transcript = Transcript::new(names, config.max_turns());
        Self {
            config,
            state: DebateState::NotStarted,
            transcript,
            verdict: None,
            abort_reason: None,
            started_at: None,
            ended_at: None,
        }
    }

    pub fn start(&mut self) -> Result<(), DomainError> {
        self.state = self.state.transition(DebateState::InProgress)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    pub fn record_turn(&mut self, turn: Turn) -> Result<&Turn, DomainError> {
        if self.state != DebateState::InProgress {
            return Err(DomainError::NotInProgress(self.state.as_str()));
        }
        self.transcript.append(turn)
    }

    pub fn complete(&mut self, verdict: Option<Verdict>) -> Result<(), DomainError> {
        self.state = self.state.transition(DebateState::Completed)?;
        self.verdict = verdict;
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    pub fn abort(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        self.state = self.state.transition(DebateState::Aborted)?;
        self.abort_reason = Some(reason.into());
        self.ended_at = Some(Utc::now());
        Ok(())
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    pub fn state(&self) -> DebateState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Wall-clock duration, once the debate has ended
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.ended_at? - self.started_at?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ModelSpec, Provider};
    use crate::debate::{DebateKind, Participant};
    use crate::persona::Persona;

    fn debate(max_turns: usize) -> Debate {
        let model = ModelSpec::new("m", "m", "m", Provider::Ollama);
        let config = DebateConfig::builder(DebateKind::PoliticalDiscussion, "Zoning reform")
            .participants(
                Participant::new(Persona::progressive(), model.clone()),
                Participant::new(Persona::conservative(), model),
            )
            .max_turns(max_turns)
            .build()
            .unwrap();
        Debate::new(config)
    }

    #[test]
    fn test_turns_require_in_progress() {
        let mut d = debate(2);
        let turn = d.transcript().draft_next("too early");
        assert_eq!(
            d.record_turn(turn).unwrap_err(),
            DomainError::NotInProgress("not_started")
        );
    }

    #[test]
    fn test_full_lifecycle() {
        let mut d = debate(2);
        d.start().unwrap();
        for text in ["opening", "reply"] {
            let turn = d.transcript().draft_next(text);
            d.record_turn(turn).unwrap();
        }
        d.complete(None).unwrap();
        assert_eq!(d.state(), DebateState::Completed);
        assert_eq!(d.transcript().len(), 2);
        assert!(d.duration().is_some());
    }

    #[test]
    fn test_abort_preserves_transcript() {
        let mut d = debate(4);
        d.start().unwrap();
        let turn = d.transcript().draft_next("opening");
        d.record_turn(turn).unwrap();
        d.abort("provider down").unwrap();
        assert_eq!(d.state(), DebateState::Aborted);
        assert_eq!(d.transcript().len(), 1);
        assert_eq!(d.abort_reason(), Some("provider down"));

        let turn = d.transcript().draft_next("late");
        assert!(d.record_turn(turn).is_err());
    }

    #[test]
    fn test_cannot_complete_twice() {
        let mut d = debate(1);
        d.start().unwrap();
        d.complete(None).unwrap();
        assert!(d.complete(None).is_err());
        assert!(d.abort("late").is_err());
    }
}
