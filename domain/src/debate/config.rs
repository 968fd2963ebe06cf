//! Debate configuration (immutable for the lifetime of one debate)

use serde::Serialize;

use super::kind::DebateKind;
use super::transcript::Seat;
use crate::core::error::DomainError;
use crate::core::model::ModelSpec;
use crate::persona::Persona;

/// A persona bound to the model that voices it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub persona: Persona,
    pub model: ModelSpec,
}

impl Participant {
    pub fn new(persona: Persona, model: ModelSpec) -> Self {
        Self { persona, model }
    }

    pub fn name(&self) -> &str {
        &self.persona.name
    }

    pub fn label(&self) -> String {
        self.persona.label()
    }
}

/// Everything needed to run one debate.
///
/// Built through [`DebateConfig::builder`], which validates the topic and
/// turn budget. There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebateConfig {
    topic: String,
    kind: DebateKind,
    participants: [Participant; 2],
    max_turns: usize,
    judge: Option<ModelSpec>,
    tools_enabled: bool,
}

impl DebateConfig {
    pub fn builder(kind: DebateKind, topic: impl Into<String>) -> DebateConfigBuilder {
        DebateConfigBuilder {
            kind,
            topic: topic.into(),
            participants: None,
            max_turns: kind.default_max_turns(),
            judge: None,
            tools_enabled: false,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn kind(&self) -> DebateKind {
        self.kind
    }

    pub fn participant(&self, seat: Seat) -> &Participant {
        &self.participants[seat.position()]
    }

    pub fn participants(&self) -> &[Participant; 2] {
        &self.participants
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn judge_enabled(&self) -> bool {
        self.judge.is_some()
    }

    pub fn judge_model(&self) -> Option<&ModelSpec> {
        self.judge.as_ref()
    }

    pub fn tools_enabled(&self) -> bool {
        self.tools_enabled
    }

    /// Every model the debate will talk to (participants, then judge)
    pub fn required_models(&self) -> Vec<&ModelSpec> {
        let mut models: Vec<&ModelSpec> = self.participants.iter().map(|p| &p.model).collect();
        if let Some(judge) = &self.judge {
            models.push(judge);
        }
        models
    }
}

/// Builder for [`DebateConfig`]
#[derive(Debug, Clone)]
pub struct DebateConfigBuilder {
    kind: DebateKind,
    topic: String,
    participants: Option<[Participant; 2]>,
    max_turns: usize,
    judge: Option<ModelSpec>,
    tools_enabled: bool,
}

impl DebateConfigBuilder {
    pub fn participants(mut self, first: Participant, second: Participant) -> Self {
        self.participants = Some([first, second]);
        self
    }

    pub fn max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Rap battles are configured in rounds; each round is one verse per rapper.
    pub fn rounds(self, rounds: usize) -> Self {
        self.max_turns(rounds.saturating_mul(2))
    }

    pub fn judge(mut self, model: Option<ModelSpec>) -> Self {
        self.judge = model;
        self
    }

    pub fn tools(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled;
        self
    }

    pub fn build(self) -> Result<DebateConfig, DomainError> {
        let topic = self.topic.trim().to_string();
        if topic.is_empty() {
            return Err(DomainError::EmptyTopic);
        }
        if self.max_turns == 0 {
            return Err(DomainError::InvalidMaxTurns(self.max_turns));
        }
        let participants = self
            .participants
            .ok_or_else(|| DomainError::UnknownPersona("no participants selected".to_string()))?;
        Ok(DebateConfig {
            topic,
            kind: self.kind,
            participants,
            max_turns: self.max_turns,
            judge: self.judge,
            tools_enabled: self.tools_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Provider;

    fn model(key: &str) -> ModelSpec {
        ModelSpec::new(key, key, key, Provider::OpenAi)
    }

    fn participants() -> (Participant, Participant) {
        (
            Participant::new(Persona::progressive(), model("a")),
            Participant::new(Persona::conservative(), model("b")),
        )
    }

    #[test]
    fn test_build_with_defaults() {
        let (a, b) = participants();
        let config = DebateConfig::builder(DebateKind::PoliticalDebate, "  Universal healthcare ")
            .participants(a, b)
            .build()
            .unwrap();
        assert_eq!(config.topic(), "Universal healthcare");
        assert_eq!(config.max_turns(), 8);
        assert!(!config.judge_enabled());
        assert!(!config.tools_enabled());
        assert_eq!(config.participant(Seat::Second).name(), "Conservative Perspective");
    }

    #[test]
    fn test_empty_topic_rejected() {
        let (a, b) = participants();
        let err = DebateConfig::builder(DebateKind::PoliticalDebate, "   ")
            .participants(a, b)
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::EmptyTopic);
    }

    #[test]
    fn test_zero_turns_rejected() {
        let (a, b) = participants();
        let err = DebateConfig::builder(DebateKind::PoliticalDebate, "Tax")
            .participants(a, b)
            .max_turns(0)
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidMaxTurns(0));
    }

    #[test]
    fn test_rounds_double_turns() {
        let a = Participant::new(Persona::rapper("nas").unwrap(), model("a"));
        let b = Participant::new(Persona::rapper("jay-z").unwrap(), model("b"));
        let config = DebateConfig::builder(DebateKind::RapBattle, "Queensbridge vs Marcy")
            .participants(a, b)
            .rounds(3)
            .judge(Some(model("judge")))
            .build()
            .unwrap();
        assert_eq!(config.max_turns(), 6);
        assert!(config.judge_enabled());
        assert_eq!(config.required_models().len(), 3);
    }
}
