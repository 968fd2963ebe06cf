//! Run Debate use case
//!
//! Drives one debate from start to a terminal state: strict alternation of
//! persona turns, optional per-turn judging, and the final verdict.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::judge_turn::JudgeAgent;
use crate::use_cases::persona_turn::{PersonaAgent, TurnContext, TurnError, TurnOutput};
use arena_domain::{
    Debate, DebateConfig, DomainError, ModelSpec, Seat, Turn, TurnJudgement, Verdict,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that prevent a debate from running at all.
///
/// Failures once the debate is underway do not surface here: they abort the
/// debate, which is returned in the `Aborted` state.
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Model {model} is unavailable: {source}")]
    ModelUnavailable {
        model: String,
        #[source]
        source: GatewayError,
    },

    #[error("Tools are enabled but no tool executor is configured")]
    ToolsUnavailable,

    #[error("Debate error: {0}")]
    Domain(#[from] DomainError),
}

/// Handles for stopping a running debate from outside the loop
#[derive(Debug, Clone, Default)]
pub struct DebateControl {
    abort: CancellationToken,
    finish: CancellationToken,
}

impl DebateControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupt the current turn and abort the debate
    pub fn abort(&self) {
        self.abort.cancel();
    }

    /// Complete the debate once the current turn is done
    pub fn finish(&self) {
        self.finish.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.abort.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.finish.is_cancelled()
    }

    pub fn abort_token(&self) -> &CancellationToken {
        &self.abort
    }
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub config: DebateConfig,
    pub control: DebateControl,
}

impl RunDebateInput {
    pub fn new(config: DebateConfig) -> Self {
        Self {
            config,
            control: DebateControl::new(),
        }
    }

    pub fn with_control(mut self, control: DebateControl) -> Self {
        self.control = control;
        self
    }
}

/// Use case for running a debate
pub struct RunDebateUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    tools: Option<Arc<dyn ToolExecutorPort>>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> RunDebateUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            tools: None,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolExecutorPort>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<Debate, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// Returns the debate in a terminal state: `Completed`, or `Aborted`
    /// with the turns recorded before the failure.
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<Debate, RunDebateError> {
        let RunDebateInput { config, control } = input;

        if config.tools_enabled() && self.tools.is_none() {
            return Err(RunDebateError::ToolsUnavailable);
        }

        // Every session is created up front so configuration problems
        // surface before the first turn.
        let mut agents = Vec::with_capacity(2);
        for seat in Seat::BOTH {
            let participant = config.participant(seat).clone();
            let session = self.open_session(&participant.model).await?;
            agents.push(PersonaAgent::new(seat, participant, session));
        }
        let judge = match config.judge_model() {
            Some(model) => Some(JudgeAgent::new(
                config.kind().rubric(),
                self.open_session(model).await?,
            )),
            None => None,
        };

        let mut debate = Debate::new(config);
        debate.start()?;
        info!(
            "Starting {} on \"{}\" ({} turns)",
            debate.config().kind(),
            debate.config().topic(),
            debate.config().max_turns()
        );
        progress.on_debate_start(debate.config());
        self.log_started(&debate);

        while !debate.transcript().is_full() {
            if control.is_finished() {
                info!("Debate ended early by request");
                break;
            }
            let index = debate.transcript().next_index();
            let agent = &agents[Seat::for_index(index).position()];
            let name = agent.participant().name().to_string();

            if control.is_aborted() {
                return self.abort(
                    debate,
                    format!("Interrupted before turn {} ({})", index + 1, name),
                    progress,
                );
            }

            progress.on_turn_start(index, agent.participant());
            let result = agent
                .take_turn(TurnContext {
                    config: debate.config(),
                    transcript: debate.transcript(),
                    tools: self.tools.as_deref(),
                    progress,
                    cancel: control.abort_token(),
                })
                .await;

            let output = match result {
                Ok(output) => output,
                Err(TurnError::Cancelled) => {
                    return self.abort(
                        debate,
                        format!("Interrupted during turn {} ({})", index + 1, name),
                        progress,
                    );
                }
                Err(e) => {
                    return self.abort(
                        debate,
                        format!("{} failed on turn {}: {}", name, index + 1, e),
                        progress,
                    );
                }
            };
            self.log_tools(index, &output);

            let mut turn = debate.transcript().draft_next(output.text);
            progress.on_turn_complete(&turn);

            if let Some(judge) = &judge {
                progress.on_judge_start(&turn);
                let judged = judge
                    .evaluate(
                        debate.config().topic(),
                        &turn,
                        debate.transcript().turns(),
                        control.abort_token(),
                    )
                    .await;
                match judged {
                    Ok(judgement) => {
                        progress.on_judgement(&turn, &judgement);
                        self.log_judgement(&turn, &judgement);
                        turn = turn.with_judgement(judgement);
                    }
                    Err(_) => {
                        self.record(&mut debate, turn)?;
                        return self.abort(
                            debate,
                            format!("Interrupted while judging turn {} ({})", index + 1, name),
                            progress,
                        );
                    }
                }
            }

            self.record(&mut debate, turn)?;
        }

        let verdict = judge
            .as_ref()
            .map(|j| Verdict::from_transcript(j.rubric(), debate.transcript()));
        if let Some(verdict) = &verdict {
            info!("Verdict: {}", verdict.rationale);
            progress.on_verdict(verdict);
            self.logger.log(ConversationEvent::new(
                "verdict",
                serde_json::to_value(verdict).unwrap_or_default(),
            ));
        }
        debate.complete(verdict)?;
        info!("Debate completed after {} turns", debate.transcript().len());
        self.logger.log(ConversationEvent::new(
            "debate_completed",
            json!({
                "turns": debate.transcript().len(),
                "max_turns": debate.transcript().max_turns(),
            }),
        ));
        progress.on_debate_end(&debate);
        Ok(debate)
    }

    async fn open_session(&self, model: &ModelSpec) -> Result<Box<dyn LlmSession>, RunDebateError> {
        self.gateway
            .create_session(model)
            .await
            .map_err(|source| RunDebateError::ModelUnavailable {
                model: model.display_name.clone(),
                source,
            })
    }

    fn record(&self, debate: &mut Debate, turn: Turn) -> Result<(), RunDebateError> {
        let turn = debate.record_turn(turn)?;
        self.logger.log(ConversationEvent::new(
            "turn_completed",
            json!({
                "index": turn.index(),
                "speaker": turn.speaker(),
                "text": turn.text(),
                "chars": turn.text().len(),
            }),
        ));
        Ok(())
    }

    fn abort(
        &self,
        mut debate: Debate,
        reason: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<Debate, RunDebateError> {
        warn!("Debate aborted: {}", reason);
        self.logger.log(ConversationEvent::new(
            "debate_aborted",
            json!({
                "reason": reason,
                "turns": debate.transcript().len(),
            }),
        ));
        debate.abort(reason)?;
        progress.on_debate_end(&debate);
        Ok(debate)
    }

    fn log_started(&self, debate: &Debate) {
        let config = debate.config();
        let participants: Vec<_> = config
            .participants()
            .iter()
            .map(|p| json!({ "persona": p.persona.id, "name": p.name(), "model": p.model.key }))
            .collect();
        self.logger.log(ConversationEvent::new(
            "debate_started",
            json!({
                "topic": config.topic(),
                "kind": config.kind().as_str(),
                "participants": participants,
                "max_turns": config.max_turns(),
                "judge": config.judge_model().map(|m| m.key.as_str()),
                "tools_enabled": config.tools_enabled(),
            }),
        ));
    }

    fn log_tools(&self, index: usize, output: &TurnOutput) {
        for invocation in &output.tools {
            self.logger.log(ConversationEvent::new(
                "tool_call",
                json!({
                    "turn": index,
                    "tool": invocation.call.tool_name,
                    "arguments": invocation.call.arguments,
                    "success": invocation.result.success,
                    "duration_ms": invocation.result.duration_ms,
                }),
            ));
        }
        for dropped in &output.dropped {
            self.logger.log(ConversationEvent::new(
                "tool_call",
                json!({
                    "turn": index,
                    "tool": dropped.tool_name,
                    "dropped": dropped.reason,
                }),
            ));
        }
    }

    fn log_judgement(&self, turn: &Turn, judgement: &TurnJudgement) {
        let event = match judgement {
            TurnJudgement::Scored(score) => ConversationEvent::new(
                "judge_scored",
                json!({
                    "turn": turn.index(),
                    "speaker": turn.speaker(),
                    "scores": score.scores().collect::<Vec<_>>(),
                    "total": score.total(),
                }),
            ),
            TurnJudgement::Unavailable { reason } => ConversationEvent::new(
                "judge_unavailable",
                json!({
                    "turn": turn.index(),
                    "speaker": turn.speaker(),
                    "reason": reason,
                }),
            ),
        };
        self.logger.log(event);
    }
}
