//! Persona turn
//!
//! Produces one participant's turn: builds the conversation from the
//! transcript, streams the reply, and runs any research tools the model
//! asks for.

use crate::ports::llm_gateway::{CollectedReply, GatewayError, LlmSession, StreamHandle};
use crate::ports::progress::ProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use arena_domain::{
    DebateConfig, Message, Participant, PromptTemplate, Role, Seat, StreamEvent, ToolCall,
    ToolResult, Transcript, filter_tool_call,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Note sent when every tool request had to be discarded
const TOOLS_DROPPED_NOTE: &str =
    "Your research request could not be completed. Continue your response without it.";

/// Errors that end a turn
#[derive(Error, Debug, Clone)]
pub enum TurnError {
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Interrupted")]
    Cancelled,
}

/// A tool call that ran during a turn
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub call: ToolCall,
    pub result: ToolResult,
}

/// A tool call that was dropped as malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCall {
    pub tool_name: String,
    pub reason: String,
}

/// Result of one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    /// Complete text stored in the transcript
    pub text: String,
    pub tools: Vec<ToolInvocation>,
    pub dropped: Vec<DroppedCall>,
}

/// Everything a persona agent needs to speak besides its session
pub struct TurnContext<'a> {
    pub config: &'a DebateConfig,
    pub transcript: &'a Transcript,
    pub tools: Option<&'a dyn ToolExecutorPort>,
    pub progress: &'a dyn ProgressNotifier,
    pub cancel: &'a CancellationToken,
}

/// Agent voicing one participant
///
/// Sessions are stateless, so the agent rebuilds the conversation from the
/// transcript on every turn. Tool results only live in that turn's request.
pub struct PersonaAgent {
    seat: Seat,
    participant: Participant,
    session: Box<dyn LlmSession>,
}

impl PersonaAgent {
    pub fn new(seat: Seat, participant: Participant, session: Box<dyn LlmSession>) -> Self {
        Self {
            seat,
            participant,
            session,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    /// Build the request for this agent's next turn
    pub fn build_messages(
        &self,
        config: &DebateConfig,
        transcript: &Transcript,
        tools: Option<&dyn ToolExecutorPort>,
    ) -> Vec<Message> {
        let persona = &self.participant.persona;
        let opponent = &config.participant(self.seat.other()).persona;
        let persona_prompt = match tools {
            Some(executor) => {
                PromptTemplate::persona_with_tools(&persona.prompt, &executor.tool_spec().describe())
            }
            None => persona.prompt.clone(),
        };
        let opening = PromptTemplate::opening(
            config.kind(),
            config.topic(),
            &config.participant(Seat::First).persona,
            &config.participant(Seat::Second).persona,
        );

        if transcript.is_empty() {
            return vec![Message::user(format!("{}\n\n{}", persona_prompt, opening))];
        }

        let mut messages = vec![Message::system(persona_prompt)];
        push_merged(&mut messages, Message::user(opening));
        for turn in transcript.turns() {
            let message = if turn.seat() == self.seat {
                Message::assistant(turn.text())
            } else {
                Message::user(turn.text())
            };
            push_merged(&mut messages, message);
        }
        push_merged(
            &mut messages,
            Message::user(PromptTemplate::continuation(config.kind(), persona, opponent)),
        );
        messages
    }

    /// Speak the next turn, streaming fragments to `ctx.progress`.
    pub async fn take_turn(&self, ctx: TurnContext<'_>) -> Result<TurnOutput, TurnError> {
        let tools = ctx.tools.filter(|_| ctx.config.tools_enabled());
        let messages = self.build_messages(ctx.config, ctx.transcript, tools);
        debug!(
            "{} speaking with {} messages",
            self.participant.name(),
            messages.len()
        );

        let first = match tools {
            Some(executor) => {
                let definitions = executor.definitions();
                cancellable(ctx.cancel, self.session.send_streaming_with_tools(&messages, &definitions))
                    .await??
            }
            None => cancellable(ctx.cancel, self.session.send_streaming(&messages)).await??,
        };
        let reply = drain(first, ctx.progress, ctx.cancel).await?;

        let mut output = TurnOutput {
            text: reply.text,
            tools: Vec::new(),
            dropped: Vec::new(),
        };

        if let Some(executor) = tools
            && !reply.tool_calls.is_empty()
        {
            self.run_tools(executor, reply.tool_calls, &mut output, &ctx).await?;

            let mut followup = messages;
            if !output.text.trim().is_empty() {
                push_merged(&mut followup, Message::assistant(output.text.clone()));
                ctx.progress.on_turn_chunk("\n\n");
            }
            let note = if output.tools.is_empty() {
                TOOLS_DROPPED_NOTE.to_string()
            } else {
                let results: Vec<ToolResult> =
                    output.tools.iter().map(|t| t.result.clone()).collect();
                PromptTemplate::research_context(&results)
            };
            push_merged(&mut followup, Message::user(note));

            let second = cancellable(ctx.cancel, self.session.send_streaming(&followup)).await??;
            let continuation = drain(second, ctx.progress, ctx.cancel).await?;
            output.text = join_text(&output.text, &continuation.text);
        }

        if output.text.trim().is_empty() {
            return Err(TurnError::EmptyResponse);
        }
        output.text = output.text.trim().to_string();
        Ok(output)
    }

    async fn run_tools(
        &self,
        executor: &dyn ToolExecutorPort,
        calls: Vec<ToolCall>,
        output: &mut TurnOutput,
        ctx: &TurnContext<'_>,
    ) -> Result<(), TurnError> {
        for call in calls {
            let filtered = match filter_tool_call(&call, executor.tool_spec()) {
                Ok(filtered) => filtered,
                Err(e) => {
                    warn!("{}: dropping tool call: {}", self.participant.name(), e);
                    ctx.progress.on_tool_dropped(&call.tool_name, &e.to_string());
                    output.dropped.push(DroppedCall {
                        tool_name: call.tool_name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if !filtered.dropped.is_empty() {
                debug!(
                    "Stripped arguments {:?} from {} call",
                    filtered.dropped, filtered.call.tool_name
                );
            }

            ctx.progress.on_tool_call(&filtered.call);
            let result = cancellable(ctx.cancel, executor.execute(&filtered.call)).await?;
            ctx.progress.on_tool_result(&result);
            output.tools.push(ToolInvocation {
                call: filtered.call,
                result,
            });
        }
        Ok(())
    }
}

/// Await `future` unless the token fires first
async fn cancellable<F: Future>(cancel: &CancellationToken, future: F) -> Result<F::Output, TurnError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TurnError::Cancelled),
        output = future => Ok(output),
    }
}

/// Consume a stream, forwarding text fragments as they arrive
async fn drain(
    mut handle: StreamHandle,
    progress: &dyn ProgressNotifier,
    cancel: &CancellationToken,
) -> Result<CollectedReply, TurnError> {
    let mut reply = CollectedReply::default();
    loop {
        let event = cancellable(cancel, handle.next()).await?;
        match event {
            Some(StreamEvent::Delta(chunk)) => {
                progress.on_turn_chunk(&chunk);
                reply.text.push_str(&chunk);
            }
            Some(StreamEvent::ToolCall(call)) => reply.tool_calls.push(call),
            Some(StreamEvent::Completed(text)) => {
                if reply.text.is_empty() && !text.is_empty() {
                    progress.on_turn_chunk(&text);
                    reply.text = text;
                }
                break;
            }
            Some(StreamEvent::Error(e)) => return Err(GatewayError::StreamError(e).into()),
            None => break,
        }
    }
    Ok(reply)
}

/// Append a message, folding it into the previous one when roles match
fn push_merged(messages: &mut Vec<Message>, message: Message) {
    match messages.last_mut() {
        Some(last) if last.role == message.role && message.role != Role::System => {
            last.content.push_str("\n\n");
            last.content.push_str(&message.content);
        }
        _ => messages.push(message),
    }
}

fn join_text(first: &str, second: &str) -> String {
    match (first.trim().is_empty(), second.trim().is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{}\n\n{}", first.trim_end(), second.trim_start()),
    }
}
