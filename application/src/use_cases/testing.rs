//! Scripted gateway, session and tool doubles shared by use case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle};
use crate::ports::tool_executor::ToolExecutorPort;
use arena_domain::{
    DebateConfig, DebateKind, Message, ModelSpec, Participant, Persona, Provider, Rubric,
    StreamEvent, ToolCall, ToolDefinition, ToolResult, ToolSpec, default_tool_spec,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    Events(Vec<StreamEvent>),
    Fail(GatewayError),
    /// Never answers; only a cancellation gets past it
    Hang,
}

impl Step {
    pub fn reply(text: impl Into<String>) -> Self {
        Step::Reply(text.into())
    }
}

/// A session that replays its script and records every request
#[derive(Clone)]
pub struct ScriptedSession {
    model: ModelSpec,
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    offered_tools: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedSession {
    pub fn new(model: ModelSpec, steps: Vec<Step>) -> Self {
        Self {
            model,
            steps: Arc::new(Mutex::new(steps.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
            offered_tools: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn offered_tools(&self) -> Vec<usize> {
        self.offered_tools.lock().unwrap().clone()
    }

    fn next_step(&self, messages: &[Message]) -> Step {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Step::Fail(GatewayError::Other("script exhausted".to_string())))
    }
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &ModelSpec {
        &self.model
    }

    async fn send(&self, messages: &[Message]) -> Result<String, GatewayError> {
        match self.next_step(messages) {
            Step::Reply(text) => Ok(text),
            Step::Events(events) => Ok(events
                .iter()
                .filter_map(|e| match e {
                    StreamEvent::Delta(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect()),
            Step::Fail(e) => Err(e),
            Step::Hang => std::future::pending().await,
        }
    }

    async fn send_streaming(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        match self.next_step(messages) {
            Step::Reply(text) => Ok(StreamHandle::from_events(vec![
                StreamEvent::Delta(text.clone()),
                StreamEvent::Completed(text),
            ])),
            Step::Events(events) => Ok(StreamHandle::from_events(events)),
            Step::Fail(e) => Err(e),
            Step::Hang => std::future::pending().await,
        }
    }

    async fn send_streaming_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<StreamHandle, GatewayError> {
        self.offered_tools.lock().unwrap().push(tools.len());
        self.send_streaming(messages).await
    }
}

/// Gateway handing out scripted sessions keyed by model key
#[derive(Default)]
pub struct ScriptedGateway {
    sessions: Mutex<HashMap<String, ScriptedSession>>,
    unavailable: Mutex<HashSet<String>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the session for `model` and return a handle for inspection
    pub fn script(&self, model: &ModelSpec, steps: Vec<Step>) -> ScriptedSession {
        let session = ScriptedSession::new(model.clone(), steps);
        self.sessions
            .lock()
            .unwrap()
            .insert(model.key.clone(), session.clone());
        session
    }

    pub fn mark_unavailable(&self, model: &ModelSpec) {
        self.unavailable.lock().unwrap().insert(model.key.clone());
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(&self, model: &ModelSpec) -> Result<Box<dyn LlmSession>, GatewayError> {
        if self.unavailable.lock().unwrap().contains(&model.key) {
            return Err(GatewayError::MissingCredential {
                provider: "openai",
                env_var: "OPENAI_API_KEY".to_string(),
            });
        }
        let session = self
            .sessions
            .lock()
            .unwrap()
            .get(&model.key)
            .cloned()
            .unwrap_or_else(|| ScriptedSession::new(model.clone(), Vec::new()));
        Ok(Box::new(session))
    }
}

/// Search double that answers every query and records the calls it ran
pub struct RecordingSearch {
    spec: ToolSpec,
    calls: Mutex<Vec<ToolCall>>,
}

impl RecordingSearch {
    pub fn new() -> Self {
        Self {
            spec: default_tool_spec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolExecutorPort for RecordingSearch {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.calls.lock().unwrap().push(call.clone());
        let query = call.get_string("query").unwrap_or_default();
        ToolResult::success(&call.tool_name, format!("Top result for '{}'", query))
    }
}

pub fn model(key: &str) -> ModelSpec {
    ModelSpec::new(key, key.to_uppercase(), key, Provider::OpenAi)
}

/// Progressive (model-a) vs conservative (model-b)
pub fn political_config(max_turns: usize, judge: Option<ModelSpec>, tools: bool) -> DebateConfig {
    DebateConfig::builder(DebateKind::PoliticalDebate, "Universal basic income")
        .participants(
            Participant::new(Persona::progressive(), model("model-a")),
            Participant::new(Persona::conservative(), model("model-b")),
        )
        .max_turns(max_turns)
        .judge(judge)
        .tools(tools)
        .build()
        .unwrap()
}

/// A well-formed judge reply giving `score` on every criterion
pub fn judge_reply(rubric: Rubric, score: i64) -> String {
    let scores: Vec<String> = rubric.keys().map(|k| format!("\"{}\": {}", k, score)).collect();
    format!(
        "```json\n{{\"scores\": {{{}}}, \"{}\": [\"clear opening\"], \"weaknesses\": [], \"feedback\": \"Solid.\"}}\n```",
        scores.join(", "),
        rubric.highlights_key()
    )
}
