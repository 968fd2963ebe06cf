//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.

use arena_domain::{Message, ModelSpec, StreamEvent, ToolCall, ToolDefinition};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Missing API key for {provider}: set {env_var}")]
    MissingCredential {
        provider: &'static str,
        env_var: String,
    },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Configuration problems are reported before a debate starts
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingCredential { .. } | GatewayError::ModelNotAvailable(_)
        )
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a session bound to the specified model.
    ///
    /// Fails with [`GatewayError::MissingCredential`] when the model's
    /// provider has no API key configured.
    async fn create_session(&self, model: &ModelSpec) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// Handle for receiving streaming events from an LLM session.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. The stream is finite and can be
/// consumed once.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, or `None` once the producer is done.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and collect all text into a single string.
    ///
    /// Tool call events are discarded.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::StreamError(e));
                }
                StreamEvent::ToolCall(_) => {}
            }
        }
        // Channel closed without Completed — return what we have
        Ok(full_text)
    }

    /// Build a handle that replays a fixed list of events.
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // capacity covers every event, so try_send cannot fail on Full
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }
}

/// An active LLM session
///
/// Sessions are bound to a model but keep no history: every call carries
/// the full conversation.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &ModelSpec;

    /// Send a conversation and get the complete reply
    async fn send(&self, messages: &[Message]) -> Result<String, GatewayError>;

    /// Send a conversation and get a streaming reply.
    ///
    /// Default implementation calls `send()` and wraps the result in a single
    /// `Completed` event.
    async fn send_streaming(&self, messages: &[Message]) -> Result<StreamHandle, GatewayError> {
        let result = self.send(messages).await?;
        Ok(StreamHandle::from_events(vec![StreamEvent::Completed(result)]))
    }

    /// Stream a reply while offering tools to the model.
    ///
    /// Requested invocations arrive as [`StreamEvent::ToolCall`]. The default
    /// implementation ignores the tools.
    async fn send_streaming_with_tools(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<StreamHandle, GatewayError> {
        self.send_streaming(messages).await
    }
}

/// Tool calls and text gathered from one streamed reply
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectedReply {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}
