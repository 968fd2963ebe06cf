//! Streaming events for LLM session communication.
//!
//! [`StreamEvent`] represents individual events in a streaming LLM response,
//! enabling real-time display of model output as it's generated.

use crate::tool::ToolCall;

/// An event in a streaming LLM response.
///
/// Bridges infrastructure-level streaming (SSE chunks from a provider) to
/// the application layer. Providers assemble tool calls from their
/// incremental wire fragments and emit each one as a single
/// [`ToolCall`](StreamEvent::ToolCall) event once its arguments are complete.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// A fully assembled tool invocation requested by the model.
    ToolCall(ToolCall),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}
