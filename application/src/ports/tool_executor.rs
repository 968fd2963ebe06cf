//! Tool Executor port
//!
//! Defines the interface for executing the research tools personas may call.

use arena_domain::{ToolCall, ToolDefinition, ToolResult, ToolSpec};
use async_trait::async_trait;

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Definitions offered to the model, sorted by name
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tool_spec().all().into_iter().cloned().collect()
    }

    /// Execute an already-filtered tool call.
    ///
    /// Failures are reported inside the [`ToolResult`], never as an error:
    /// a failed lookup must not end the turn.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
