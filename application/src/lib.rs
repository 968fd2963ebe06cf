//! Application layer for debate-arena
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    credentials::{CredentialSource, StaticCredentials},
    exporter::{DebateExporter, ExportFailure},
    llm_gateway::{CollectedReply, GatewayError, LlmGateway, LlmSession, StreamHandle},
    progress::{NoProgress, ProgressNotifier},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::judge_turn::{JudgeAgent, JudgeCancelled};
pub use use_cases::persona_turn::{
    DroppedCall, PersonaAgent, ToolInvocation, TurnContext, TurnError, TurnOutput,
};
pub use use_cases::run_debate::{DebateControl, RunDebateError, RunDebateInput, RunDebateUseCase};
pub use use_cases::select_models::{ModelAvailability, ModelSelector, SelectionError};
