//! Domain layer for debate-arena
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! A [`Debate`] pairs two [`Participant`]s (a [`Persona`] voiced by a
//! [`ModelSpec`]) and records their alternating turns in a [`Transcript`].
//! Its lifecycle is the [`DebateState`] machine:
//! `NotStarted → InProgress → Completed | Aborted`.
//!
//! ## Judging
//!
//! Each turn may be scored against an eight-criterion [`Rubric`]. Replies
//! are validated into a [`JudgeScore`] or recorded as
//! [`TurnJudgement::Unavailable`]; a completed debate is aggregated into a
//! [`Verdict`].

pub mod core;
pub mod debate;
pub mod judge;
pub mod persona;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    model::{ModelCatalog, ModelSpec, Provider},
};
pub use debate::{
    Debate, DebateConfig, DebateConfigBuilder, DebateKind, DebateRecord, DebateState, Participant,
    Seat, SessionLog, SessionSummary, Transcript, Turn,
};
pub use judge::{
    JudgeScore, Outcome, QualityTier, Rubric, ScoreFormatError, SpeakerTally, TieReason,
    TurnJudgement, Verdict, parse_judge_response,
};
pub use persona::Persona;
pub use prompt::PromptTemplate;
pub use session::{
    entities::{Message, Role, split_system},
    stream::StreamEvent,
};
pub use tool::{
    FilteredCall, MalformedToolCall, ToolCall, ToolDefinition, ToolError, ToolParameter,
    ToolResult, ToolSpec, WEB_SEARCH, default_tool_spec, filter_tool_call, web_search_definition,
};
