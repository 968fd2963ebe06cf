//! Debate domain: configuration, lifecycle, transcript and session history.

pub mod config;
pub mod entities;
pub mod kind;
pub mod session_log;
pub mod state;
pub mod transcript;

pub use config::{DebateConfig, DebateConfigBuilder, Participant};
pub use entities::Debate;
pub use kind::DebateKind;
pub use session_log::{DebateRecord, SessionLog, SessionSummary};
pub use state::DebateState;
pub use transcript::{Seat, Transcript, Turn};
