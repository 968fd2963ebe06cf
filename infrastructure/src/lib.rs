//! Infrastructure layer for debate-arena
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: streaming HTTP clients for each provider,
//! environment credentials, the web search tool, configuration file
//! loading, JSONL event logging and markdown export.

pub mod config;
pub mod credentials;
pub mod export;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigValidationError, FileConfig};
pub use credentials::EnvCredentials;
pub use export::{ExportError, MarkdownExporter, parse_transcript, parse_transcript_file};
pub use logging::JsonlConversationLogger;
pub use providers::{ProviderFactory, ProvidersConfig, RoutingGateway};
pub use tools::WebSearchExecutor;
