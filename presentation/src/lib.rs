//! Presentation layer for debate-arena
//!
//! This crate contains CLI definitions, the interactive setup menu,
//! output formatters and progress reporters.

pub mod cli;
pub mod config;
pub mod menu;
pub mod output;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::SessionDefaults;
pub use menu::SetupMenu;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use session::ArenaSession;
