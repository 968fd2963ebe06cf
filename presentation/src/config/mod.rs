//! Presentation-level configuration
//!
//! Defaults offered by the setup menu.

use serde::{Deserialize, Serialize};

/// Menu defaults for an arena session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    /// Turn budget suggested for structured political debates
    pub max_turns: usize,
    /// Round budget suggested for rap battles
    pub rap_rounds: usize,
    /// Judge toggle default
    pub judge_enabled: bool,
    /// Preferred judge model key
    pub judge_model: Option<String>,
    /// Web search toggle default
    pub tools_enabled: bool,
    /// Whether a web search executor is wired in
    pub tools_available: bool,
    /// Show progress bars and spinners
    pub show_progress: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            max_turns: 8,
            rap_rounds: 3,
            judge_enabled: true,
            judge_model: None,
            tools_enabled: false,
            tools_available: true,
            show_progress: true,
        }
    }
}
