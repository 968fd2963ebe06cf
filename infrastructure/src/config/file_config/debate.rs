//! Debate defaults from TOML (`[debate]` section)

use serde::{Deserialize, Serialize};

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Default turn budget for debates and discussions
    pub default_max_turns: usize,
    /// Default number of rounds for rap battles (two verses per round)
    pub default_rap_rounds: usize,
    /// Whether the judge is offered as enabled in the menu
    pub judge_enabled: bool,
    /// Whether research tools are offered as enabled in the menu
    pub tools_enabled: bool,
    /// Preferred judge model key (or `provider:model`)
    pub judge_model: Option<String>,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            default_max_turns: 8,
            default_rap_rounds: 3,
            judge_enabled: true,
            tools_enabled: false,
            judge_model: None,
        }
    }
}
