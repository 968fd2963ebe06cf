//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and validated before use.

mod debate;
mod output;
mod providers;

pub use debate::FileDebateConfig;
pub use output::FileOutputConfig;
pub use providers::{FileProviderEndpoint, FileProvidersConfig};

use arena_domain::ModelSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("providers.timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("providers.temperature must be between 0.0 and 2.0 (got {0})")]
    InvalidTemperature(f32),

    #[error("providers.max_tokens cannot be 0")]
    InvalidMaxTokens,

    #[error("debate.{0} must be at least 1")]
    InvalidTurnBudget(&'static str),

    #[error("debate.judge_model '{0}' is not a catalog key or provider:model")]
    InvalidJudgeModel(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider endpoints and sampling settings
    pub providers: FileProvidersConfig,
    /// Debate defaults
    pub debate: FileDebateConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.providers.timeout_secs == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.providers.temperature) {
            issues.push(ConfigValidationError::InvalidTemperature(
                self.providers.temperature,
            ));
        }
        if self.providers.max_tokens == 0 {
            issues.push(ConfigValidationError::InvalidMaxTokens);
        }
        if self.debate.default_max_turns == 0 {
            issues.push(ConfigValidationError::InvalidTurnBudget("default_max_turns"));
        }
        if self.debate.default_rap_rounds == 0 {
            issues.push(ConfigValidationError::InvalidTurnBudget("default_rap_rounds"));
        }
        if let Some(judge) = &self.debate.judge_model
            && arena_domain::ModelCatalog::builtin().resolve(judge).is_err()
        {
            issues.push(ConfigValidationError::InvalidJudgeModel(judge.clone()));
        }

        issues
    }

    /// Judge model from `[debate] judge_model`, if it resolves
    pub fn judge_model(&self) -> Option<ModelSpec> {
        let key = self.debate.judge_model.as_deref()?;
        arena_domain::ModelCatalog::builtin().resolve(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[providers]
timeout_secs = 60
max_tokens = 1024

[providers.anthropic]
api_key_env = "CLAUDE_KEY"

[debate]
default_max_turns = 10
judge_model = "claude-haiku"
tools_enabled = true

[output]
dir = "out"
log_dir = "logs"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.timeout_secs, 60);
        assert_eq!(config.providers.max_tokens, 1024);
        assert_eq!(
            config.providers.anthropic.api_key_env.as_deref(),
            Some("CLAUDE_KEY")
        );
        assert_eq!(config.debate.default_max_turns, 10);
        assert_eq!(config.debate.default_rap_rounds, 3);
        assert!(config.debate.tools_enabled);
        assert_eq!(config.judge_model().unwrap().key, "claude-haiku");
        assert_eq!(config.output.log_dir.as_deref(), Some(std::path::Path::new("logs")));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.providers.temperature, 0.7);
        assert_eq!(config.debate.default_max_turns, 8);
        assert!(config.debate.judge_enabled);
        assert!(!config.debate.tools_enabled);
        assert!(config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.providers.timeout_secs = 0;
        config.providers.temperature = 3.5;
        config.debate.default_rap_rounds = 0;
        config.debate.judge_model = Some("not-a-model".to_string());
        let issues = config.validate();
        assert_eq!(
            issues,
            vec![
                ConfigValidationError::InvalidTimeout,
                ConfigValidationError::InvalidTemperature(3.5),
                ConfigValidationError::InvalidTurnBudget("default_rap_rounds"),
                ConfigValidationError::InvalidJudgeModel("not-a-model".to_string()),
            ]
        );
    }
}
