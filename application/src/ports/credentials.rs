//! Credential lookup port

use std::collections::HashMap;

/// Source of provider API keys, keyed by environment variable name
pub trait CredentialSource: Send + Sync {
    /// Return the non-empty value of `env_var`, if set
    fn get(&self, env_var: &str) -> Option<String>;

    fn has(&self, env_var: &str) -> bool {
        self.get(env_var).is_some()
    }
}

/// Fixed credential map, for tests and explicit configuration
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, env_var: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(env_var.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, env_var: &str) -> Option<String> {
        self.values
            .get(env_var)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_count_as_missing() {
        let creds = StaticCredentials::new()
            .with("OPENAI_API_KEY", "sk-test")
            .with("GROQ_API_KEY", "  ");
        assert!(creds.has("OPENAI_API_KEY"));
        assert!(!creds.has("GROQ_API_KEY"));
        assert!(!creds.has("ANTHROPIC_API_KEY"));
    }
}
