//! Provider configuration from TOML (`[providers]` section)

use arena_domain::Provider;
use serde::{Deserialize, Serialize};

/// Overrides for a single provider endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderEndpoint {
    /// Environment variable holding the API key (defaults per provider).
    pub api_key_env: Option<String>,
    /// Base URL of the API (defaults per provider).
    pub base_url: Option<String>,
}

/// Raw provider configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature for debate participants
    pub temperature: f32,
    /// Max tokens per response
    pub max_tokens: u32,
    pub openai: FileProviderEndpoint,
    pub anthropic: FileProviderEndpoint,
    pub google: FileProviderEndpoint,
    pub groq: FileProviderEndpoint,
    pub deepseek: FileProviderEndpoint,
    pub openrouter: FileProviderEndpoint,
    pub ollama: FileProviderEndpoint,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            temperature: 0.7,
            max_tokens: 2048,
            openai: FileProviderEndpoint::default(),
            anthropic: FileProviderEndpoint::default(),
            google: FileProviderEndpoint::default(),
            groq: FileProviderEndpoint::default(),
            deepseek: FileProviderEndpoint::default(),
            openrouter: FileProviderEndpoint::default(),
            ollama: FileProviderEndpoint::default(),
        }
    }
}

impl FileProvidersConfig {
    pub fn endpoint(&self, provider: Provider) -> &FileProviderEndpoint {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
            Provider::Google => &self.google,
            Provider::Groq => &self.groq,
            Provider::DeepSeek => &self.deepseek,
            Provider::OpenRouter => &self.openrouter,
            Provider::Ollama => &self.ollama,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_overrides() {
        let toml_str = r#"
[providers]
temperature = 0.9

[providers.openai]
base_url = "https://example.azure.com/openai"

[providers.ollama]
base_url = "http://gpu-box:11434"
"#;
        let config: crate::config::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.temperature, 0.9);
        assert_eq!(config.providers.timeout_secs, 120);
        assert_eq!(
            config.providers.endpoint(Provider::Ollama).base_url.as_deref(),
            Some("http://gpu-box:11434")
        );
        assert!(config.providers.endpoint(Provider::Groq).base_url.is_none());
    }
}
