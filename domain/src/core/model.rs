//! Model value objects: providers, catalog entries and the built-in catalog

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::DomainError;

/// LLM provider backing a model (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Groq,
    DeepSeek,
    OpenRouter,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 7] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::Groq,
        Provider::DeepSeek,
        Provider::OpenRouter,
        Provider::Ollama,
    ];

    /// Get the string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
            Provider::Groq => "groq",
            Provider::DeepSeek => "deepseek",
            Provider::OpenRouter => "openrouter",
            Provider::Ollama => "ollama",
        }
    }

    /// Human-readable provider name
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
            Provider::Google => "Google Gemini",
            Provider::Groq => "Groq",
            Provider::DeepSeek => "DeepSeek",
            Provider::OpenRouter => "OpenRouter",
            Provider::Ollama => "Ollama",
        }
    }

    /// Environment variable holding the API key, or `None` when the
    /// provider needs no credential (local Ollama).
    pub fn credential_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Google => Some("GOOGLE_API_KEY"),
            Provider::Groq => Some("GROQ_API_KEY"),
            Provider::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Provider::OpenRouter => Some("OPENROUTER_API_KEY"),
            Provider::Ollama => None,
        }
    }

    /// Whether the provider speaks the OpenAI chat-completions wire format
    pub fn is_openai_compatible(&self) -> bool {
        matches!(
            self,
            Provider::OpenAi
                | Provider::Groq
                | Provider::DeepSeek
                | Provider::OpenRouter
                | Provider::Ollama
        )
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "google" | "gemini" => Ok(Provider::Google),
            "groq" => Ok(Provider::Groq),
            "deepseek" => Ok(Provider::DeepSeek),
            "openrouter" => Ok(Provider::OpenRouter),
            "ollama" => Ok(Provider::Ollama),
            other => Err(DomainError::InvalidModel(format!(
                "unknown provider '{}'",
                other
            ))),
        }
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A selectable model: catalog key, display name, provider-side model name
/// and the provider that serves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelSpec {
    pub key: String,
    pub display_name: String,
    pub model_name: String,
    pub provider: Provider,
}

impl ModelSpec {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        model_name: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            model_name: model_name.into(),
            provider,
        }
    }

    /// Parse `provider:model-name` into an ad-hoc entry outside the catalog.
    pub fn parse_custom(s: &str) -> Result<Self, DomainError> {
        let (provider, model_name) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidModel(s.to_string()))?;
        let model_name = model_name.trim();
        if model_name.is_empty() {
            return Err(DomainError::InvalidModel(s.to_string()));
        }
        let provider: Provider = provider.trim().parse()?;
        Ok(Self::new(
            s.to_string(),
            format!("{} {}", provider.display_name(), model_name),
            model_name,
            provider,
        ))
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// The set of models offered in the selection menu.
///
/// Constructed explicitly and passed around; there is no global registry.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: Vec<ModelSpec>,
}

impl ModelCatalog {
    pub fn new(entries: Vec<ModelSpec>) -> Self {
        Self { entries }
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        use Provider::*;
        let entries = [
            ("openai-gpt4o", "OpenAI GPT-4o", "gpt-4o", OpenAi),
            ("openai-gpt4o-mini", "OpenAI GPT-4o Mini", "gpt-4o-mini", OpenAi),
            ("openai-gpt5", "OpenAI GPT-5", "gpt-5", OpenAi),
            (
                "claude-sonnet-4",
                "Claude Sonnet 4",
                "claude-sonnet-4-20250514",
                Anthropic,
            ),
            (
                "claude-haiku",
                "Claude 3.5 Haiku",
                "claude-3-5-haiku-latest",
                Anthropic,
            ),
            ("gemini-pro", "Gemini 1.5 Pro", "gemini-1.5-pro", Google),
            ("gemini-flash", "Gemini 1.5 Flash", "gemini-1.5-flash", Google),
            (
                "gemini-2.5-flash",
                "Gemini 2.5 Flash",
                "gemini-2.5-flash",
                Google,
            ),
            (
                "groq-llama",
                "Groq Llama 3.3 70B",
                "llama-3.3-70b-versatile",
                Groq,
            ),
            ("deepseek-chat", "DeepSeek Chat", "deepseek-chat", DeepSeek),
            (
                "openrouter-llama",
                "OpenRouter Llama 3.1 70B",
                "meta-llama/llama-3.1-70b-instruct",
                OpenRouter,
            ),
            ("ollama-llama3", "Ollama Llama 3", "llama3", Ollama),
        ];
        Self::new(
            entries
                .into_iter()
                .map(|(key, display, model, provider)| ModelSpec::new(key, display, model, provider))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[ModelSpec] {
        &self.entries
    }

    /// Look up an entry by key, falling back to `provider:model` syntax
    pub fn resolve(&self, key: &str) -> Result<ModelSpec, DomainError> {
        if let Some(spec) = self.entries.iter().find(|m| m.key == key) {
            return Ok(spec.clone());
        }
        ModelSpec::parse_custom(key)
    }

    pub fn with_entry(mut self, spec: ModelSpec) -> Self {
        self.entries.retain(|m| m.key != spec.key);
        self.entries.push(spec);
        self
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
