//! HTTP adapters for the supported LLM providers
//!
//! Every provider session streams over server-sent events:
//!
//! ```text
//! ProviderFactory ──▶ OpenAiCompatSession (OpenAI, Groq, DeepSeek, OpenRouter, Ollama)
//!                 ──▶ AnthropicSession
//!                 ──▶ GeminiSession
//! ```
//!
//! [`RoutingGateway`] exposes the factory through the application's
//! [`LlmGateway`](arena_application::LlmGateway) port.

pub mod anthropic;
pub mod gemini;
pub mod openai_compat;
pub mod routing;
pub mod sse;

pub use anthropic::AnthropicSession;
pub use gemini::GeminiSession;
pub use openai_compat::OpenAiCompatSession;
pub use routing::RoutingGateway;

use crate::config::FileProvidersConfig;
use arena_application::ports::credentials::CredentialSource;
use arena_application::ports::llm_gateway::{GatewayError, LlmSession};
use arena_domain::{ModelSpec, Provider};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Endpoint and credential variable for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key_env: Option<String>,
}

impl ProviderSettings {
    /// Public endpoint and standard key variable for `provider`
    pub fn defaults(provider: Provider) -> Self {
        let base_url = match provider {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Anthropic => "https://api.anthropic.com",
            Provider::Google => "https://generativelanguage.googleapis.com/v1beta",
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::Ollama => "http://localhost:11434/v1",
        };
        Self {
            base_url: base_url.to_string(),
            api_key_env: provider.credential_env().map(str::to_string),
        }
    }
}

/// Endpoint variables read when the config file sets no `base_url`
pub const ENDPOINT_ENV: [(Provider, &str); 2] = [
    (Provider::OpenAi, "OPENAI_API_BASE"),
    (Provider::Ollama, "OLLAMA_BASE_URL"),
];

/// Ollama serves the chat-completions API under `/v1`
fn endpoint_from_env(provider: Provider, value: &str) -> String {
    let url = value.trim().trim_end_matches('/');
    if provider == Provider::Ollama && !url.ends_with("/v1") {
        format!("{}/v1", url)
    } else {
        url.to_string()
    }
}

/// Resolved provider configuration
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
    settings: HashMap<Provider, ProviderSettings>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self::from_file(&FileProvidersConfig::default())
    }
}

impl ProvidersConfig {
    /// Apply file overrides on top of the per-provider defaults
    pub fn from_file(file: &FileProvidersConfig) -> Self {
        Self::resolve(file, None)
    }

    /// Like [`from_file`](Self::from_file), also honouring the endpoint
    /// variables in [`ENDPOINT_ENV`]. A `base_url` in the file wins.
    pub fn from_sources(file: &FileProvidersConfig, env: &dyn CredentialSource) -> Self {
        Self::resolve(file, Some(env))
    }

    fn resolve(file: &FileProvidersConfig, env: Option<&dyn CredentialSource>) -> Self {
        let settings = Provider::ALL
            .into_iter()
            .map(|provider| {
                let mut settings = ProviderSettings::defaults(provider);
                let endpoint = file.endpoint(provider);
                let env_url = ENDPOINT_ENV
                    .iter()
                    .find(|(p, _)| *p == provider)
                    .and_then(|(_, var)| env?.get(var));
                if let Some(url) = &endpoint.base_url {
                    settings.base_url = url.clone();
                } else if let Some(url) = env_url {
                    debug!("Using {} endpoint from environment: {}", provider, url);
                    settings.base_url = endpoint_from_env(provider, &url);
                }
                if let Some(env) = &endpoint.api_key_env {
                    settings.api_key_env = Some(env.clone());
                }
                (provider, settings)
            })
            .collect();
        Self {
            timeout: Duration::from_secs(file.timeout_secs),
            temperature: file.temperature,
            max_tokens: file.max_tokens,
            settings,
        }
    }

    pub fn settings(&self, provider: Provider) -> ProviderSettings {
        self.settings
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| ProviderSettings::defaults(provider))
    }

    /// Credential variables that differ from the provider defaults
    pub fn env_overrides(&self) -> Vec<(Provider, String)> {
        Provider::ALL
            .into_iter()
            .filter_map(|provider| {
                let env = self.settings(provider).api_key_env?;
                (provider.credential_env() != Some(env.as_str())).then_some((provider, env))
            })
            .collect()
    }
}

/// Everything a session needs to talk to its provider
#[derive(Debug, Clone)]
pub struct SessionParams {
    pub model: ModelSpec,
    pub base_url: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub client: reqwest::Client,
}

#[cfg(test)]
impl SessionParams {
    pub(crate) fn for_test(provider: Provider) -> Self {
        Self {
            model: ModelSpec::new("test", "Test", "test-model", provider),
            base_url: ProviderSettings::defaults(provider).base_url,
            api_key: Some("test-key".to_string()),
            temperature: 0.7,
            max_tokens: 512,
            client: reqwest::Client::new(),
        }
    }
}

/// Builds provider sessions for catalog models
pub struct ProviderFactory {
    config: ProvidersConfig,
    credentials: Arc<dyn CredentialSource>,
    client: reqwest::Client,
}

impl ProviderFactory {
    pub fn new(
        config: ProvidersConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            credentials,
            client,
        })
    }

    pub fn config(&self) -> &ProvidersConfig {
        &self.config
    }

    /// Resolve the endpoint and API key for `model`.
    ///
    /// Fails with [`GatewayError::MissingCredential`] when the provider
    /// requires a key that is not set.
    pub fn session_params(&self, model: &ModelSpec) -> Result<SessionParams, GatewayError> {
        let settings = self.config.settings(model.provider);
        let api_key = match &settings.api_key_env {
            Some(env) => Some(self.credentials.get(env).ok_or_else(|| {
                GatewayError::MissingCredential {
                    provider: model.provider.as_str(),
                    env_var: env.clone(),
                }
            })?),
            None => None,
        };
        Ok(SessionParams {
            model: model.clone(),
            base_url: settings.base_url,
            api_key,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            client: self.client.clone(),
        })
    }

    pub fn create_session(&self, model: &ModelSpec) -> Result<Box<dyn LlmSession>, GatewayError> {
        let params = self.session_params(model)?;
        debug!(
            "Creating {} session for {} at {}",
            model.provider, model.model_name, params.base_url
        );
        let session: Box<dyn LlmSession> = match model.provider {
            Provider::Anthropic => Box::new(AnthropicSession::new(params)),
            Provider::Google => Box::new(GeminiSession::new(params)),
            _ => Box::new(OpenAiCompatSession::new(params)),
        };
        Ok(session)
    }
}

/// Turn a non-success HTTP status into [`GatewayError::Api`]
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Api {
        status: status.as_u16(),
        message: api_error_message(&body),
    })
}

/// Pull `error.message` out of a JSON error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| error.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

pub(crate) fn map_request_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(error.to_string())
    } else {
        GatewayError::RequestFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileProviderEndpoint;
    use arena_application::StaticCredentials;

    fn factory(credentials: StaticCredentials) -> ProviderFactory {
        ProviderFactory::new(ProvidersConfig::default(), Arc::new(credentials)).unwrap()
    }

    #[test]
    fn test_missing_key_reports_env_var() {
        let factory = factory(StaticCredentials::new());
        let model = ModelSpec::new("claude", "Claude", "claude-sonnet-4", Provider::Anthropic);
        let err = factory.create_session(&model).err().unwrap();
        match err {
            GatewayError::MissingCredential { provider, env_var } => {
                assert_eq!(provider, "anthropic");
                assert_eq!(env_var, "ANTHROPIC_API_KEY");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let factory = factory(StaticCredentials::new());
        let model = ModelSpec::new("llama", "Llama", "llama3.2", Provider::Ollama);
        let params = factory.session_params(&model).unwrap();
        assert_eq!(params.api_key, None);
        assert_eq!(params.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_file_overrides() {
        let mut file = FileProvidersConfig::default();
        file.groq = FileProviderEndpoint {
            api_key_env: Some("MY_GROQ_KEY".to_string()),
            base_url: Some("http://proxy.local/groq".to_string()),
        };
        file.temperature = 0.2;
        let config = ProvidersConfig::from_file(&file);
        assert_eq!(
            config.env_overrides(),
            [(Provider::Groq, "MY_GROQ_KEY".to_string())]
        );

        let factory = ProviderFactory::new(
            config,
            Arc::new(StaticCredentials::new().with("MY_GROQ_KEY", "gsk-1")),
        )
        .unwrap();
        let model = ModelSpec::new("llama-groq", "Llama (Groq)", "llama-3.3-70b", Provider::Groq);
        let params = factory.session_params(&model).unwrap();
        assert_eq!(params.api_key.as_deref(), Some("gsk-1"));
        assert_eq!(params.base_url, "http://proxy.local/groq");
        assert_eq!(params.temperature, 0.2);
    }

    #[test]
    fn test_endpoint_env() {
        let env = StaticCredentials::new()
            .with("OLLAMA_BASE_URL", "http://gpu-box:11434/")
            .with("OPENAI_API_BASE", "https://azure.example/v1");
        let config = ProvidersConfig::from_sources(&FileProvidersConfig::default(), &env);
        assert_eq!(config.settings(Provider::Ollama).base_url, "http://gpu-box:11434/v1");
        assert_eq!(config.settings(Provider::OpenAi).base_url, "https://azure.example/v1");
        assert_eq!(
            config.settings(Provider::Groq).base_url,
            ProviderSettings::defaults(Provider::Groq).base_url
        );

        let mut file = FileProvidersConfig::default();
        file.ollama.base_url = Some("http://pinned:11434/v1".to_string());
        let config = ProvidersConfig::from_sources(&file, &env);
        assert_eq!(config.settings(Provider::Ollama).base_url, "http://pinned:11434/v1");
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"error":{"message":"Invalid API key","type":"auth"}}"#),
            "Invalid API key"
        );
        assert_eq!(api_error_message(r#"{"error":"model not found"}"#), "model not found");
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
