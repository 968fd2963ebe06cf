//! Model selection use case
//!
//! Decides which catalog entries can be used with the credentials at hand
//! and rejects a selection before any debate turn is attempted.

use crate::ports::credentials::CredentialSource;
use arena_domain::{DomainError, ModelCatalog, ModelSpec, Provider};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while choosing models
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Missing API key for {model}: set {env_var}")]
    MissingCredential { model: String, env_var: String },

    #[error("Invalid model selection: {0}")]
    InvalidModel(#[from] DomainError),

    #[error("No models are available; set at least one provider API key")]
    NoneAvailable,
}

/// Availability of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAvailability {
    pub spec: ModelSpec,
    /// Env var that must be set before the entry can be used
    pub missing_env: Option<String>,
}

impl ModelAvailability {
    pub fn is_available(&self) -> bool {
        self.missing_env.is_none()
    }
}

/// Resolves model keys against the catalog and the configured credentials
pub struct ModelSelector {
    catalog: ModelCatalog,
    credentials: Arc<dyn CredentialSource>,
    env_overrides: HashMap<Provider, String>,
}

impl ModelSelector {
    pub fn new(catalog: ModelCatalog, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            catalog,
            credentials,
            env_overrides: HashMap::new(),
        }
    }

    /// Read a provider's key from a different environment variable
    pub fn with_env_override(mut self, provider: Provider, env_var: impl Into<String>) -> Self {
        self.env_overrides.insert(provider, env_var.into());
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The variable a provider's key is read from, if it needs one
    pub fn credential_env(&self, provider: Provider) -> Option<String> {
        self.env_overrides
            .get(&provider)
            .cloned()
            .or_else(|| provider.credential_env().map(str::to_string))
    }

    fn missing_env(&self, provider: Provider) -> Option<String> {
        self.credential_env(provider)
            .filter(|env_var| !self.credentials.has(env_var))
    }

    /// Availability of every catalog entry, in catalog order
    pub fn availability(&self) -> Vec<ModelAvailability> {
        self.catalog
            .entries()
            .iter()
            .map(|spec| ModelAvailability {
                spec: spec.clone(),
                missing_env: self.missing_env(spec.provider),
            })
            .collect()
    }

    /// Catalog entries that can be used right now
    pub fn available(&self) -> Vec<ModelSpec> {
        self.availability()
            .into_iter()
            .filter(ModelAvailability::is_available)
            .map(|a| a.spec)
            .collect()
    }

    /// Providers whose key is missing, with the variable to set
    pub fn missing_credentials(&self) -> Vec<(Provider, String)> {
        Provider::ALL
            .iter()
            .filter_map(|p| self.missing_env(*p).map(|env| (*p, env)))
            .collect()
    }

    /// Resolve a key (or `provider:model`) and check its credential
    pub fn select(&self, key: &str) -> Result<ModelSpec, SelectionError> {
        let spec = self.catalog.resolve(key)?;
        self.ensure_available(&spec)?;
        debug!("Selected model {} ({})", spec.key, spec.provider);
        Ok(spec)
    }

    /// Check that a model's credential is present
    pub fn ensure_available(&self, spec: &ModelSpec) -> Result<(), SelectionError> {
        match self.missing_env(spec.provider) {
            Some(env_var) => Err(SelectionError::MissingCredential {
                model: spec.display_name.clone(),
                env_var,
            }),
            None => Ok(()),
        }
    }

    /// First usable model, preferring `preferred` when it is available
    pub fn default_model(&self, preferred: Option<&str>) -> Result<ModelSpec, SelectionError> {
        if let Some(key) = preferred
            && let Ok(spec) = self.select(key)
        {
            return Ok(spec);
        }
        self.available()
            .into_iter()
            .next()
            .ok_or(SelectionError::NoneAvailable)
    }
}
