//! API keys read from the process environment

use arena_application::ports::credentials::CredentialSource;

/// [`CredentialSource`] backed by `std::env`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, env_var: &str) -> Option<String> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}
