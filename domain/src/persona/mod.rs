//! Persona domain
//!
//! A [`Persona`] is a named viewpoint or style bound to a system prompt.
//! Debaters and rappers are the same type; which one a debate uses is a
//! matter of configuration data, not of a type hierarchy.

mod presets;

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

pub use presets::{RAPPER_IDS, battle_topic_suggestions};

/// A named viewpoint bound to a system prompt (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub prompt: String,
}

impl Persona {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            description: String::new(),
            prompt: prompt.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replace the system prompt, keeping the identity.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// `{icon} {name}`
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }

    /// The progressive political debater
    pub fn progressive() -> Self {
        presets::progressive()
    }

    /// The conservative political debater
    pub fn conservative() -> Self {
        presets::conservative()
    }

    /// Look up a rapper from the battle roster by id (e.g. `"jay-z"`)
    pub fn rapper(id: &str) -> Result<Self, DomainError> {
        presets::rapper(id).ok_or_else(|| DomainError::UnknownPersona(id.to_string()))
    }

    /// All rappers on the battle roster, in menu order
    pub fn rapper_roster() -> Vec<Self> {
        RAPPER_IDS.iter().filter_map(|id| presets::rapper(id)).collect()
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_political_presets() {
        let left = Persona::progressive();
        let right = Persona::conservative();
        assert_eq!(left.label(), "🔴 Progressive Perspective");
        assert_eq!(right.label(), "🔵 Conservative Perspective");
        assert!(left.prompt.contains("progressive"));
        assert!(right.prompt.contains("conservative"));
    }

    #[test]
    fn test_rapper_lookup() {
        let jay = Persona::rapper("jay-z").unwrap();
        assert_eq!(jay.name, "Jay-Z");
        assert_eq!(jay.icon, "💎");
        assert!(!jay.description.is_empty());
    }

    #[test]
    fn test_unknown_rapper() {
        let err = Persona::rapper("vanilla-ice").unwrap_err();
        assert_eq!(err, DomainError::UnknownPersona("vanilla-ice".to_string()));
    }

    #[test]
    fn test_roster_is_complete() {
        let roster = Persona::rapper_roster();
        assert_eq!(roster.len(), RAPPER_IDS.len());
        assert!(roster.iter().all(|p| p.prompt.contains("BATTLE")));
    }

    #[test]
    fn test_custom_prompt_keeps_identity() {
        let custom = Persona::progressive().with_prompt("You are a democratic socialist.");
        assert_eq!(custom.id, "progressive");
        assert_eq!(custom.prompt, "You are a democratic socialist.");
    }
}
