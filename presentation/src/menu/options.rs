//! Menu item labels and input validation

use arena_application::ModelAvailability;
use arena_domain::{DebateKind, Persona};

/// Upper bound offered for political formats
pub const MAX_TURNS: usize = 20;
/// Upper bound offered for rap battles
pub const MAX_ROUNDS: usize = 10;
/// Label of the free-text entry in the battle topic list
pub const CUSTOM_TOPIC: &str = "✏️  Enter my own topic";

/// Debate type entries followed by Exit
pub fn kind_items() -> Vec<String> {
    DebateKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.icon(), kind.display_name()))
        .chain(std::iter::once("🚪 Exit".to_string()))
        .collect()
}

/// Index-aligned kind for a selection, `None` for Exit
pub fn kind_at(index: usize) -> Option<DebateKind> {
    DebateKind::ALL.get(index).copied()
}

/// Suggested battle topics followed by the custom entry
pub fn topic_items(suggestions: &[&str]) -> Vec<String> {
    suggestions
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(CUSTOM_TOPIC.to_string()))
        .collect()
}

/// Model entries, marking those whose key is missing
pub fn model_items(models: &[ModelAvailability]) -> Vec<String> {
    models
        .iter()
        .map(|m| match &m.missing_env {
            None => format!("{} ({})", m.spec.display_name, m.spec.provider.display_name()),
            Some(env) => format!(
                "{} ({}) - unavailable, set {}",
                m.spec.display_name,
                m.spec.provider.display_name(),
                env
            ),
        })
        .collect()
}

/// Default cursor position: the preferred key if usable, else the first
/// usable entry
pub fn default_model_index(models: &[ModelAvailability], preferred: Option<&str>) -> Option<usize> {
    preferred
        .and_then(|key| {
            models
                .iter()
                .position(|m| m.is_available() && m.spec.key == key)
        })
        .or_else(|| models.iter().position(ModelAvailability::is_available))
}

pub fn persona_items(personas: &[Persona]) -> Vec<String> {
    personas
        .iter()
        .map(|p| {
            if p.description.is_empty() {
                p.label()
            } else {
                format!("{} - {}", p.label(), p.description)
            }
        })
        .collect()
}

/// Range check for the turn or round prompt
pub fn validate_count(value: usize, max: usize) -> Result<(), String> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("Enter a number between 1 and {}", max))
    }
}

pub fn validate_topic(topic: &str) -> Result<(), &'static str> {
    if topic.trim().is_empty() {
        Err("The topic cannot be empty")
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::{ModelSpec, Provider};

    fn entry(key: &str, provider: Provider, missing: Option<&str>) -> ModelAvailability {
        ModelAvailability {
            spec: ModelSpec::new(key, key.to_uppercase(), key, provider),
            missing_env: missing.map(str::to_string),
        }
    }

    #[test]
    fn test_kind_items_end_with_exit() {
        let items = kind_items();
        assert_eq!(items.len(), DebateKind::ALL.len() + 1);
        assert_eq!(items.last().unwrap(), "🚪 Exit");
        assert_eq!(kind_at(0), Some(DebateKind::ALL[0]));
        assert_eq!(kind_at(items.len() - 1), None);
    }

    #[test]
    fn test_model_items_mark_missing_keys() {
        let models = [
            entry("gpt", Provider::OpenAi, Some("OPENAI_API_KEY")),
            entry("llama", Provider::Ollama, None),
        ];
        let items = model_items(&models);
        assert_eq!(items[0], "GPT (OpenAI) - unavailable, set OPENAI_API_KEY");
        assert_eq!(items[1], "LLAMA (Ollama)");
    }

    #[test]
    fn test_default_model_index() {
        let models = [
            entry("gpt", Provider::OpenAi, Some("OPENAI_API_KEY")),
            entry("claude", Provider::Anthropic, None),
            entry("gemini", Provider::Google, None),
        ];
        assert_eq!(default_model_index(&models, None), Some(1));
        assert_eq!(default_model_index(&models, Some("gemini")), Some(2));
        // A preferred model without a key falls back to the first usable one
        assert_eq!(default_model_index(&models, Some("gpt")), Some(1));
        assert_eq!(default_model_index(&models[..1], None), None);
    }

    #[test]
    fn test_topic_items() {
        let items = topic_items(&["East vs West"]);
        assert_eq!(items, ["East vs West", CUSTOM_TOPIC]);
    }

    #[test]
    fn test_validation() {
        assert!(validate_count(0, MAX_TURNS).is_err());
        assert!(validate_count(1, MAX_TURNS).is_ok());
        assert!(validate_count(MAX_TURNS + 1, MAX_TURNS).is_err());
        assert!(validate_topic("   ").is_err());
        assert!(validate_topic("Tariffs").is_ok());
    }
}
