//! Interactive debate setup
//!
//! Walks the user through type, topic, personas, models, length, judge
//! and tools, and returns a validated [`DebateConfig`]. Any step returning
//! `None` means the user backed out and the setup is abandoned.

pub mod options;

use crate::config::SessionDefaults;
use crate::output::console::ConsoleFormatter;
use arena_application::{ModelAvailability, ModelSelector};
use arena_domain::persona::battle_topic_suggestions;
use arena_domain::{DebateConfig, DebateKind, ModelSpec, Participant, Persona};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use options::{
    MAX_ROUNDS, MAX_TURNS, default_model_index, kind_at, kind_items, model_items, persona_items,
    topic_items, validate_count, validate_topic,
};

/// Prompts for one debate setup
pub struct SetupMenu<'a> {
    selector: &'a ModelSelector,
    defaults: &'a SessionDefaults,
}

impl<'a> SetupMenu<'a> {
    pub fn new(selector: &'a ModelSelector, defaults: &'a SessionDefaults) -> Self {
        Self { selector, defaults }
    }

    /// Debate type, or `None` for Exit
    pub fn choose_kind(&self) -> dialoguer::Result<Option<DebateKind>> {
        let items = kind_items();
        let selection = Select::new()
            .with_prompt("Choose a debate type")
            .items(&items)
            .default(0)
            .interact_opt()?;
        Ok(selection.and_then(kind_at))
    }

    /// Remaining setup steps for `kind`, ending with confirmation
    pub fn configure(&self, kind: DebateKind) -> dialoguer::Result<Option<DebateConfig>> {
        let topic = self.choose_topic(kind)?;
        let Some((first, second)) = self.choose_personas(kind)? else {
            return Ok(None);
        };

        let models = self.selector.availability();
        if default_model_index(&models, None).is_none() {
            println!(
                "{}",
                ConsoleFormatter::error("No models are available; set at least one provider API key")
            );
            return Ok(None);
        }
        let Some(first_model) = self.choose_model(&models, &format!("Model for {}", first.label()), None)?
        else {
            return Ok(None);
        };
        let Some(second_model) = self.choose_model(
            &models,
            &format!("Model for {}", second.label()),
            Some(first_model.key.as_str()),
        )?
        else {
            return Ok(None);
        };

        let builder = DebateConfig::builder(kind, topic).participants(
            Participant::new(first, first_model),
            Participant::new(second, second_model),
        );
        let builder = if kind.is_rap_battle() {
            builder.rounds(self.choose_count("Number of rounds", self.defaults.rap_rounds, MAX_ROUNDS)?)
        } else {
            let default = if kind == DebateKind::PoliticalDebate {
                self.defaults.max_turns
            } else {
                kind.default_max_turns()
            };
            builder.max_turns(self.choose_count("Maximum turns", default, MAX_TURNS)?)
        };

        let judge = if Confirm::new()
            .with_prompt("Enable the judge?")
            .default(self.defaults.judge_enabled)
            .interact()?
        {
            let preferred = self.defaults.judge_model.as_deref();
            match self.choose_model(&models, "Judge model", preferred)? {
                Some(model) => Some(model),
                None => return Ok(None),
            }
        } else {
            None
        };

        let tools = self.defaults.tools_available
            && Confirm::new()
                .with_prompt("Allow web search during the debate?")
                .default(self.defaults.tools_enabled)
                .interact()?;

        let config = match builder.judge(judge).tools(tools).build() {
            Ok(config) => config,
            Err(e) => {
                println!("{}", ConsoleFormatter::error(&e.to_string()));
                return Ok(None);
            }
        };

        println!("{}", ConsoleFormatter::setup_summary(&config));
        let start = Confirm::new()
            .with_prompt("Start the debate?")
            .default(true)
            .interact()?;
        Ok(start.then_some(config))
    }

    fn choose_topic(&self, kind: DebateKind) -> dialoguer::Result<String> {
        if kind.is_rap_battle() {
            let suggestions = battle_topic_suggestions();
            let items = topic_items(suggestions);
            let index = Select::new()
                .with_prompt("Battle topic")
                .items(&items)
                .default(0)
                .interact()?;
            if let Some(topic) = suggestions.get(index) {
                return Ok(topic.to_string());
            }
        }
        let topic: String = Input::new()
            .with_prompt("Debate topic")
            .validate_with(|input: &String| validate_topic(input))
            .interact_text()?;
        Ok(topic.trim().to_string())
    }

    fn choose_personas(&self, kind: DebateKind) -> dialoguer::Result<Option<(Persona, Persona)>> {
        if !kind.is_rap_battle() {
            let mut sides = (Persona::progressive(), Persona::conservative());
            if Confirm::new()
                .with_prompt("Customize the persona prompts?")
                .default(false)
                .interact()?
            {
                sides.0 = Self::custom_prompt(sides.0)?;
                sides.1 = Self::custom_prompt(sides.1)?;
            }
            return Ok(Some(sides));
        }

        let mut roster = Persona::rapper_roster();
        let Some(first) = Select::new()
            .with_prompt("First rapper")
            .items(&persona_items(&roster))
            .default(0)
            .interact_opt()?
        else {
            return Ok(None);
        };
        let first = roster.remove(first);
        let Some(second) = Select::new()
            .with_prompt("Second rapper")
            .items(&persona_items(&roster))
            .default(0)
            .interact_opt()?
        else {
            return Ok(None);
        };
        Ok(Some((first, roster.remove(second))))
    }

    fn custom_prompt(persona: Persona) -> dialoguer::Result<Persona> {
        let prompt: String = Input::new()
            .with_prompt(format!("System prompt for {} (empty keeps the default)", persona.label()))
            .allow_empty(true)
            .interact_text()?;
        let prompt = prompt.trim();
        Ok(if prompt.is_empty() {
            persona
        } else {
            persona.with_prompt(prompt)
        })
    }

    /// Pick a model; entries without a key are shown but re-prompted
    fn choose_model(
        &self,
        models: &[ModelAvailability],
        prompt: &str,
        preferred: Option<&str>,
    ) -> dialoguer::Result<Option<ModelSpec>> {
        let items = model_items(models);
        let mut cursor = default_model_index(models, preferred).unwrap_or(0);
        loop {
            let Some(index) = Select::new()
                .with_prompt(prompt)
                .items(&items)
                .default(cursor)
                .interact_opt()?
            else {
                return Ok(None);
            };
            match models.get(index) {
                Some(ModelAvailability {
                    spec,
                    missing_env: None,
                }) => return Ok(Some(spec.clone())),
                Some(ModelAvailability {
                    spec,
                    missing_env: Some(env),
                }) => {
                    println!(
                        "{} {} needs {} to be set",
                        "!".yellow(),
                        spec.display_name,
                        env.bold()
                    );
                    cursor = index;
                }
                None => return Ok(None),
            }
        }
    }

    fn choose_count(&self, prompt: &str, default: usize, max: usize) -> dialoguer::Result<usize> {
        Input::new()
            .with_prompt(prompt)
            .default(default.clamp(1, max))
            .validate_with(|n: &usize| validate_count(*n, max))
            .interact_text()
    }
}
