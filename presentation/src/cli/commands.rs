//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for debate-arena
#[derive(Parser, Debug)]
#[command(name = "debate-arena")]
#[command(author, version, about = "Debate Arena - LLM personas debate while an LLM judge keeps score")]
#[command(long_about = r#"
Debate Arena pits two LLM-backed personas against each other in a
political debate, a policy discussion or a rap battle. An optional judge
model scores every turn and declares a winner.

The arena is menu driven: pick a debate type, a topic, the personas and
the models voicing them, then watch the debate stream in.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./debate-arena.toml Project-level config
3. ~/.config/debate-arena/config.toml   Global config

API keys are read from the environment (OPENAI_API_KEY, ANTHROPIC_API_KEY,
GOOGLE_API_KEY, GROQ_API_KEY, DEEPSEEK_API_KEY, OPENROUTER_API_KEY).
Models whose key is missing are listed but cannot be selected.

Example:
  debate-arena
  debate-arena -o transcripts --log-dir logs
  debate-arena --no-config -vv
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and most logging
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Directory for exported transcripts (overrides [output] dir)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for JSONL conversation logs (overrides [output] log_dir)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Log filter directive derived from `-q` and `-v`
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
