//! CLI entrypoint for debate-arena
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use arena_application::{CredentialSource, ModelSelector, RunDebateUseCase};
use arena_domain::ModelCatalog;
use arena_infrastructure::{
    ConfigLoader, EnvCredentials, FileConfig, JsonlConversationLogger, MarkdownExporter,
    ProviderFactory, ProvidersConfig, RoutingGateway, WebSearchExecutor,
};
use arena_presentation::{ArenaSession, Cli, ConsoleFormatter, SessionDefaults};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    let log_dir = cli.log_dir.clone().or_else(|| config.output.log_dir.clone());
    let _guard = init_tracing(&cli, log_dir.as_deref())?;
    info!("Starting debate-arena");

    if !config.output.color {
        ConsoleFormatter::set_color(false);
    }

    // === Dependency Injection ===
    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials);
    let providers = ProvidersConfig::from_sources(&config.providers, credentials.as_ref());

    let selector = providers.env_overrides().into_iter().fold(
        ModelSelector::new(ModelCatalog::builtin(), credentials.clone()),
        |selector, (provider, env_var)| selector.with_env_override(provider, env_var),
    );
    for (provider, env_var) in selector.missing_credentials() {
        info!("{} models disabled: {} is not set", provider.display_name(), env_var);
    }

    let factory = ProviderFactory::new(providers, credentials)
        .context("Failed to initialize provider clients")?;
    let gateway = Arc::new(RoutingGateway::new(factory));

    let mut use_case = RunDebateUseCase::new(gateway);
    let tools_available = match WebSearchExecutor::new() {
        Ok(executor) => {
            use_case = use_case.with_tools(Arc::new(executor));
            true
        }
        Err(e) => {
            warn!("Web search disabled: {}", e);
            false
        }
    };
    if let Some(dir) = &log_dir
        && let Some(logger) = JsonlConversationLogger::in_dir(dir)
    {
        info!("Conversation log: {}", logger.path().display());
        use_case = use_case.with_logger(Arc::new(logger));
    }

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.dir.clone());
    let exporter = Arc::new(MarkdownExporter::new(output_dir));

    let mut session = ArenaSession::new(use_case, selector, exporter)
        .with_defaults(session_defaults(&config, &cli, tools_available));
    session.run().await.context("Interactive session failed")?;

    Ok(())
}

/// Menu defaults from `[debate]` and `[output]`
fn session_defaults(config: &FileConfig, cli: &Cli, tools_available: bool) -> SessionDefaults {
    SessionDefaults {
        max_turns: config.debate.default_max_turns,
        rap_rounds: config.debate.default_rap_rounds,
        judge_enabled: config.debate.judge_enabled,
        judge_model: config.debate.judge_model.clone(),
        tools_enabled: config.debate.tools_enabled && tools_available,
        tools_available,
        show_progress: !cli.quiet,
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `-v`; `--quiet` forces `error`. With a log
/// directory, events are also written to `debate-arena.log` there.
fn init_tracing(cli: &Cli, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix("debate-arena")
                .filename_suffix("log")
                .build(dir)
                .with_context(|| format!("Failed to open log file in {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
