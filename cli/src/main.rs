//! CLI entrypoint for sleepvote
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use sleepvote_application::{VoteCoordinator, VoteCoordinatorDeps};
use sleepvote_infrastructure::{ConfigLoader, FileVoteSettings, InMemoryWorlds, TokioScheduler};
use sleepvote_presentation::{Cli, ConsoleNotifier, Messages, SimulatorRepl};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&cli);

    info!("Starting sleepvote");

    // Load configuration
    let (config, persist_path) = if cli.no_config {
        (ConfigLoader::load_defaults(), None)
    } else {
        let config = ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("Failed to load configuration")?;
        (config, ConfigLoader::persist_path(cli.config.as_deref()))
    };

    let lang_dir = ConfigLoader::global_config_path()
        .and_then(|path| path.parent().map(|dir| dir.join("lang")));
    let messages = Arc::new(Messages::load(&config.language, lang_dir.as_deref()));

    // === Dependency Injection ===
    let settings = Arc::new(FileVoteSettings::new(config, persist_path));
    let worlds = Arc::new(InMemoryWorlds::with_default_worlds());
    let notifier = Arc::new(ConsoleNotifier::new(
        Arc::clone(&worlds),
        Arc::clone(&messages),
    ));
    let scheduler = Arc::new(
        TokioScheduler::current().context("Scheduler requires a Tokio runtime")?,
    );

    let coordinator = VoteCoordinator::new(VoteCoordinatorDeps {
        eligibility: worlds.clone(),
        registry: worlds.clone(),
        scheduler,
        settings: settings.clone(),
        notifier: notifier.clone(),
    });

    let repl = SimulatorRepl::new(worlds, coordinator, settings, notifier, messages)
        .with_json_status(cli.json);

    match &cli.script {
        Some(path) => {
            let script = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            repl.run_script(&script).await;
        }
        None => repl.run().await?,
    }

    Ok(())
}

/// Initialize logging based on verbosity level, optionally teeing to a daily file
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "sleepvote.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(console)
        .with(file)
        .init();

    guard
}
