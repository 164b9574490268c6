// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # HEARTH Orchestrator CLI
//!
//! The `hearth` binary runs home-orchestration requests against the
//! configured LLM providers and device workers, and inspects the node
//! configuration.
//!
//! ## Commands
//!
//! - `hearth run "<query>" [--owner <owner>]` - Execute one orchestration run
//! - `hearth workers list` - Show registered workers and their tools
//! - `hearth config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

mod commands;

use commands::{ConfigCommand, RunCommand, WorkersCommand};
use hearth_orchestrator_core::domain::config::OrchestratorConfigManifest;

/// HEARTH Orchestrator - home automation through coordinated agents
#[derive(Parser)]
#[command(name = "hearth")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "HEARTH_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "HEARTH_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one orchestration run
    #[command(name = "run")]
    Run(RunCommand),

    /// Worker inspection
    #[command(name = "workers")]
    Workers {
        #[command(subcommand)]
        command: WorkersCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration discovery: explicit path, then ./hearth-config.yaml, then
/// the built-in development default.
fn load_config(path: Option<&PathBuf>) -> Result<OrchestratorConfigManifest> {
    if let Some(path) = path {
        return OrchestratorConfigManifest::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }

    let local = PathBuf::from("hearth-config.yaml");
    if local.exists() {
        return OrchestratorConfigManifest::load(&local)
            .context("failed to load ./hearth-config.yaml");
    }

    info!("no configuration found, using built-in development defaults");
    Ok(OrchestratorConfigManifest::development())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads environment variables (API keys use
    // the env: indirection in config).
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run(command) => command.execute(config).await,
        Commands::Workers { command } => command.execute(config).await,
        Commands::Config { command } => command.execute(config, cli.config.as_ref()),
    }
}
