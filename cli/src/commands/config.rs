// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `hearth config` - show, validate, and generate node configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use hearth_orchestrator_core::domain::config::OrchestratorConfigManifest;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the active configuration
    Show,

    /// Validate the configuration and report what it wires up
    Validate,

    /// Print a starter configuration manifest
    Generate,
}

impl ConfigCommand {
    pub fn execute(
        self,
        config: OrchestratorConfigManifest,
        path: Option<&PathBuf>,
    ) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                print!(
                    "{}",
                    serde_yaml::to_string(&config).context("failed to render configuration")?
                );
                Ok(())
            }
            ConfigCommand::Validate => {
                config.validate()?;

                let source = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "discovered defaults".to_string());
                println!("{} configuration valid ({source})", "✓".green());

                let spec = &config.spec;
                println!(
                    "  providers: {}  iteration budget: {}  planner model: {}",
                    spec.llm_providers.len(),
                    spec.orchestration.max_iterations,
                    spec.orchestration.planner_model,
                );
                if spec.llm_providers.iter().all(|p| !p.enabled) {
                    println!(
                        "{} no enabled LLM providers - runs will fail at planning",
                        "!".yellow()
                    );
                }
                if spec.workers.enabled.is_empty() {
                    println!("  workers: all built-in");
                } else {
                    println!("  workers: {}", spec.workers.enabled.join(", "));
                }
                Ok(())
            }
            ConfigCommand::Generate => {
                print!(
                    "{}",
                    serde_yaml::to_string(&OrchestratorConfigManifest::development())
                        .context("failed to render configuration")?
                );
                Ok(())
            }
        }
    }
}
