// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `hearth workers` - inspect the workers this node would register.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use hearth_orchestrator_core::domain::config::OrchestratorConfigManifest;
use hearth_orchestrator_core::infrastructure::workers;

use super::build_provider;

#[derive(Subcommand)]
pub enum WorkersCommand {
    /// List registered workers and their tool surfaces
    List,
}

impl WorkersCommand {
    pub async fn execute(self, config: OrchestratorConfigManifest) -> Result<()> {
        match self {
            WorkersCommand::List => {
                let provider = build_provider(&config)?;
                let registered = workers::builtin(provider, &config.spec.workers.enabled);

                if registered.is_empty() {
                    println!("{}", "no workers enabled".yellow());
                    return Ok(());
                }

                for worker in registered {
                    println!("{}  {}", worker.id().bold(), worker.description());
                    for tool in worker.tools() {
                        println!("    {}  {}", tool.name.cyan(), tool.description);
                    }
                }
                Ok(())
            }
        }
    }
}
