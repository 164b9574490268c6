// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `hearth run` - execute one orchestration run and print the terminal
//! blackboard.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use hearth_orchestrator_core::application::{OrchestrationService, WorkerRegistry};
use hearth_orchestrator_core::domain::blackboard::Status;
use hearth_orchestrator_core::domain::config::OrchestratorConfigManifest;
use hearth_orchestrator_core::domain::events::RunEvent;
use hearth_orchestrator_core::domain::run::RunError;
use hearth_orchestrator_core::infrastructure::workers;
use hearth_orchestrator_core::infrastructure::{EventBus, LlmPlanner};

use super::build_provider;

#[derive(Args)]
pub struct RunCommand {
    /// The request to orchestrate
    pub query: String,

    /// Requester identity prefixed onto the request text
    #[arg(long, default_value = "user")]
    pub owner: String,

    /// Suppress per-iteration progress output
    #[arg(long)]
    pub quiet: bool,
}

impl RunCommand {
    pub async fn execute(self, config: OrchestratorConfigManifest) -> Result<()> {
        let spec = &config.spec;

        let provider = build_provider(&config)?;
        let planner = Arc::new(LlmPlanner::new(provider.clone()));

        let mut registry = WorkerRegistry::new();
        for worker in workers::builtin(provider, &spec.workers.enabled) {
            registry.register(worker);
        }

        let event_bus = Arc::new(EventBus::new(spec.orchestration.event_capacity));

        let progress = if self.quiet {
            None
        } else {
            let mut events = event_bus.subscribe();
            Some(tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    if let RunEvent::IterationCompleted {
                        iteration,
                        blackboard,
                        ..
                    } = event
                    {
                        let open = blackboard.plan.pending_steps().count();
                        eprintln!(
                            "{} iteration {iteration}: plan {} with {open} open step(s)",
                            "•".cyan(),
                            blackboard.plan.status,
                        );
                    }
                }
            }))
        };

        let service = OrchestrationService::new(
            planner,
            Arc::new(registry),
            event_bus.clone(),
            spec.orchestration.max_iterations,
        );

        let result = service.run(&self.query, &self.owner).await;

        // Release every event-bus handle so the progress task sees the
        // channel close.
        drop(service);
        drop(event_bus);
        if let Some(progress) = progress {
            let _ = progress.await;
        }

        let blackboard = match result {
            Ok(blackboard) => blackboard,
            Err(RunError::Validation(message)) => anyhow::bail!("invalid request: {message}"),
            Err(e) => return Err(e).context("orchestration run failed"),
        };

        if blackboard.plan.status == Status::Completed {
            if let Some(summary) = blackboard.history.steps.last() {
                eprintln!("{} {}", "✓".green(), summary.description);
            }
        } else {
            eprintln!(
                "{} iteration budget exhausted before the plan converged",
                "!".yellow()
            );
        }

        println!(
            "{}",
            serde_json::to_string_pretty(&blackboard).context("failed to render blackboard")?
        );
        Ok(())
    }
}
