// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the HEARTH CLI

pub mod config;
pub mod run;
pub mod workers;

pub use self::config::ConfigCommand;
pub use self::run::RunCommand;
pub use self::workers::WorkersCommand;

use std::sync::Arc;

use anyhow::{Context, Result};

use hearth_orchestrator_core::domain::config::OrchestratorConfigManifest;
use hearth_orchestrator_core::domain::llm::LLMProvider;
use hearth_orchestrator_core::infrastructure::llm::{AliasedProvider, ProviderRegistry};

/// Build the planner-model provider from configuration: registry first,
/// then the configured alias bound to it (which carries retry and fallback
/// behavior along).
pub(crate) fn build_provider(
    config: &OrchestratorConfigManifest,
) -> Result<Arc<dyn LLMProvider>> {
    let registry = Arc::new(
        ProviderRegistry::from_config(&config.spec)
            .context("failed to initialize LLM providers")?,
    );
    Ok(Arc::new(AliasedProvider::new(
        registry,
        config.spec.orchestration.planner_model.as_str(),
    )))
}
