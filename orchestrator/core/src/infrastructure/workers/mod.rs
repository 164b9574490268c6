// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Device Workers
//!
//! Each built-in worker fronts one smart-home device or information API
//! with a fixed table of named, typed-argument tools. Resolution of a
//! pending step is a two-round exchange with the LLM: a tool-selection
//! round (which tools, which arguments), then a blackboard-update round
//! that folds the observed tool results into completed steps and history
//! entries.
//!
//! The tool backends here are canned fixtures; a production deployment
//! swaps the handlers for real device calls without touching the worker
//! protocol. Device I/O is treated as idempotent-enough to retry: a step a
//! worker fails to resolve stays pending and is simply redispatched on the
//! next iteration.

pub mod calendar;
pub mod email;
pub mod light;
pub mod news;
pub mod room_temperature;
pub mod shopping;
pub mod stove;
pub mod water_tank;
pub mod weather;
pub mod window;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::blackboard::{Blackboard, Step};
use crate::domain::llm::{GenerationOptions, LLMProvider};
use crate::domain::run::RunContext;
use crate::domain::worker::{ToolSpec, Worker, WorkerError};
use crate::infrastructure::extract_json_object;

/// Canned (or device-backed) function behind one tool.
pub type ToolHandler = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// A tool: its advertised spec plus the handler that executes it.
pub struct Tool {
    pub spec: ToolSpec,
    handler: ToolHandler,
}

impl Tool {
    pub fn new(
        name: &str,
        description: &str,
        parameters: Value,
        handler: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            spec: ToolSpec {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
            handler: Arc::new(handler),
        }
    }
}

/// One tool invocation requested by the model.
#[derive(Debug, Deserialize)]
struct ToolCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ToolPlan {
    #[serde(default)]
    calls: Vec<ToolCall>,
}

/// A tool invocation and what it returned, fed back to the model.
#[derive(Debug, Serialize)]
struct ToolOutcome {
    name: String,
    arguments: Value,
    result: Value,
}

/// Worker over a fixed tool table, resolving steps through the LLM.
pub struct DeviceWorker {
    id: String,
    description: String,
    tools: Vec<Tool>,
    specs: Vec<ToolSpec>,
    provider: Arc<dyn LLMProvider>,
    options: GenerationOptions,
}

impl DeviceWorker {
    pub fn new(
        id: &str,
        description: &str,
        tools: Vec<Tool>,
        provider: Arc<dyn LLMProvider>,
    ) -> Self {
        let specs = tools.iter().map(|t| t.spec.clone()).collect();
        Self {
            id: id.to_string(),
            description: description.to_string(),
            tools,
            specs,
            provider,
            options: GenerationOptions::default(),
        }
    }

    fn tool_selection_prompt(&self, pending: &[Step]) -> Result<String, WorkerError> {
        let tools = serde_json::to_string_pretty(&self.specs)
            .map_err(|e| WorkerError::MalformedToolPlan(e.to_string()))?;
        let pending = serde_json::to_string_pretty(pending)
            .map_err(|e| WorkerError::MalformedToolPlan(e.to_string()))?;
        Ok(format!(
            "You are the \"{id}\" worker of a home orchestration system. {description}\n\n\
             Your tools:\n{tools}\n\n\
             Pending actions assigned to you:\n{pending}\n\n\
             Pick the tool invocations needed to carry out the pending actions. \
             Use only the tools listed, with only their declared arguments. \
             DO NOT ADD ANY PARAMETERS OTHER THAN THE REQUIRED ONES.\n\
             Reply ONLY with JSON of the shape:\n\
             {{\"calls\": [{{\"name\": \"tool_name\", \"arguments\": {{}}}}]}}\n\
             Reply with an empty calls list if no tool applies.",
            id = self.id,
            description = self.description,
        ))
    }

    fn update_prompt(
        &self,
        blackboard: &Blackboard,
        outcomes: &[ToolOutcome],
    ) -> Result<String, WorkerError> {
        let blackboard = serde_json::to_string_pretty(blackboard)
            .map_err(|e| WorkerError::MalformedBlackboard(e.to_string()))?;
        let outcomes = serde_json::to_string_pretty(outcomes)
            .map_err(|e| WorkerError::MalformedBlackboard(e.to_string()))?;
        Ok(format!(
            "You are the \"{id}\" worker of a home orchestration system. {description}\n\n\
             The blackboard is:\n{blackboard}\n\n\
             Your tool invocations and their observed results:\n{outcomes}\n\n\
             Update the blackboard: mark the pending steps assigned to you \
             \"completed\" (or \"failed\" if a result shows the action failed), and \
             append one history entry per action, carrying the observed result in \
             its description. Touch only your own steps. DO NOT modify existing \
             history entries; only append yours.\n\
             Return ONLY the updated blackboard as JSON with this exact shape:\n{schema}",
            id = self.id,
            description = self.description,
            schema = Blackboard::schema(),
        ))
    }

    fn parse_tool_plan(text: &str) -> Result<ToolPlan, WorkerError> {
        let candidate = extract_json_object(text)
            .ok_or_else(|| WorkerError::MalformedToolPlan("no JSON object in reply".into()))?;
        serde_json::from_str(candidate).map_err(|e| WorkerError::MalformedToolPlan(e.to_string()))
    }

    fn parse_blackboard(text: &str) -> Result<Blackboard, WorkerError> {
        let candidate = extract_json_object(text)
            .ok_or_else(|| WorkerError::MalformedBlackboard("no JSON object in reply".into()))?;
        serde_json::from_str(candidate)
            .map_err(|e| WorkerError::MalformedBlackboard(e.to_string()))
    }
}

#[async_trait]
impl Worker for DeviceWorker {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tools(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(
        &self,
        blackboard: Blackboard,
        ctx: &RunContext,
    ) -> Result<Blackboard, WorkerError> {
        let pending: Vec<Step> = blackboard
            .plan
            .steps
            .iter()
            .filter(|s| s.is_pending() && s.owner == self.id)
            .cloned()
            .collect();

        if pending.is_empty() {
            debug!(run_id = %ctx.run_id, worker = %self.id, "no pending actions");
            return Ok(blackboard);
        }

        // Round one: which tools, which arguments.
        let selection = self
            .provider
            .generate(&self.tool_selection_prompt(&pending)?, &self.options)
            .await?;
        let plan = Self::parse_tool_plan(&selection.text)?;

        let mut outcomes = Vec::with_capacity(plan.calls.len());
        for call in plan.calls {
            let tool = self
                .tools
                .iter()
                .find(|t| t.spec.name == call.name)
                .ok_or_else(|| WorkerError::UnknownTool(call.name.clone()))?;

            let result = (tool.handler)(&call.arguments).map_err(|message| {
                WorkerError::ToolFailed {
                    name: call.name.clone(),
                    message,
                }
            })?;

            info!(
                run_id = %ctx.run_id,
                worker = %self.id,
                tool = %call.name,
                "tool invoked"
            );
            outcomes.push(ToolOutcome {
                name: call.name,
                arguments: call.arguments,
                result,
            });
        }

        // Round two: fold the observed results back into the blackboard.
        let update = self
            .provider
            .generate(&self.update_prompt(&blackboard, &outcomes)?, &self.options)
            .await?;
        Self::parse_blackboard(&update.text)
    }
}

/// All built-in device workers, in the canonical registration order,
/// filtered by the node's enablement list (empty list means all).
pub fn builtin(
    provider: Arc<dyn LLMProvider>,
    enabled: &[String],
) -> Vec<Arc<dyn Worker>> {
    let all: Vec<Arc<dyn Worker>> = vec![
        Arc::new(window::worker(provider.clone())),
        Arc::new(light::worker(provider.clone())),
        Arc::new(stove::worker(provider.clone())),
        Arc::new(water_tank::worker(provider.clone())),
        Arc::new(weather::worker(provider.clone())),
        Arc::new(news::worker(provider.clone())),
        Arc::new(calendar::worker(provider.clone())),
        Arc::new(email::worker(provider.clone())),
        Arc::new(shopping::worker(provider.clone())),
        Arc::new(room_temperature::worker(provider)),
    ];

    all.into_iter()
        .filter(|w| enabled.is_empty() || enabled.iter().any(|e| e == w.id()))
        .collect()
}
