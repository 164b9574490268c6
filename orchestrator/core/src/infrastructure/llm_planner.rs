// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! LLM-backed Planning Port
//!
//! Adapts an [`LLMProvider`] to the [`Planner`] contract. Two personas sit
//! behind the one port: the seed persona turns the raw request into the
//! first plan, the replan persona re-evaluates the blackboard after each
//! dispatch round and either queues follow-up steps or closes the run out
//! with a user-facing summary.
//!
//! The reply contract is structural, not conversational: the model is
//! instructed with the blackboard's textual schema and must return exactly
//! that JSON shape. Anything that does not parse is a protocol failure:
//! fatal for the run, with no partial acceptance.

use std::sync::Arc;

use async_trait::async_trait;
use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use crate::domain::blackboard::Blackboard;
use crate::domain::llm::{GenerationOptions, LLMProvider};
use crate::domain::planner::{Planner, PlannerError, PlanningPass};
use crate::domain::run::RunContext;
use crate::infrastructure::extract_json_object;

const SEED_PROMPT: &str = "\
You are the planning component of a home orchestration system. You turn a \
user or IoT device request into a plan of worker invocations (it will be \
explicitly stated when the request comes from an IoT device).

Available workers:
{{{workers}}}

Request:
{{{request}}}

Rules:
1. Analyze the request and pick the minimal set of workers needed to fulfill it.
2. Break a multi-step request into a clear, ordered sequence of steps, each \
assigned to exactly one worker, each with status \"pending\".
3. A simple factual question that needs no device or data access gets no \
worker steps at all: answer it directly in a single completed history entry \
and mark the plan completed.
4. A request originating from an IoT device gets a flow tailored to the \
device context (e.g. \"Weather API: rainy this evening\" means check the \
windows and warn the user).
5. Record a history entry explaining which workers you chose and why.
6. Invoke only workers that are strictly necessary.

Current blackboard:
{{{blackboard}}}

Return ONLY the updated blackboard as JSON with this exact shape:
{{{schema}}}
";

const REPLAN_PROMPT: &str = "\
You are the orchestration component of a home orchestration system. Workers \
have just executed part of the plan; the blackboard history records what \
they observed. Decide whether further action is needed.

Available workers:
{{{workers}}}

Request:
{{{request}}}

Current blackboard:
{{{blackboard}}}

Rules:
1. If a result demands follow-up, add pending steps for it: windows found \
open must be closed, lights found on must be turned off, a low water tank \
means ordering water. Keep adding steps until nothing necessary remains.
2. If the plan is not finished, rewrite the plan accordingly and append a \
pending \"orchestration\" entry to the history.
3. If everything is done, append a completed \"orchestration\" history entry \
whose description is a warm, conversational summary of the outcome for the \
user - what happened and the results, never your internal reasoning - and \
set its status to \"completed\". IT IS CRITICAL TO USE THE STATUS \
\"completed\" WHEN THE PLAN IS COMPLETE.
4. NEVER modify or delete existing history entries. Only append new ones.

Return ONLY the updated blackboard as JSON with this exact shape:
{{{schema}}}
";

/// Planning Port adapter over an LLM provider.
pub struct LlmPlanner {
    provider: Arc<dyn LLMProvider>,
    options: GenerationOptions,
    templates: Handlebars<'static>,
}

impl LlmPlanner {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider,
            options: GenerationOptions::default(),
            templates: Handlebars::new(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    fn render_prompt(
        &self,
        template: &str,
        blackboard: &Blackboard,
        ctx: &RunContext,
    ) -> Result<String, PlannerError> {
        let data = json!({
            "request": ctx.request,
            "workers": serde_json::to_string_pretty(&ctx.workers)
                .map_err(|e| PlannerError::Template(e.to_string()))?,
            "blackboard": serde_json::to_string_pretty(blackboard)
                .map_err(|e| PlannerError::Template(e.to_string()))?,
            "schema": Blackboard::schema(),
        });
        self.templates
            .render_template(template, &data)
            .map_err(|e| PlannerError::Template(e.to_string()))
    }

    /// Parse a model reply into a blackboard, tolerating code fences and
    /// prose around the JSON object.
    fn parse_blackboard(text: &str) -> Result<Blackboard, PlannerError> {
        let candidate = extract_json_object(text)
            .ok_or_else(|| PlannerError::MalformedBlackboard("no JSON object in reply".into()))?;
        serde_json::from_str(candidate)
            .map_err(|e| PlannerError::MalformedBlackboard(e.to_string()))
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(
        &self,
        blackboard: Blackboard,
        ctx: &RunContext,
        pass: PlanningPass,
    ) -> Result<Blackboard, PlannerError> {
        let template = match pass {
            PlanningPass::Seed => SEED_PROMPT,
            PlanningPass::Replan => REPLAN_PROMPT,
        };

        let prompt = self.render_prompt(template, &blackboard, ctx)?;
        debug!(run_id = %ctx.run_id, pass = ?pass, "invoking planning model");

        let response = self.provider.generate(&prompt, &self.options).await?;
        Self::parse_blackboard(&response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blackboard::Status;
    use crate::domain::llm::{FinishReason, GenerationResponse, LLMError, TokenUsage};
    use crate::domain::run::RunId;
    use crate::domain::worker::WorkerDescriptor;
    use std::sync::Mutex;

    /// Records the prompt it was given and replies with a canned text.
    struct FixtureProvider {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FixtureProvider {
        fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for FixtureProvider {
        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<GenerationResponse, LLMError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(GenerationResponse {
                text: self.reply.clone(),
                usage: TokenUsage::default(),
                provider: "fixture".into(),
                model: "fixture".into(),
                finish_reason: FinishReason::Stop,
            })
        }

        async fn health_check(&self) -> Result<(), LLMError> {
            Ok(())
        }
    }

    fn ctx() -> RunContext {
        RunContext::new(
            RunId::new(),
            "user: check the windows",
            vec![WorkerDescriptor {
                name: "window".into(),
                description: "Reports and controls the window IoT devices.".into(),
            }],
            5,
        )
    }

    const WINDOW_PLAN: &str = r#"{
        "plan": {
            "steps": [{"agent": "window", "description": "Check all windows", "status": "pending"}],
            "status": "pending"
        },
        "history": {
            "steps": [{"agent": "planner", "description": "Window check requested", "status": "completed"}],
            "status": "pending"
        }
    }"#;

    #[tokio::test]
    async fn test_seed_pass_parses_plan_reply() {
        let provider = Arc::new(FixtureProvider::new(WINDOW_PLAN));
        let planner = LlmPlanner::new(provider.clone());

        let blackboard = planner
            .plan(Blackboard::new(), &ctx(), PlanningPass::Seed)
            .await
            .unwrap();

        assert_eq!(blackboard.plan.steps.len(), 1);
        assert_eq!(blackboard.plan.steps[0].owner, "window");
        assert_eq!(blackboard.plan.steps[0].status, Status::Pending);
    }

    #[tokio::test]
    async fn test_prompt_carries_request_workers_and_schema() {
        let provider = Arc::new(FixtureProvider::new(WINDOW_PLAN));
        let planner = LlmPlanner::new(provider.clone());

        planner
            .plan(Blackboard::new(), &ctx(), PlanningPass::Seed)
            .await
            .unwrap();

        let prompts = provider.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.contains("user: check the windows"));
        assert!(prompt.contains("\"window\""));
        assert!(prompt.contains("in_progress")); // schema literal, unescaped
        assert!(!prompt.contains("&quot;")); // JSON must not be HTML-escaped
    }

    #[tokio::test]
    async fn test_replan_pass_uses_orchestration_persona() {
        let provider = Arc::new(FixtureProvider::new(WINDOW_PLAN));
        let planner = LlmPlanner::new(provider.clone());

        planner
            .plan(Blackboard::new(), &ctx(), PlanningPass::Replan)
            .await
            .unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("orchestration component"));
        assert!(prompts[0].contains("NEVER modify or delete existing history"));
    }

    #[tokio::test]
    async fn test_code_fenced_reply_is_tolerated() {
        let fenced = format!("```json\n{WINDOW_PLAN}\n```");
        let planner = LlmPlanner::new(Arc::new(FixtureProvider::new(fenced)));

        let blackboard = planner
            .plan(Blackboard::new(), &ctx(), PlanningPass::Seed)
            .await
            .unwrap();
        assert_eq!(blackboard.plan.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_a_protocol_failure() {
        let planner = LlmPlanner::new(Arc::new(FixtureProvider::new(
            "Sure! I checked the windows and they look fine.",
        )));

        let result = planner
            .plan(Blackboard::new(), &ctx(), PlanningPass::Seed)
            .await;
        assert!(matches!(result, Err(PlannerError::MalformedBlackboard(_))));
    }

    #[tokio::test]
    async fn test_wrong_shape_json_is_a_protocol_failure() {
        let planner = LlmPlanner::new(Arc::new(FixtureProvider::new(
            r#"{"plan": {"steps": [{"description": 42}]}}"#,
        )));

        let result = planner
            .plan(Blackboard::new(), &ctx(), PlanningPass::Seed)
            .await;
        assert!(matches!(result, Err(PlannerError::MalformedBlackboard(_))));
    }
}
