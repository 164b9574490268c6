// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Planning Port
//!
//! The planning decision itself is opaque to the core: rule engine,
//! external reasoning service, or hard-coded fixture all satisfy the same
//! injected contract. The core only cares about the structural contract:
//! the port receives the current blackboard plus the run context and must
//! return a blackboard-shaped value.

use async_trait::async_trait;

use crate::domain::blackboard::Blackboard;
use crate::domain::llm::LLMError;
use crate::domain::run::RunContext;

/// Which planning pass is being requested.
///
/// The seed pass turns the raw request into the first plan; every replan
/// pass re-evaluates the plan in light of dispatched results and either
/// queues follow-up steps or closes the run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanningPass {
    Seed,
    Replan,
}

/// Fatal planning failures. There is no partial acceptance of a malformed
/// plan and no retry inside the core; retry policy, if any, belongs to the
/// collaborator wrapper.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("planner returned output that does not parse as a blackboard: {0}")]
    MalformedBlackboard(String),

    #[error("prompt rendering failed: {0}")]
    Template(String),

    #[error(transparent)]
    Llm(#[from] LLMError),
}

/// Planning Port contract.
///
/// The returned blackboard's history must preserve every entry of the
/// input's history verbatim, by append only. That contract is enforced by
/// external instruction, not mechanically by the loop; the loop tolerates
/// violations with a warning. `plan.steps`, in contrast, may be freely
/// rewritten on every pass.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(
        &self,
        blackboard: Blackboard,
        ctx: &RunContext,
        pass: PlanningPass,
    ) -> Result<Blackboard, PlannerError>;
}
