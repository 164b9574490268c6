// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::planner::PlannerError;
use crate::domain::worker::WorkerDescriptor;

/// Default planning-pass budget per run.
pub const DEFAULT_MAX_ITERATIONS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only context for one orchestration run: the composed request text,
/// the static capability table available this run, and the planning-pass
/// budget. The iteration counter itself lives on the run's state machine,
/// never in process-global state, so concurrent runs stay isolated.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    pub request: String,
    pub workers: Vec<WorkerDescriptor>,
    pub max_iterations: u8,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(
        run_id: RunId,
        request: impl Into<String>,
        workers: Vec<WorkerDescriptor>,
        max_iterations: u8,
    ) -> Self {
        Self {
            run_id,
            request: request.into(),
            workers,
            // A zero budget would forbid even the seed pass; one planning
            // call is the floor.
            max_iterations: max_iterations.max(1),
            started_at: Utc::now(),
        }
    }
}

/// Run-level failures surfaced to the caller.
///
/// Budget exhaustion is deliberately absent: it is an observable terminal
/// state (`plan.status != completed` on the returned blackboard), not an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Planner(#[from] PlannerError),
}
