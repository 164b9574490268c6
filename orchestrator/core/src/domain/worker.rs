// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Worker Domain Contract
//!
//! A worker is a capability-specific executor that resolves the pending
//! steps addressed to it. Workers are selected at runtime by string
//! identifier; the capability-description table built from registered
//! workers is what the Planning Port plans against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::blackboard::Blackboard;
use crate::domain::llm::LLMError;
use crate::domain::run::RunContext;

/// Capability table entry handed to the Planning Port: the worker's
/// identifier plus a one-line description of what it can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDescriptor {
    pub name: String,
    pub description: String,
}

/// A named callable sub-operation exposed by a worker (the "tool" surface).
///
/// The core never interprets `parameters`; it is an opaque JSON schema
/// forwarded to the worker-execution collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Errors a worker can surface from one execution.
///
/// All of these are contained by dispatch: the offending steps stay
/// `Pending` and are redispatched on the next iteration. None abort the run.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("worker returned output that does not parse as a blackboard: {0}")]
    MalformedBlackboard(String),

    #[error("worker returned an unparseable tool plan: {0}")]
    MalformedToolPlan(String),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },

    #[error(transparent)]
    Llm(#[from] LLMError),
}

/// Capability contract: execute the pending steps you own against the
/// shared blackboard and return the updated blackboard.
///
/// Contract, enforced by convention at this boundary:
/// - steps owned by this worker are transitioned away from `Pending` once
///   acted on (a step left `Pending` is simply retried next iteration);
/// - history entries describing the action and observed outcome are
///   appended, never rewritten;
/// - steps owned by other workers are left untouched.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Stable string identifier steps are addressed to.
    fn id(&self) -> &str;

    /// One-line capability description for the Planning Port.
    fn description(&self) -> &str;

    /// Named callable sub-operations, if any.
    fn tools(&self) -> &[ToolSpec] {
        &[]
    }

    /// Resolve this worker's pending steps. Receives the whole blackboard
    /// and returns a complete replacement.
    async fn execute(
        &self,
        blackboard: Blackboard,
        ctx: &RunContext,
    ) -> Result<Blackboard, WorkerError>;

    fn descriptor(&self) -> WorkerDescriptor {
        WorkerDescriptor {
            name: self.id().to_string(),
            description: self.description().to_string(),
        }
    }
}
