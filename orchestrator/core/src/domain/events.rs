// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::blackboard::Blackboard;
use crate::domain::run::RunId;

/// Progress events published by the orchestration loop.
///
/// External observers (a CLI progress view, a future push channel) key on
/// the run id. `IterationCompleted` fires exactly once per planning pass
/// and carries a full blackboard snapshot, matching the full-value
/// replacement model everywhere else in the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    RunStarted {
        run_id: RunId,
        request: String,
        started_at: DateTime<Utc>,
    },
    IterationCompleted {
        run_id: RunId,
        iteration: u8,
        blackboard: Blackboard,
        completed_at: DateTime<Utc>,
    },
    RunCompleted {
        run_id: RunId,
        /// True when the plan converged, false when the iteration budget
        /// ran out first.
        converged: bool,
        iterations: u8,
        blackboard: Blackboard,
        completed_at: DateTime<Utc>,
    },
    RunFailed {
        run_id: RunId,
        reason: String,
        failed_at: DateTime<Utc>,
    },
}

impl RunEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            RunEvent::RunStarted { run_id, .. }
            | RunEvent::IterationCompleted { run_id, .. }
            | RunEvent::RunCompleted { run_id, .. }
            | RunEvent::RunFailed { run_id, .. } => *run_id,
        }
    }
}
