// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Worker Registry & Dispatch (Application Service)
//!
//! Maps worker identifiers to workers and routes each iteration's pending
//! steps to the right one.
//!
//! # Dispatch semantics
//!
//! - Workers are visited in **registration order**, one at a time. The
//!   blackboard returned by a worker is adopted wholesale before the next
//!   worker runs, so a later worker in the same iteration observes the
//!   history entries an earlier one appended. Dispatch is never
//!   interleaved; deterministic history ordering comes from this.
//! - A pending step whose owner has no registered worker is silently left
//!   `Pending` for the iteration. Workers may be dynamically omitted from a
//!   node's registry, so this is not an error.
//! - A worker failure is contained: the pre-invocation blackboard is kept,
//!   the steps stay `Pending`, and dispatch continues with the remaining
//!   workers. An unfinished step is simply redispatched next iteration;
//!   that is the loop's whole retry story.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::blackboard::Blackboard;
use crate::domain::run::RunContext;
use crate::domain::worker::{Worker, WorkerDescriptor};

/// Registration-order-preserving worker registry.
#[derive(Clone, Default)]
pub struct WorkerRegistry {
    workers: Vec<Arc<dyn Worker>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker. Re-registering an identifier replaces the worker
    /// in place, keeping its original position in dispatch order.
    pub fn register(&mut self, worker: Arc<dyn Worker>) {
        if let Some(existing) = self
            .workers
            .iter_mut()
            .find(|w| w.id() == worker.id())
        {
            *existing = worker;
        } else {
            self.workers.push(worker);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Worker>> {
        self.workers.iter().find(|w| w.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Capability table handed to the Planning Port.
    pub fn descriptors(&self) -> Vec<WorkerDescriptor> {
        self.workers.iter().map(|w| w.descriptor()).collect()
    }

    /// Route every pending step to its owning worker, sequentially, in
    /// registration order. Returns the blackboard after all owners present
    /// in the registry have run.
    pub async fn dispatch(&self, mut blackboard: Blackboard, ctx: &RunContext) -> Blackboard {
        for worker in &self.workers {
            // Re-check against the current blackboard: an earlier worker in
            // this same round may already have adopted a new version.
            if !blackboard.plan.has_pending_for(worker.id()) {
                continue;
            }

            debug!(run_id = %ctx.run_id, worker = worker.id(), "dispatching pending steps");

            match worker.execute(blackboard.clone(), ctx).await {
                Ok(updated) => blackboard = updated,
                Err(e) => {
                    warn!(
                        run_id = %ctx.run_id,
                        worker = worker.id(),
                        error = %e,
                        "worker failed; its steps stay pending for redispatch"
                    );
                }
            }
        }

        for step in blackboard.plan.pending_steps() {
            if !self.contains(&step.owner) {
                debug!(
                    run_id = %ctx.run_id,
                    owner = %step.owner,
                    "no registered worker for pending step; skipping this iteration"
                );
            }
        }

        blackboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blackboard::{Status, Step};
    use crate::domain::run::RunId;
    use crate::domain::worker::WorkerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn ctx() -> RunContext {
        RunContext::new(RunId::new(), "user: test", vec![], 5)
    }

    /// Completes its own pending steps and appends one history entry each,
    /// recording what it observed at execution time.
    struct ScriptedWorker {
        id: &'static str,
        /// History length seen on each invocation, for sequencing asserts.
        observed_history_len: Mutex<Vec<usize>>,
    }

    impl ScriptedWorker {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                observed_history_len: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Worker for ScriptedWorker {
        fn id(&self) -> &str {
            self.id
        }

        fn description(&self) -> &str {
            "scripted test worker"
        }

        async fn execute(
            &self,
            mut blackboard: Blackboard,
            _ctx: &RunContext,
        ) -> Result<Blackboard, WorkerError> {
            self.observed_history_len
                .lock()
                .unwrap()
                .push(blackboard.history.steps.len());

            for step in blackboard.plan.steps.iter_mut() {
                if step.is_pending() && step.owner == self.id {
                    step.status = Status::Completed;
                    blackboard
                        .history
                        .steps
                        .push(Step::recorded(self.id, "resolved", Status::Completed));
                }
            }
            Ok(blackboard)
        }
    }

    struct FailingWorker;

    #[async_trait]
    impl Worker for FailingWorker {
        fn id(&self) -> &str {
            "stove"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        async fn execute(
            &self,
            _blackboard: Blackboard,
            _ctx: &RunContext,
        ) -> Result<Blackboard, WorkerError> {
            Err(WorkerError::ToolFailed {
                name: "check_stove_status".into(),
                message: "device unreachable".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_unknown_owner_is_skipped_silently() {
        let registry = WorkerRegistry::new();
        let mut blackboard = Blackboard::new();
        blackboard.plan.steps.push(Step::pending("garage", "open the garage"));

        let out = registry.dispatch(blackboard, &ctx()).await;
        assert_eq!(out.plan.steps[0].status, Status::Pending);
        assert!(out.history.steps.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_follows_registration_order_sequentially() {
        let window = Arc::new(ScriptedWorker::new("window"));
        let light = Arc::new(ScriptedWorker::new("light"));

        let mut registry = WorkerRegistry::new();
        registry.register(window.clone());
        registry.register(light.clone());

        let mut blackboard = Blackboard::new();
        // Plan order deliberately reversed relative to registration order.
        blackboard.plan.steps.push(Step::pending("light", "lights off"));
        blackboard.plan.steps.push(Step::pending("window", "windows shut"));

        let out = registry.dispatch(blackboard, &ctx()).await;

        assert!(out.plan.steps.iter().all(|s| s.status == Status::Completed));
        // window registered first, so its history entry precedes light's.
        assert_eq!(out.history.steps[0].owner, "window");
        assert_eq!(out.history.steps[1].owner, "light");
        // The second worker saw the first worker's append; the first saw
        // nothing. Sequential, never interleaved.
        assert_eq!(*window.observed_history_len.lock().unwrap(), vec![0]);
        assert_eq!(*light.observed_history_len.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_worker_failure_is_contained() {
        let mut registry = WorkerRegistry::new();
        registry.register(Arc::new(FailingWorker));
        registry.register(Arc::new(ScriptedWorker::new("window")));

        let mut blackboard = Blackboard::new();
        blackboard.plan.steps.push(Step::pending("stove", "stove off"));
        blackboard.plan.steps.push(Step::pending("window", "windows shut"));

        let out = registry.dispatch(blackboard, &ctx()).await;

        // Failed worker's step is still pending, not silently completed.
        assert_eq!(out.plan.steps[0].status, Status::Pending);
        // The iteration continued with the other owner.
        assert_eq!(out.plan.steps[1].status, Status::Completed);
    }

    #[tokio::test]
    async fn test_worker_without_pending_steps_is_not_invoked() {
        let window = Arc::new(ScriptedWorker::new("window"));
        let mut registry = WorkerRegistry::new();
        registry.register(window.clone());

        let out = registry.dispatch(Blackboard::new(), &ctx()).await;
        assert!(out.history.steps.is_empty());
        assert!(window.observed_history_len.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reregistration_replaces_in_place() {
        let mut registry = WorkerRegistry::new();
        registry.register(Arc::new(ScriptedWorker::new("window")));
        registry.register(Arc::new(ScriptedWorker::new("light")));
        registry.register(Arc::new(ScriptedWorker::new("window")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.descriptors()[0].name, "window");
        assert_eq!(registry.descriptors()[1].name, "light");
    }
}
