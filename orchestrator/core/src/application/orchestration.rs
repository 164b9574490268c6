// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Orchestration Loop (Application Service)
//!
//! Drives one run of the blackboard convergence state machine:
//!
//! ```text
//! Init ──seed plan──▶ Planned ──▶ { Done | dispatch ──▶ Dispatched }
//! Dispatched ──replan──▶ Checked ──▶ { Done | dispatch ──▶ Dispatched }
//! ```
//!
//! A convergence check runs after **every** planning pass, the seed pass
//! included, so a planner that immediately closes the plan out terminates
//! the run in a single iteration with no dispatch. The iteration counter
//! increments once per Planning Port call (seed and every replan), which
//! bounds total planning calls independent of how many workers run per
//! round. The loop goes back to dispatch after a check, never back to
//! planning: the pass that just ran already queued the next pending steps.
//!
//! The loop imposes no timeout of its own; planner and worker calls may
//! block arbitrarily. Timeout and cancellation belong to whatever wraps a
//! full run.

use std::mem;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::application::dispatch::WorkerRegistry;
use crate::domain::blackboard::{Blackboard, History, Status};
use crate::domain::events::RunEvent;
use crate::domain::planner::{Planner, PlanningPass};
use crate::domain::run::{RunContext, RunError, RunId};
use crate::infrastructure::event_bus::EventBus;

/// Convergence state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Init,
    Planned,
    Dispatched,
    Checked,
    Done,
}

/// Application service driving orchestration runs.
///
/// Holds no per-run state: every `run` call builds its own context and
/// iteration counter, so concurrent runs share nothing and need no locking.
pub struct OrchestrationService {
    planner: Arc<dyn Planner>,
    registry: Arc<WorkerRegistry>,
    event_bus: Arc<EventBus>,
    max_iterations: u8,
}

impl OrchestrationService {
    pub fn new(
        planner: Arc<dyn Planner>,
        registry: Arc<WorkerRegistry>,
        event_bus: Arc<EventBus>,
        max_iterations: u8,
    ) -> Self {
        Self {
            planner,
            registry,
            event_bus,
            max_iterations,
        }
    }

    /// Execute one run for `query` on behalf of `owner`.
    ///
    /// Returns the terminal blackboard whether the plan converged or the
    /// iteration budget ran out; callers distinguish the two by inspecting
    /// `plan.status`. Validation and planning failures surface as errors;
    /// worker failures never do.
    pub async fn run(&self, query: &str, owner: &str) -> Result<Blackboard, RunError> {
        if query.trim().is_empty() {
            return Err(RunError::Validation("no query provided".to_string()));
        }
        if owner.trim().is_empty() {
            return Err(RunError::Validation("no owner provided".to_string()));
        }

        let ctx = RunContext::new(
            RunId::new(),
            format!("{owner}: {query}"),
            self.registry.descriptors(),
            self.max_iterations,
        );

        info!(run_id = %ctx.run_id, request = %ctx.request, "starting orchestration run");
        metrics::counter!("hearth_runs_started_total").increment(1);
        self.event_bus.publish(RunEvent::RunStarted {
            run_id: ctx.run_id,
            request: ctx.request.clone(),
            started_at: ctx.started_at,
        });

        match self.drive(&ctx).await {
            Ok((blackboard, iterations)) => {
                let converged = blackboard.plan.status == Status::Completed;
                if converged {
                    info!(run_id = %ctx.run_id, iterations, "run converged");
                } else {
                    warn!(
                        run_id = %ctx.run_id,
                        iterations,
                        "iteration budget exhausted before the plan converged"
                    );
                }
                metrics::counter!("hearth_runs_completed_total", "converged" => converged.to_string())
                    .increment(1);
                metrics::histogram!("hearth_run_iterations").record(iterations as f64);
                self.event_bus.publish(RunEvent::RunCompleted {
                    run_id: ctx.run_id,
                    converged,
                    iterations,
                    blackboard: blackboard.clone(),
                    completed_at: Utc::now(),
                });
                Ok(blackboard)
            }
            Err(e) => {
                metrics::counter!("hearth_runs_failed_total").increment(1);
                self.event_bus.publish(RunEvent::RunFailed {
                    run_id: ctx.run_id,
                    reason: e.to_string(),
                    failed_at: Utc::now(),
                });
                Err(e)
            }
        }
    }

    /// Step the state machine until `Done`.
    async fn drive(&self, ctx: &RunContext) -> Result<(Blackboard, u8), RunError> {
        let mut state = LoopState::Init;
        let mut blackboard = Blackboard::new();
        let mut recorded_history = History::default();
        let mut iterations: u8 = 0;

        while state != LoopState::Done {
            state = match state {
                LoopState::Init => {
                    blackboard = self
                        .planner
                        .plan(mem::take(&mut blackboard), ctx, PlanningPass::Seed)
                        .await?;
                    iterations += 1;
                    self.complete_iteration(ctx, &mut blackboard, &mut recorded_history, iterations);
                    LoopState::Planned
                }
                LoopState::Planned | LoopState::Checked => {
                    if blackboard.plan.status == Status::Completed
                        || iterations >= ctx.max_iterations
                    {
                        LoopState::Done
                    } else {
                        blackboard = self
                            .registry
                            .dispatch(mem::take(&mut blackboard), ctx)
                            .await;
                        LoopState::Dispatched
                    }
                }
                LoopState::Dispatched => {
                    blackboard = self
                        .planner
                        .plan(mem::take(&mut blackboard), ctx, PlanningPass::Replan)
                        .await?;
                    iterations += 1;
                    self.complete_iteration(ctx, &mut blackboard, &mut recorded_history, iterations);
                    LoopState::Checked
                }
                LoopState::Done => unreachable!("loop exits before matching Done"),
            };
        }

        Ok((blackboard, iterations))
    }

    /// Close out one iteration: recompute the derived plan status, check
    /// the history append-only contract, and publish the snapshot.
    fn complete_iteration(
        &self,
        ctx: &RunContext,
        blackboard: &mut Blackboard,
        recorded_history: &mut History,
        iteration: u8,
    ) {
        blackboard.plan.status = blackboard.plan.derived_status();

        // Best-effort conformance check only: a port that rewrote history
        // broke its contract, but that is its failure mode to own, not a
        // reason to abort the run.
        if !blackboard.history.is_prefix_extension_of(recorded_history) {
            warn!(
                run_id = %ctx.run_id,
                iteration,
                "planning port rewrote previously recorded history entries"
            );
        }
        *recorded_history = blackboard.history.clone();

        debug!(
            run_id = %ctx.run_id,
            iteration,
            plan_status = %blackboard.plan.status,
            open_steps = blackboard.plan.pending_steps().count(),
            "iteration completed"
        );
        self.event_bus.publish(RunEvent::IterationCompleted {
            run_id: ctx.run_id,
            iteration,
            blackboard: blackboard.clone(),
            completed_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blackboard::Step;
    use crate::domain::planner::PlannerError;
    use crate::domain::worker::{Worker, WorkerError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

    /// Seed pass queues one pending step per `owners`; replan passes leave
    /// the blackboard as-is (the derived check then converges once workers
    /// have completed everything).
    struct OneShotPlanner {
        owners: Vec<&'static str>,
        calls: AtomicU8,
    }

    impl OneShotPlanner {
        fn new(owners: Vec<&'static str>) -> Self {
            Self {
                owners,
                calls: AtomicU8::new(0),
            }
        }
    }

    #[async_trait]
    impl Planner for OneShotPlanner {
        async fn plan(
            &self,
            mut blackboard: Blackboard,
            _ctx: &RunContext,
            pass: PlanningPass,
        ) -> Result<Blackboard, PlannerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match pass {
                PlanningPass::Seed => {
                    for owner in &self.owners {
                        blackboard
                            .plan
                            .steps
                            .push(Step::pending(*owner, format!("check the {owner}")));
                    }
                    blackboard.history.append(Step::recorded(
                        "planner",
                        "queued device checks",
                        Status::Completed,
                    ));
                }
                PlanningPass::Replan => {
                    blackboard.history.append(Step::recorded(
                        "orchestration",
                        "all requested checks are done",
                        Status::Completed,
                    ));
                }
            }
            Ok(blackboard)
        }
    }

    /// Returns its input untouched except for claiming the plan completed.
    struct NoopPlanner {
        calls: AtomicU8,
    }

    #[async_trait]
    impl Planner for NoopPlanner {
        async fn plan(
            &self,
            mut blackboard: Blackboard,
            _ctx: &RunContext,
            _pass: PlanningPass,
        ) -> Result<Blackboard, PlannerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            blackboard.plan.status = Status::Completed;
            Ok(blackboard)
        }
    }

    /// Proposes a fresh pending step on every pass, forever.
    struct EndlessPlanner {
        calls: AtomicU8,
    }

    #[async_trait]
    impl Planner for EndlessPlanner {
        async fn plan(
            &self,
            mut blackboard: Blackboard,
            _ctx: &RunContext,
            _pass: PlanningPass,
        ) -> Result<Blackboard, PlannerError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            blackboard
                .plan
                .steps
                .push(Step::pending("window", format!("recheck window #{n}")));
            Ok(blackboard)
        }
    }

    struct FailingPlanner;

    #[async_trait]
    impl Planner for FailingPlanner {
        async fn plan(
            &self,
            _blackboard: Blackboard,
            _ctx: &RunContext,
            _pass: PlanningPass,
        ) -> Result<Blackboard, PlannerError> {
            Err(PlannerError::MalformedBlackboard("not json".into()))
        }
    }

    struct CountingWorker {
        id: &'static str,
        invocations: AtomicUsize,
    }

    impl CountingWorker {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                invocations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Worker for CountingWorker {
        fn id(&self) -> &str {
            self.id
        }

        fn description(&self) -> &str {
            "counting test worker"
        }

        async fn execute(
            &self,
            mut blackboard: Blackboard,
            _ctx: &RunContext,
        ) -> Result<Blackboard, WorkerError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            for step in blackboard.plan.steps.iter_mut() {
                if step.is_pending() && step.owner == self.id {
                    step.status = Status::Completed;
                    blackboard.history.steps.push(Step::recorded(
                        self.id,
                        "all clear",
                        Status::Completed,
                    ));
                }
            }
            Ok(blackboard)
        }
    }

    fn service_with(
        planner: Arc<dyn Planner>,
        workers: Vec<Arc<dyn Worker>>,
        max_iterations: u8,
    ) -> (OrchestrationService, Arc<EventBus>) {
        let mut registry = WorkerRegistry::new();
        for worker in workers {
            registry.register(worker);
        }
        let event_bus = Arc::new(EventBus::new(64));
        let service = OrchestrationService::new(
            planner,
            Arc::new(registry),
            event_bus.clone(),
            max_iterations,
        );
        (service, event_bus)
    }

    #[tokio::test]
    async fn test_rejects_empty_query_and_owner() {
        let (service, _) = service_with(Arc::new(NoopPlanner { calls: AtomicU8::new(0) }), vec![], 5);
        assert!(matches!(
            service.run("", "user").await,
            Err(RunError::Validation(_))
        ));
        assert!(matches!(
            service.run("check the windows", "  ").await,
            Err(RunError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_single_worker_run_converges_at_iteration_two() {
        // "check the windows": seed plan queues one window step, the window
        // worker resolves it, the replan closes the run out.
        let planner = Arc::new(OneShotPlanner::new(vec!["window"]));
        let worker = Arc::new(CountingWorker::new("window"));
        let (service, _) =
            service_with(planner.clone(), vec![worker.clone() as Arc<dyn Worker>], 5);

        let blackboard = service.run("check the windows", "user").await.unwrap();

        assert_eq!(blackboard.plan.status, Status::Completed);
        assert_eq!(planner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(worker.invocations.load(Ordering::SeqCst), 1);
        // seed entry, worker entry, replan summary, in that order.
        let owners: Vec<_> = blackboard
            .history
            .steps
            .iter()
            .map(|s| s.owner.as_str())
            .collect();
        assert_eq!(owners, vec!["planner", "window", "orchestration"]);
    }

    #[tokio::test]
    async fn test_noop_plan_terminates_in_one_iteration_without_dispatch() {
        let planner = Arc::new(NoopPlanner { calls: AtomicU8::new(0) });
        let worker = Arc::new(CountingWorker::new("window"));
        let (service, _) =
            service_with(planner.clone(), vec![worker.clone() as Arc<dyn Worker>], 5);

        let blackboard = service.run("anything to do?", "user").await.unwrap();

        assert_eq!(blackboard.plan.status, Status::Completed);
        assert_eq!(planner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(worker.invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_iteration_budget_bounds_planner_calls() {
        let planner = Arc::new(EndlessPlanner { calls: AtomicU8::new(0) });
        let worker = Arc::new(CountingWorker::new("window")) as Arc<dyn Worker>;
        let (service, _) = service_with(planner.clone(), vec![worker], 5);

        let blackboard = service.run("keep the house safe", "user").await.unwrap();

        // Budget exhaustion is a terminal state, not an error.
        assert_eq!(blackboard.plan.status, Status::Pending);
        assert_eq!(planner.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_unregistered_owner_never_transitions_and_never_errors() {
        let planner = Arc::new(OneShotPlanner::new(vec!["garage"]));
        let (service, _) = service_with(planner.clone(), vec![], 3);

        let blackboard = service.run("open the garage", "user").await.unwrap();

        assert_eq!(blackboard.plan.steps.len(), 1);
        assert_eq!(blackboard.plan.steps[0].status, Status::Pending);
        assert_eq!(planner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_planner_failure_is_fatal_for_the_run() {
        let (service, event_bus) = service_with(Arc::new(FailingPlanner), vec![], 5);
        let mut receiver = event_bus.subscribe();

        let result = service.run("check the windows", "user").await;
        assert!(matches!(result, Err(RunError::Planner(_))));

        let mut saw_failed = false;
        while let Ok(event) = receiver.try_recv() {
            if matches!(event, RunEvent::RunFailed { .. }) {
                saw_failed = true;
            }
        }
        assert!(saw_failed);
    }

    #[tokio::test]
    async fn test_history_grows_by_prefix_extension_across_iterations() {
        let planner = Arc::new(OneShotPlanner::new(vec!["window", "light"]));
        let workers: Vec<Arc<dyn Worker>> = vec![
            Arc::new(CountingWorker::new("window")),
            Arc::new(CountingWorker::new("light")),
        ];
        let (service, event_bus) = service_with(planner, workers, 5);
        let mut receiver = event_bus.subscribe();

        service.run("leave-the-house routine", "user").await.unwrap();

        let mut previous: Option<History> = None;
        let mut snapshots = 0;
        while let Ok(event) = receiver.try_recv() {
            if let RunEvent::IterationCompleted { blackboard, .. } = event {
                if let Some(earlier) = &previous {
                    assert!(blackboard.history.is_prefix_extension_of(earlier));
                }
                previous = Some(blackboard.history);
                snapshots += 1;
            }
        }
        assert_eq!(snapshots, 2);
    }

    #[tokio::test]
    async fn test_run_events_bracket_the_run() {
        let planner = Arc::new(OneShotPlanner::new(vec!["window"]));
        let worker: Arc<dyn Worker> = Arc::new(CountingWorker::new("window"));
        let (service, event_bus) = service_with(planner, vec![worker], 5);
        let mut receiver = event_bus.subscribe();

        service.run("check the windows", "user").await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            kinds.push(match event {
                RunEvent::RunStarted { .. } => "started",
                RunEvent::IterationCompleted { .. } => "iteration",
                RunEvent::RunCompleted { converged, .. } => {
                    assert!(converged);
                    "completed"
                }
                RunEvent::RunFailed { .. } => "failed",
            });
        }
        assert_eq!(kinds, vec!["started", "iteration", "iteration", "completed"]);
    }
}
