// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Blackboard Domain Model
//!
//! Defines the shared run state threaded through the orchestration loop:
//! the future plan, the executed-action history, and the steps they contain.
//!
//! # Architectural Context
//!
//! - **Bounded Context:** Orchestration Context
//! - **Aggregate Root:** Blackboard
//!
//! # Design Principles
//!
//! 1. **Full-value replacement:** every stage of the loop receives a
//!    `Blackboard` by value and returns a complete new one. There is no
//!    field-level merging, so aliasing and partial-update bugs cannot occur.
//! 2. **Schema as contract:** the Planning Port is a loosely-typed external
//!    collaborator. The textual schema returned by [`Blackboard::schema`] is
//!    the boundary contract it is instructed with, down to the exact wire
//!    field names (`agent`, `description`, `status`) and enum literals.
//! 3. **Derived plan status:** `Plan::status` is recomputed from the steps
//!    on every convergence check, never cached across mutations.

use serde::{Deserialize, Serialize};

/// Progress tag for a step, a plan, or a history.
///
/// A simple tag, not an ordering: no total order of progress is implied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl Status {
    /// Wire literal used at the Planning Port boundary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Failed => "failed",
        }
    }

    /// Textual schema fragment for the status field.
    pub fn schema() -> &'static str {
        "status: string (pending, in_progress, completed, failed)"
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic unit of work assigned to exactly one worker.
///
/// The wire name of the owner field is `agent`: the Planning Port and the
/// workers both speak that dialect, and the schema string reflects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(rename = "agent")]
    pub owner: String,
    pub description: String,
    #[serde(default)]
    pub status: Status,
}

impl Step {
    /// Create a new step in the `Pending` state.
    pub fn pending(owner: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            description: description.into(),
            status: Status::Pending,
        }
    }

    /// Create a step already carrying a terminal status, for history entries.
    pub fn recorded(
        owner: impl Into<String>,
        description: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            owner: owner.into(),
            description: description.into(),
            status,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Textual schema fragment for one step.
    pub fn schema() -> String {
        format!(
            "- agent: string (identifier of the worker that owns the step)\n\
             - description: string\n\
             - {}",
            Status::schema()
        )
    }
}

/// The ordered set of not-yet-necessarily-executed steps for the run.
///
/// The Planning Port may rewrite `steps` freely on every pass; only the
/// history is append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub status: Status,
}

impl Plan {
    /// Recompute the plan status from its steps.
    ///
    /// `Completed` iff every step is `Completed`, vacuously true for an
    /// empty plan; `Pending` otherwise. Callers assign the result back to
    /// `status` on every convergence check instead of trusting the stored
    /// value.
    pub fn derived_status(&self) -> Status {
        if self.steps.iter().all(|s| s.status == Status::Completed) {
            Status::Completed
        } else {
            Status::Pending
        }
    }

    /// Iterate the steps currently awaiting dispatch.
    pub fn pending_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.is_pending())
    }

    /// True if any pending step is owned by `owner`.
    pub fn has_pending_for(&self, owner: &str) -> bool {
        self.pending_steps().any(|s| s.owner == owner)
    }

    /// Textual schema fragment for the plan.
    pub fn schema() -> String {
        format!(
            "- steps: list of steps, each:\n{}\n- {}",
            indent(&Step::schema(), 8),
            Status::schema()
        )
    }
}

/// Append-only record of what has been decided and executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub status: Status,
}

impl History {
    pub fn append(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// True if `self` extends `earlier` purely by appending: every entry of
    /// `earlier` is present, verbatim and in order, as a prefix of `self`.
    ///
    /// The loop uses this to detect (and warn about, never abort on)
    /// Planning Port violations of the append-only contract; tests use it
    /// to assert the core's own appends.
    pub fn is_prefix_extension_of(&self, earlier: &History) -> bool {
        self.steps.len() >= earlier.steps.len()
            && self.steps[..earlier.steps.len()] == earlier.steps[..]
    }

    /// Textual schema fragment for the history.
    pub fn schema() -> String {
        format!(
            "- steps: list of steps, each:\n{}\n- {}",
            indent(&Step::schema(), 8),
            Status::schema()
        )
    }
}

/// Shared run state: the future plan plus the executed-action history.
///
/// Created empty at run start, threaded through every stage by full
/// replacement, discarded when the run terminates. No cross-run persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blackboard {
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub history: History,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Textual schema description handed to the Planning Port.
    ///
    /// This string IS the boundary contract, not documentation: the port is
    /// instructed to return JSON of exactly this shape, and its output is
    /// rejected as a protocol failure when it does not parse.
    pub fn schema() -> String {
        format!(
            "- plan:\n{plan}\n- history:\n{history}",
            plan = indent(&Plan::schema(), 4),
            history = indent(&History::schema(), 4),
        )
    }
}

fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|l| format!("{pad}{l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_literals() {
        assert_eq!(serde_json::to_string(&Status::Pending).unwrap(), "\"pending\"");
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: Status = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, Status::Completed);
    }

    #[test]
    fn test_step_wire_field_is_agent() {
        let step = Step::pending("window", "Check all windows");
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["agent"], "window");
        assert!(json.get("owner").is_none());

        let parsed: Step = serde_json::from_value(serde_json::json!({
            "agent": "light",
            "description": "Turn off the kitchen light",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(parsed.owner, "light");
    }

    #[test]
    fn test_step_status_defaults_to_pending() {
        let parsed: Step = serde_json::from_value(serde_json::json!({
            "agent": "stove",
            "description": "Check the stove"
        }))
        .unwrap();
        assert!(parsed.is_pending());
    }

    #[test]
    fn test_derived_status_all_completed() {
        let plan = Plan {
            steps: vec![
                Step::recorded("window", "done", Status::Completed),
                Step::recorded("light", "done", Status::Completed),
            ],
            status: Status::Pending,
        };
        assert_eq!(plan.derived_status(), Status::Completed);
    }

    #[test]
    fn test_derived_status_vacuous_on_empty_plan() {
        assert_eq!(Plan::default().derived_status(), Status::Completed);
    }

    #[test]
    fn test_derived_status_pending_while_any_step_open() {
        let plan = Plan {
            steps: vec![
                Step::recorded("window", "done", Status::Completed),
                Step::pending("light", "still open"),
            ],
            status: Status::Completed, // stale cached value must not matter
        };
        assert_eq!(plan.derived_status(), Status::Pending);
    }

    #[test]
    fn test_pending_selection_by_owner() {
        let plan = Plan {
            steps: vec![
                Step::pending("window", "a"),
                Step::recorded("window", "b", Status::Completed),
                Step::pending("light", "c"),
            ],
            status: Status::Pending,
        };
        assert!(plan.has_pending_for("window"));
        assert!(plan.has_pending_for("light"));
        assert!(!plan.has_pending_for("stove"));
        assert_eq!(plan.pending_steps().count(), 2);
    }

    #[test]
    fn test_history_prefix_extension() {
        let mut earlier = History::default();
        earlier.append(Step::recorded("planner", "seed", Status::Completed));

        let mut later = earlier.clone();
        later.append(Step::recorded("window", "closed bedroom window", Status::Completed));

        assert!(later.is_prefix_extension_of(&earlier));
        assert!(!earlier.is_prefix_extension_of(&later));

        // Rewriting an existing entry is not an extension.
        let mut rewritten = later.clone();
        rewritten.steps[0].description = "rewritten".into();
        assert!(!rewritten.is_prefix_extension_of(&earlier));
    }

    #[test]
    fn test_history_extension_is_reflexive() {
        let mut history = History::default();
        history.append(Step::recorded("window", "checked", Status::Completed));
        assert!(history.is_prefix_extension_of(&history.clone()));
    }

    #[test]
    fn test_schema_names_wire_fields_and_literals() {
        let schema = Blackboard::schema();
        assert!(schema.contains("plan"));
        assert!(schema.contains("history"));
        assert!(schema.contains("agent"));
        assert!(schema.contains("description"));
        for literal in ["pending", "in_progress", "completed", "failed"] {
            assert!(schema.contains(literal), "schema missing literal {literal}");
        }
    }

    #[test]
    fn test_blackboard_round_trip() {
        let mut blackboard = Blackboard::new();
        blackboard.plan.steps.push(Step::pending("window", "Check all windows"));
        blackboard
            .history
            .append(Step::recorded("planner", "planned window check", Status::Completed));

        let json = serde_json::to_string(&blackboard).unwrap();
        let parsed: Blackboard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, blackboard);
    }
}
