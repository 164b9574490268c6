// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod event_bus;
pub mod llm;
pub mod llm_planner;
pub mod workers;

pub use event_bus::EventBus;
pub use llm_planner::LlmPlanner;

/// Slice out the outermost `{ ... }` window of a model reply, tolerating
/// code fences and prose around the JSON object.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
