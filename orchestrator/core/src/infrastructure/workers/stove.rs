// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Stove IoT device worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    let no_params = json!({"type": "object", "properties": {}, "required": []});

    DeviceWorker::new(
        "stove",
        "Reports and controls the stove through the stove IoT device.",
        vec![
            Tool::new(
                "check_stove_status",
                "Check whether the stove is on or off",
                no_params.clone(),
                |_args| {
                    debug!("checking stove status");
                    Ok(json!("off"))
                },
            ),
            Tool::new(
                "turn_stove_off",
                "Turn off the stove",
                no_params.clone(),
                |_args| {
                    debug!("turning stove off");
                    Ok(json!("off"))
                },
            ),
            Tool::new(
                "get_stove_temperature",
                "Get the current stove temperature",
                no_params.clone(),
                |_args| {
                    debug!("getting stove temperature");
                    Ok(json!(0))
                },
            ),
            Tool::new(
                "get_cooking_timer",
                "Get the remaining cooking timer in minutes",
                no_params,
                |_args| {
                    debug!("getting cooking timer");
                    Ok(json!(0))
                },
            ),
            Tool::new(
                "set_cooking_timer",
                "Set the cooking timer",
                json!({
                    "type": "object",
                    "properties": {
                        "minutes": {"type": "integer", "description": "Timer duration in minutes"}
                    },
                    "required": ["minutes"]
                }),
                |args| {
                    let minutes = args.get("minutes").and_then(|m| m.as_i64()).unwrap_or(0);
                    debug!(minutes, "setting cooking timer");
                    Ok(json!(format!("Timer set for {minutes} minutes")))
                },
            ),
        ],
        provider,
    )
}
