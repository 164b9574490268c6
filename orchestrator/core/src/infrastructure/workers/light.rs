// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Light IoT device worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    let light_params = json!({
        "type": "object",
        "properties": {
            "light_id": {"type": "string", "description": "ID of the light"},
            "location": {"type": "string", "description": "Location of the light"}
        },
        "required": ["light_id", "location"]
    });

    DeviceWorker::new(
        "light",
        "Reports and controls the lights through the light IoT device.",
        vec![
            Tool::new(
                "check_light_status",
                "Check the status of one light",
                light_params.clone(),
                |args| {
                    debug!(?args, "checking light status");
                    Ok(json!("off"))
                },
            ),
            Tool::new(
                "turn_light_on",
                "Turn on the light",
                light_params.clone(),
                |args| {
                    debug!(?args, "turning light on");
                    Ok(json!("on"))
                },
            ),
            Tool::new(
                "turn_light_off",
                "Turn off the light",
                light_params,
                |args| {
                    debug!(?args, "turning light off");
                    Ok(json!("off"))
                },
            ),
            Tool::new(
                "get_all_lights_status",
                "Get the status of all lights",
                json!({"type": "object", "properties": {}, "required": []}),
                |_args| {
                    debug!("getting all lights status");
                    Ok(json!({
                        "living_room": "off",
                        "bedroom": "off",
                        "kitchen": "on",
                        "bathroom": "off"
                    }))
                },
            ),
        ],
        provider,
    )
}
