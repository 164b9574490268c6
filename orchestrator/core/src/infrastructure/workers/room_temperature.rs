// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// HVAC room sensor worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    let no_params = json!({"type": "object", "properties": {}, "required": []});

    DeviceWorker::new(
        "room_temperature",
        "Reports room temperatures and humidity from the HVAC IoT sensors.",
        vec![
            Tool::new(
                "get_room_temperatures",
                "Get temperatures for all rooms",
                no_params.clone(),
                |_args| {
                    debug!("getting room temperatures");
                    Ok(json!({
                        "living_room": 22.5,
                        "bedroom": 21.0,
                        "kitchen": 23.1,
                        "bathroom": 22.0,
                        "unit": "celsius"
                    }))
                },
            ),
            Tool::new(
                "get_room_humidity",
                "Get humidity for all rooms",
                no_params,
                |_args| {
                    debug!("getting room humidity");
                    Ok(json!({
                        "living_room": 40,
                        "bedroom": 42,
                        "kitchen": 48,
                        "bathroom": 55,
                        "unit": "percent"
                    }))
                },
            ),
        ],
        provider,
    )
}
