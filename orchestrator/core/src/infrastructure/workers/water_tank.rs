// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Water tank IoT device worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    let no_params = json!({"type": "object", "properties": {}, "required": []});

    DeviceWorker::new(
        "water_tank",
        "Reports the water level and orders refills through the water tank IoT device.",
        vec![
            Tool::new(
                "check_water_level",
                "Check the water level in the tank (percent)",
                no_params.clone(),
                |_args| {
                    debug!("checking water level");
                    Ok(json!(5))
                },
            ),
            Tool::new(
                "get_water_usage",
                "Get water usage statistics",
                json!({
                    "type": "object",
                    "properties": {
                        "timeframe": {
                            "type": "string",
                            "description": "Timeframe to report (daily, weekly, monthly)"
                        }
                    },
                    "required": ["timeframe"]
                }),
                |args| {
                    debug!(?args, "getting water usage");
                    Ok(json!({"daily": 100, "weekly": 700, "monthly": 3000}))
                },
            ),
            Tool::new(
                "check_water_quality",
                "Check the water quality",
                no_params.clone(),
                |_args| {
                    debug!("checking water quality");
                    Ok(json!("good"))
                },
            ),
            Tool::new(
                "get_tank_status",
                "Get the full tank status",
                no_params.clone(),
                |_args| {
                    debug!("getting tank status");
                    Ok(json!({
                        "level": 5,
                        "quality": "good",
                        "last_maintenance": "2023-01-01"
                    }))
                },
            ),
            Tool::new(
                "order_water",
                "Order a water refill for the tank",
                no_params,
                |_args| {
                    debug!("ordering water");
                    Ok(json!({"status": "ordered", "delivery": "tomorrow"}))
                },
            ),
        ],
        provider,
    )
}
