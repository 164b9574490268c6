// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Weather API worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    let no_params = json!({"type": "object", "properties": {}, "required": []});

    DeviceWorker::new(
        "weather",
        "Fetches weather conditions, forecasts, and alerts from the weather API.",
        vec![
            Tool::new(
                "get_current_weather",
                "Get the current weather conditions",
                no_params.clone(),
                |_args| {
                    debug!("getting current weather");
                    Ok(json!({
                        "temperature": 72,
                        "condition": "sunny",
                        "humidity": 45,
                        "wind_speed": 5
                    }))
                },
            ),
            Tool::new(
                "get_weather_forecast",
                "Get the weather forecast for the given number of days",
                json!({
                    "type": "object",
                    "properties": {
                        "days": {"type": "integer", "description": "Number of days to forecast"}
                    },
                    "required": ["days"]
                }),
                |args| {
                    debug!(?args, "getting weather forecast");
                    Ok(json!({
                        "forecast": [
                            {"day": "today", "temperature": 72, "condition": "sunny"},
                            {"day": "tomorrow", "temperature": 68, "condition": "cloudy"},
                            {"day": "day_after", "temperature": 65, "condition": "rainy"}
                        ]
                    }))
                },
            ),
            Tool::new(
                "get_weather_alerts",
                "Get active weather alerts and warnings",
                no_params,
                |_args| {
                    debug!("getting weather alerts");
                    Ok(json!({
                        "alerts": [
                            {"type": "rain", "severity": "moderate", "time": "evening"}
                        ]
                    }))
                },
            ),
        ],
        provider,
    )
}
