// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Window IoT device worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    DeviceWorker::new(
        "window",
        "Reports and controls the windows through the window IoT device.",
        vec![
            Tool::new(
                "check_window_status",
                "Check the status of one window",
                json!({
                    "type": "object",
                    "properties": {
                        "window_id": {"type": "string", "description": "ID of the window to check"},
                        "location": {"type": "string", "description": "Location of the window"}
                    },
                    "required": ["window_id", "location"]
                }),
                |args| {
                    debug!(?args, "checking window status");
                    Ok(json!("closed"))
                },
            ),
            Tool::new(
                "close_window",
                "Close the window",
                json!({
                    "type": "object",
                    "properties": {
                        "window_id": {"type": "string", "description": "ID of the window to close"},
                        "location": {"type": "string", "description": "Location of the window"}
                    },
                    "required": ["window_id", "location"]
                }),
                |args| {
                    debug!(?args, "closing window");
                    Ok(json!("closed"))
                },
            ),
            Tool::new(
                "open_window",
                "Open the window",
                json!({
                    "type": "object",
                    "properties": {
                        "window_id": {"type": "string", "description": "ID of the window to open"},
                        "location": {"type": "string", "description": "Location of the window"}
                    },
                    "required": ["window_id", "location"]
                }),
                |args| {
                    debug!(?args, "opening window");
                    Ok(json!("open"))
                },
            ),
            Tool::new(
                "get_all_windows_status",
                "Get the status of all windows",
                json!({"type": "object", "properties": {}, "required": []}),
                |_args| {
                    debug!("getting all windows status");
                    Ok(json!({
                        "living_room": "closed",
                        "bedroom": "open",
                        "kitchen": "closed",
                        "bathroom": "closed"
                    }))
                },
            ),
        ],
        provider,
    )
}
