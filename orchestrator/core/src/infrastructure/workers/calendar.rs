// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Calendar API worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    DeviceWorker::new(
        "calendar",
        "Reads and updates the household calendar through the Google Calendar API.",
        vec![
            Tool::new(
                "get_today_events",
                "Get today's calendar events",
                json!({"type": "object", "properties": {}, "required": []}),
                |_args| {
                    debug!("getting today's events");
                    Ok(json!([
                        {"title": "Meeting", "time": "10:00", "location": "Conference Room"},
                        {"title": "Lunch", "time": "12:00", "location": "Cafeteria"}
                    ]))
                },
            ),
            Tool::new(
                "get_upcoming_events",
                "Get events for the coming days",
                json!({
                    "type": "object",
                    "properties": {
                        "days": {"type": "integer", "description": "Number of days to look ahead"}
                    },
                    "required": ["days"]
                }),
                |args| {
                    debug!(?args, "getting upcoming events");
                    Ok(json!([
                        {"title": "Meeting", "date": "2023-04-20", "time": "10:00", "location": "Conference Room"},
                        {"title": "Lunch", "date": "2023-04-20", "time": "12:00", "location": "Cafeteria"},
                        {"title": "Doctor Appointment", "date": "2023-04-22", "time": "14:00", "location": "Medical Center"}
                    ]))
                },
            ),
            Tool::new(
                "add_event",
                "Add a calendar event",
                json!({
                    "type": "object",
                    "properties": {
                        "title": {"type": "string", "description": "Event title"},
                        "date": {"type": "string", "description": "Event date"},
                        "time": {"type": "string", "description": "Event time"},
                        "location": {"type": "string", "description": "Event location"}
                    },
                    "required": ["title", "date", "time"]
                }),
                |args| {
                    debug!(?args, "adding event");
                    let mut event = args.clone();
                    if let Some(obj) = event.as_object_mut() {
                        obj.insert("status".into(), json!("added"));
                    }
                    Ok(event)
                },
            ),
            Tool::new(
                "check_availability",
                "Check whether a time slot is free",
                json!({
                    "type": "object",
                    "properties": {
                        "date": {"type": "string", "description": "Date to check"},
                        "time_slot": {"type": "string", "description": "Time slot to check"}
                    },
                    "required": ["date", "time_slot"]
                }),
                |args| {
                    debug!(?args, "checking availability");
                    Ok(json!({"available": true, "conflicting_events": []}))
                },
            ),
        ],
        provider,
    )
}
