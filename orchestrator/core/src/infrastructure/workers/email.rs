// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Email account worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    DeviceWorker::new(
        "email",
        "Reads, searches, and sends email for the household account.",
        vec![
            Tool::new(
                "get_unread_emails",
                "Get unread emails",
                json!({"type": "object", "properties": {}, "required": []}),
                |_args| {
                    debug!("getting unread emails");
                    Ok(json!([
                        {"id": 1, "sender": "Google Maps", "subject": "Your reviews are popular on Google Maps", "date": "May 20", "read": false},
                        {"id": 2, "sender": "LinkedIn", "subject": "New jobs similar to Software Engineer", "date": "May 19", "read": true},
                        {"id": 3, "sender": "The Postman Team", "subject": "New sign-in notification", "date": "May 15", "read": true}
                    ]))
                },
            ),
            Tool::new(
                "search_emails",
                "Search for emails",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search term"}
                    },
                    "required": ["query"]
                }),
                |args| {
                    let query = args.get("query").and_then(|q| q.as_str()).unwrap_or("");
                    debug!(query, "searching emails");
                    Ok(json!([
                        {"id": "3", "from": "sender3@example.com", "subject": format!("Email about {query}"), "date": "2023-04-18"},
                        {"id": "4", "from": "sender4@example.com", "subject": format!("Regarding {query}"), "date": "2023-04-17"}
                    ]))
                },
            ),
            Tool::new(
                "send_email",
                "Send an email",
                json!({
                    "type": "object",
                    "properties": {
                        "to": {"type": "string", "description": "Recipient address"},
                        "subject": {"type": "string", "description": "Subject line"},
                        "body": {"type": "string", "description": "Message body"}
                    },
                    "required": ["to", "subject", "body"]
                }),
                |args| {
                    let to = args.get("to").and_then(|t| t.as_str()).unwrap_or("");
                    let subject = args.get("subject").and_then(|s| s.as_str()).unwrap_or("");
                    debug!(to, subject, "sending email");
                    Ok(json!({"status": "sent", "to": to, "subject": subject}))
                },
            ),
            Tool::new(
                "mark_email_as_read",
                "Mark an email as read",
                json!({
                    "type": "object",
                    "properties": {
                        "email_id": {"type": "string", "description": "ID of the email"}
                    },
                    "required": ["email_id"]
                }),
                |args| {
                    let email_id = args.get("email_id").and_then(|i| i.as_str()).unwrap_or("");
                    debug!(email_id, "marking email as read");
                    Ok(json!({"status": "marked as read", "email_id": email_id}))
                },
            ),
        ],
        provider,
    )
}
