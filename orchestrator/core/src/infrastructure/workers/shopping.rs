// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// Shopping API worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    let no_params = json!({"type": "object", "properties": {}, "required": []});

    DeviceWorker::new(
        "shopping",
        "Shops for groceries and other items through the shopping API, including order history and current offers.",
        vec![
            Tool::new(
                "search_products",
                "Search for products",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search term"}
                    },
                    "required": ["query"]
                }),
                |args| {
                    let query = args.get("query").and_then(|q| q.as_str()).unwrap_or("");
                    debug!(query, "searching products");
                    Ok(json!([
                        {"name": format!("{query} Product 1"), "price": 19.99, "store": "Store A", "in_stock": true},
                        {"name": format!("{query} Product 2"), "price": 29.99, "store": "Store B", "in_stock": true},
                        {"name": format!("{query} Product 3"), "price": 39.99, "store": "Store C", "in_stock": false}
                    ]))
                },
            ),
            Tool::new(
                "get_shopping_history",
                "Get recent orders",
                no_params.clone(),
                |_args| {
                    debug!("getting shopping history");
                    Ok(json!([
                        {"date": "2023-04-15", "items": ["Item 1", "Item 2"], "total": 49.98},
                        {"date": "2023-04-10", "items": ["Item 3"], "total": 19.99},
                        {"date": "2023-04-05", "items": ["Item 4", "Item 5", "Item 6"], "total": 89.97}
                    ]))
                },
            ),
            Tool::new(
                "get_current_offers",
                "Get active campaign offers",
                no_params,
                |_args| {
                    debug!("getting current offers");
                    Ok(json!([
                        {"item": "Item 1", "discount": "20%", "valid_until": "2023-04-30"},
                        {"item": "Item 2", "discount": "10%", "valid_until": "2023-05-15"},
                        {"item": "Item 3", "discount": "15%", "valid_until": "2023-04-25"}
                    ]))
                },
            ),
            Tool::new(
                "add_to_cart",
                "Add an item to the cart",
                json!({
                    "type": "object",
                    "properties": {
                        "item": {"type": "string", "description": "Item name"},
                        "quantity": {"type": "integer", "description": "Quantity to add"}
                    },
                    "required": ["item"]
                }),
                |args| {
                    let item = args.get("item").and_then(|i| i.as_str()).unwrap_or("");
                    let quantity = args.get("quantity").and_then(|q| q.as_i64()).unwrap_or(1);
                    debug!(item, quantity, "adding to cart");
                    Ok(json!({"status": "added", "item": item, "quantity": quantity}))
                },
            ),
            Tool::new(
                "checkout",
                "Check out the cart",
                json!({"type": "object", "properties": {}, "required": []}),
                |_args| {
                    debug!("checking out cart");
                    Ok(json!({"status": "completed", "order_id": "12345", "total": 69.98}))
                },
            ),
        ],
        provider,
    )
}
