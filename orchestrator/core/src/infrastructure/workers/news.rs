// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::llm::LLMProvider;

use super::{DeviceWorker, Tool};

/// News API worker.
pub fn worker(provider: Arc<dyn LLMProvider>) -> DeviceWorker {
    DeviceWorker::new(
        "news",
        "Fetches headlines and searches articles through the news API.",
        vec![
            Tool::new(
                "get_top_headlines",
                "Get the top news headlines",
                json!({"type": "object", "properties": {}, "required": []}),
                |_args| {
                    debug!("getting top headlines");
                    Ok(json!([
                        {"title": "Breaking News", "source": "CNN", "url": "https://example.com/1"},
                        {"title": "Local Update", "source": "Local News", "url": "https://example.com/2"},
                        {"title": "Technology News", "source": "Tech Daily", "url": "https://example.com/3"}
                    ]))
                },
            ),
            Tool::new(
                "get_news_by_category",
                "Get news for one category",
                json!({
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category of news (e.g., technology, sports, politics)"
                        }
                    },
                    "required": ["category"]
                }),
                |args| {
                    let category = args
                        .get("category")
                        .and_then(|c| c.as_str())
                        .unwrap_or("general");
                    debug!(category, "getting news by category");
                    Ok(json!([
                        {"title": format!("{category} News 1"), "source": "News Source", "url": "https://example.com/4"},
                        {"title": format!("{category} News 2"), "source": "News Source", "url": "https://example.com/5"}
                    ]))
                },
            ),
            Tool::new(
                "search_news",
                "Search for news articles",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "Search term"}
                    },
                    "required": ["query"]
                }),
                |args| {
                    let query = args.get("query").and_then(|q| q.as_str()).unwrap_or("");
                    debug!(query, "searching news");
                    Ok(json!([
                        {"title": format!("Result for {query} 1"), "source": "News Source", "url": "https://example.com/6"},
                        {"title": format!("Result for {query} 2"), "source": "News Source", "url": "https://example.com/7"}
                    ]))
                },
            ),
        ],
        provider,
    )
}
