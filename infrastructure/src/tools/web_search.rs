//! `web_search` backed by the DuckDuckGo Instant Answer API.
//!
//! The API needs no key. It returns abstracts, instant answers,
//! definitions and related topics rather than full result listings, which is
//! enough for a debater to anchor a claim on a source.
//!
//! Results are rendered as markdown sections:
//! - **Summary**: abstract text with source attribution
//! - **Instant Answer**
//! - **Definition**
//! - **Related Topics**: up to [`MAX_RELATED_TOPICS`]
//! - **Redirect**: for bang-style queries

use arena_application::ports::tool_executor::ToolExecutorPort;
use arena_domain::{ToolCall, ToolError, ToolResult, ToolSpec, WEB_SEARCH, default_tool_spec};
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DDG_API_URL: &str = "https://api.duckduckgo.com/";
const USER_AGENT: &str = "debate-arena/0.1 (research tool)";
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_RELATED_TOPICS: usize = 10;

/// Executes `web_search` calls against DuckDuckGo
pub struct WebSearchExecutor {
    client: reqwest::Client,
    spec: ToolSpec,
    endpoint: String,
}

impl WebSearchExecutor {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            spec: default_tool_spec(),
            endpoint: DDG_API_URL.to_string(),
        }
    }

    /// Point the executor at another Instant Answer compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn search(&self, query: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolError::timeout("web search")
                } else {
                    ToolError::execution_failed(format!("Search request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(ToolError::execution_failed(format!(
                "Search API returned error: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to parse search results: {}", e))
        })?;
        Ok(format_search_results(query, &body))
    }
}

#[async_trait]
impl ToolExecutorPort for WebSearchExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        if self.spec.resolve(&call.tool_name) != Some(WEB_SEARCH) {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        }
        let query = match call.require_string("query") {
            Ok(q) => q,
            Err(e) => return ToolResult::failure(WEB_SEARCH, ToolError::invalid_argument(e)),
        };

        debug!("web_search: {}", query);
        let result = match self.search(query).await {
            Ok(output) => ToolResult::success(WEB_SEARCH, output),
            Err(e) => {
                warn!("web_search for '{}' failed: {}", query, e);
                ToolResult::failure(WEB_SEARCH, e)
            }
        };
        result.with_duration(start.elapsed().as_millis() as u64)
    }
}

/// Render an Instant Answer response as markdown
pub fn format_search_results(query: &str, data: &Value) -> String {
    let non_empty = |key: &str| data[key].as_str().filter(|s| !s.is_empty());
    let mut sections = vec![format!("## Search Results for: {}", query)];

    if let Some(text) = non_empty("AbstractText") {
        sections.push(format!(
            "### Summary ({})\n{}\nSource: {}",
            non_empty("AbstractSource").unwrap_or("Unknown"),
            text,
            data["AbstractURL"].as_str().unwrap_or("")
        ));
    }
    if let Some(answer) = non_empty("Answer") {
        sections.push(format!("### Instant Answer\n{}", answer));
    }
    if let Some(definition) = non_empty("Definition") {
        sections.push(format!(
            "### Definition ({})\n{}",
            non_empty("DefinitionSource").unwrap_or("Unknown"),
            definition
        ));
    }

    // Grouped topics carry a `Topics` array instead of `Text`; flatten one level
    let topics: Vec<String> = data["RelatedTopics"]
        .as_array()
        .into_iter()
        .flatten()
        .flat_map(|t| match t["Topics"].as_array() {
            Some(group) => group.iter().collect::<Vec<_>>(),
            None => vec![t],
        })
        .filter_map(|t| {
            let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
            Some(format!("- {} ({})", text, t["FirstURL"].as_str().unwrap_or("")))
        })
        .take(MAX_RELATED_TOPICS)
        .collect();
    if !topics.is_empty() {
        sections.push(format!("### Related Topics\n{}", topics.join("\n")));
    }

    if let Some(redirect) = non_empty("Redirect") {
        sections.push(format!("### Redirect\n{}", redirect));
    }

    if sections.len() == 1 {
        sections.push(
            "No instant answer available. Rely on well-known facts and say when a figure is uncertain."
                .to_string(),
        );
    }
    sections.join("\n\n")
}
