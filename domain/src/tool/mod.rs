//! Tool domain module
//!
//! Personas can be given research tools. Every tool is defined by a
//! [`ToolDefinition`], invoked via a [`ToolCall`], and returns a
//! [`ToolResult`]. Calls coming from a model pass through
//! [`filter_tool_call`] before execution.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ filter       │───▶│ ToolResult   │
//! │ (registry)   │    │ (from model) │    │ (schema)     │    │ (ephemeral)  │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```

pub mod argument_filter;
pub mod entities;
pub mod value_objects;

pub use argument_filter::{FilteredCall, MalformedToolCall, filter_tool_call};
pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use value_objects::{ToolError, ToolResult};

/// Name of the built-in research tool
pub const WEB_SEARCH: &str = "web_search";

/// Definition of the built-in web search tool
pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web for current facts, statistics and sources",
    )
    .with_parameter(
        ToolParameter::new("query", "What to search for", true)
            .with_aliases(["search_query", "q", "input", "text"]),
    )
}

/// Tool spec containing the built-in tools and their common misnamings
pub fn default_tool_spec() -> ToolSpec {
    ToolSpec::new()
        .register(web_search_definition())
        .register_alias("search_web", WEB_SEARCH)
        .register_alias("search", WEB_SEARCH)
        .register_alias("google_search", WEB_SEARCH)
}
