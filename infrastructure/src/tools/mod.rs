//! Research tools available to debaters.
//!
//! | Tool | Backend |
//! |------|---------|
//! | `web_search` | DuckDuckGo Instant Answer API |

mod web_search;

pub use web_search::{MAX_RELATED_TOPICS, WebSearchExecutor, format_search_results};
