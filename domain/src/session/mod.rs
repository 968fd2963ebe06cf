//! LLM conversation primitives.
//!
//! - [`entities::Message`]: a single chat message
//! - [`stream::StreamEvent`]: one event of a streamed reply

pub mod entities;
pub mod stream;
