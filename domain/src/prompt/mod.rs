//! Prompt domain
//!
//! Templates for opening a debate, continuing it, extending personas with
//! tools and asking the judge for scores.

mod template;

pub use template::PromptTemplate;
