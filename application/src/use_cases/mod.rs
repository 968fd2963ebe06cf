//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod judge_turn;
pub mod persona_turn;
pub mod run_debate;
pub mod select_models;

#[cfg(test)]
pub(crate) mod testing;
