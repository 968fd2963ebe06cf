//! Progress notification port
//!
//! Defines the interface for reporting progress while a debate runs.

use arena_domain::{
    Debate, DebateConfig, Participant, ToolCall, ToolResult, Turn, TurnJudgement, Verdict,
};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and render the debate
/// as it happens (streamed text, progress bar, judge tables).
pub trait ProgressNotifier: Send + Sync {
    /// Called once the debate has passed validation and started
    fn on_debate_start(&self, config: &DebateConfig);

    /// Called before a participant starts speaking
    fn on_turn_start(&self, index: usize, participant: &Participant);

    /// Called when a participant's turn is complete (before judging)
    fn on_turn_complete(&self, turn: &Turn);

    /// Called when the debate reaches a terminal state
    fn on_debate_end(&self, debate: &Debate);

    // ==================== Stream Callbacks ====================

    /// Called for each text chunk while a participant is speaking
    fn on_turn_chunk(&self, _chunk: &str) {}

    // ==================== Tool Callbacks ====================

    /// Called when a filtered tool call is about to run
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called when a tool call was malformed and dropped
    fn on_tool_dropped(&self, _tool_name: &str, _reason: &str) {}

    /// Called with each tool result
    fn on_tool_result(&self, _result: &ToolResult) {}

    // ==================== Judge Callbacks ====================

    /// Called before the judge evaluates a turn
    fn on_judge_start(&self, _turn: &Turn) {}

    /// Called with the judge's result for a turn
    fn on_judgement(&self, _turn: &Turn, _judgement: &TurnJudgement) {}

    /// Called with the final verdict of a completed debate
    fn on_verdict(&self, _verdict: &Verdict) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_debate_start(&self, _config: &DebateConfig) {}
    fn on_turn_start(&self, _index: usize, _participant: &Participant) {}
    fn on_turn_complete(&self, _turn: &Turn) {}
    fn on_debate_end(&self, _debate: &Debate) {}
}
