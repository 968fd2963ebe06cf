//! Progress reporting while a debate runs
//!
//! Turn text is streamed straight to stdout as it arrives. Bars and
//! spinners are only drawn between turns so they never interleave with
//! streamed text.

use crate::output::console::ConsoleFormatter;
use arena_application::ports::progress::ProgressNotifier;
use arena_domain::{
    Debate, DebateConfig, Participant, ToolCall, ToolResult, Turn, TurnJudgement, Verdict,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Streams a debate to the terminal with a turn bar and a judge spinner
pub struct ProgressReporter {
    max_turns: Mutex<usize>,
    judge_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            max_turns: Mutex::new(0),
            judge_spinner: Mutex::new(None),
        }
    }

    fn turn_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.judge_spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn stream(chunk: &str) {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(chunk.as_bytes());
    let _ = stdout.flush();
}

impl ProgressNotifier for ProgressReporter {
    fn on_debate_start(&self, config: &DebateConfig) {
        if let Ok(mut max) = self.max_turns.lock() {
            *max = config.max_turns();
        }
        println!(
            "\n{} {} {}",
            config.kind().icon(),
            config.kind().display_name().bold(),
            format!("\"{}\"", config.topic()).italic()
        );
    }

    fn on_turn_start(&self, index: usize, participant: &Participant) {
        let max = self.max_turns.lock().map(|m| *m).unwrap_or(index + 1);

        // A snapshot bar: drawn once, then left in place above the turn.
        let pb = ProgressBar::new(max as u64)
            .with_style(Self::turn_style())
            .with_prefix("Debate")
            .with_position(index as u64);
        pb.abandon_with_message(format!("next: {}", participant.name()));

        println!("{}", ConsoleFormatter::turn_header(index, participant, max));
    }

    fn on_turn_chunk(&self, chunk: &str) {
        stream(chunk);
    }

    fn on_tool_call(&self, call: &ToolCall) {
        println!("\n{}", ConsoleFormatter::tool_call(call));
    }

    fn on_tool_dropped(&self, tool_name: &str, reason: &str) {
        println!("\n{}", ConsoleFormatter::tool_dropped(tool_name, reason));
    }

    fn on_tool_result(&self, result: &ToolResult) {
        println!("{}\n", ConsoleFormatter::tool_result(result));
    }

    fn on_turn_complete(&self, _turn: &Turn) {
        println!("\n");
    }

    fn on_judge_start(&self, turn: &Turn) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Judge");
        pb.set_message(format!("scoring turn {}...", turn.number()));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.judge_spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_judgement(&self, turn: &Turn, judgement: &TurnJudgement) {
        self.clear_spinner();
        println!("{}", ConsoleFormatter::judgement(turn, judgement));
    }

    fn on_verdict(&self, verdict: &Verdict) {
        println!("{}", ConsoleFormatter::verdict(verdict));
    }

    fn on_debate_end(&self, debate: &Debate) {
        self.clear_spinner();
        println!("{}", ConsoleFormatter::debate_result(debate));
    }
}

/// Simple text-based progress (no bars or spinners)
pub struct SimpleProgress;

impl SimpleProgress {
    /// One-line judge result
    pub fn judgement_line(turn: &Turn, judgement: &TurnJudgement) -> String {
        match judgement {
            TurnJudgement::Scored(score) => format!(
                "  {} Turn {}: {}/{}",
                "⚖️".magenta(),
                turn.number(),
                score.total(),
                score.rubric().max_total()
            ),
            TurnJudgement::Unavailable { reason } => format!(
                "  {} Turn {}: no score ({})",
                "⚖️".magenta(),
                turn.number(),
                reason
            ),
        }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_debate_start(&self, config: &DebateConfig) {
        println!(
            "{} {} ({} turns)",
            "->".cyan(),
            config.topic().bold(),
            config.max_turns()
        );
    }

    fn on_turn_start(&self, index: usize, participant: &Participant) {
        println!("\n{} {}", format!("[{}]", index + 1).cyan(), participant.label().bold());
    }

    fn on_turn_chunk(&self, chunk: &str) {
        stream(chunk);
    }

    fn on_turn_complete(&self, _turn: &Turn) {
        println!();
    }

    fn on_judgement(&self, turn: &Turn, judgement: &TurnJudgement) {
        println!("{}", Self::judgement_line(turn, judgement));
    }

    fn on_verdict(&self, verdict: &Verdict) {
        println!("{}", ConsoleFormatter::verdict(verdict));
    }

    fn on_debate_end(&self, debate: &Debate) {
        println!("{}", ConsoleFormatter::debate_result(debate));
    }
}
