//! Console output formatter for debates

use arena_domain::{
    Debate, DebateConfig, DebateState, JudgeScore, Outcome, Participant, Provider, Rubric,
    SessionLog, TieReason, ToolCall, ToolResult, Turn, TurnJudgement, Verdict,
};
use colored::Colorize;

/// Width of headers and rules
const WIDTH: usize = 60;
/// Tool output shown inline before truncation
const TOOL_PREVIEW_CHARS: usize = 120;

/// Formats debate events for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for the whole process
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Startup banner, with a warning when provider keys are missing
    pub fn welcome(missing: &[(Provider, String)]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("🎤 Debate Arena"));
        output.push('\n');
        output.push_str("LLM personas debate while a judge keeps score.\n");
        output.push_str("Press Ctrl+C during a debate to stop it.\n");

        if !missing.is_empty() {
            output.push_str(&format!(
                "\n{} Some providers have no API key; their models are disabled:\n",
                "Warning:".yellow().bold()
            ));
            for (provider, env_var) in missing {
                output.push_str(&format!(
                    "  * {} (set {})\n",
                    provider.display_name(),
                    env_var.bold()
                ));
            }
        }
        output
    }

    /// Overview of a configured debate, shown before confirmation
    pub fn setup_summary(config: &DebateConfig) -> String {
        let kind = config.kind();
        let mut output = Self::section_header("Debate Setup");
        output.push_str(&format!(
            "{} {} {}\n",
            "Type:".cyan().bold(),
            kind.icon(),
            kind.display_name()
        ));
        output.push_str(&format!("{} {}\n", "Topic:".cyan().bold(), config.topic()));
        for (i, participant) in config.participants().iter().enumerate() {
            output.push_str(&format!(
                "{} {} ({})\n",
                format!("Side {}:", i + 1).cyan().bold(),
                participant.label(),
                participant.model.display_name
            ));
        }
        let budget = if kind.is_rap_battle() {
            format!(
                "{} rounds ({} verses)",
                config.max_turns() / 2,
                config.max_turns()
            )
        } else {
            format!("{} turns", config.max_turns())
        };
        output.push_str(&format!("{} {}\n", "Length:".cyan().bold(), budget));
        let judge = config
            .judge_model()
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| "disabled".to_string());
        output.push_str(&format!("{} {}\n", "Judge:".cyan().bold(), judge));
        output.push_str(&format!(
            "{} {}\n",
            "Web search:".cyan().bold(),
            if config.tools_enabled() { "enabled" } else { "disabled" }
        ));
        output
    }

    /// Banner printed before a participant speaks
    pub fn turn_header(index: usize, participant: &Participant, max_turns: usize) -> String {
        format!(
            "\n{}\n",
            format!(
                "── {} ({}) · Turn {}/{} ──",
                participant.label(),
                participant.model.display_name,
                index + 1,
                max_turns
            )
            .yellow()
            .bold()
        )
    }

    pub fn tool_call(call: &ToolCall) -> String {
        let query = call
            .arguments
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        format!("{} {} {}", "🔍".dimmed(), call.tool_name.dimmed(), query.italic())
    }

    pub fn tool_result(result: &ToolResult) -> String {
        match (&result.output, &result.error) {
            (_, Some(error)) => format!("{} {}", "x".red(), error.to_string().dimmed()),
            (Some(output), None) => {
                let preview: String = output
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("")
                    .chars()
                    .take(TOOL_PREVIEW_CHARS)
                    .collect();
                format!("{} {}", "v".green(), preview.dimmed())
            }
            (None, None) => format!("{} {}", "v".green(), "(no output)".dimmed()),
        }
    }

    pub fn tool_dropped(tool_name: &str, reason: &str) -> String {
        format!(
            "{} ignored malformed {} call: {}",
            "!".yellow(),
            tool_name,
            reason
        )
    }

    /// Per-turn judge table, or a placeholder when no score is available
    pub fn judgement(turn: &Turn, judgement: &TurnJudgement) -> String {
        let title = format!("⚖️  Judge · Turn {} ({})", turn.number(), turn.speaker());
        match judgement {
            TurnJudgement::Scored(score) => {
                format!("\n{}\n{}", title.magenta().bold(), Self::score_table(score))
            }
            TurnJudgement::Unavailable { reason } => format!(
                "\n{} {}\n",
                title.magenta().bold(),
                format!("no score available: {}", reason).dimmed()
            ),
        }
    }

    fn score_table(score: &JudgeScore) -> String {
        let rubric = score.rubric();
        let mut output = String::new();
        for (key, value) in score.scores() {
            let label = rubric.criterion(key).map(|c| c.label).unwrap_or(key);
            output.push_str(&format!(
                "  {:<28} {:>2}/10 {}\n",
                label,
                value,
                Self::bar(value)
            ));
        }
        output.push_str(&format!(
            "  {:<28} {}\n",
            "Total".bold(),
            format!("{}/{}", score.total(), rubric.max_total()).bold()
        ));
        let highlights = match rubric {
            Rubric::Political => "Strengths",
            Rubric::RapBattle => "Best bars",
        };
        if !score.highlights().is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{}:", highlights).green(),
                score.highlights().join("; ")
            ));
        }
        if !score.weaknesses().is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                "Weaknesses:".yellow(),
                score.weaknesses().join("; ")
            ));
        }
        if !score.feedback().is_empty() {
            output.push_str(&format!("  {} {}\n", "Feedback:".cyan(), score.feedback()));
        }
        output
    }

    fn bar(value: u8) -> String {
        let filled = usize::from(value.min(10));
        format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
    }

    /// Final judgment of a completed debate
    pub fn verdict(verdict: &Verdict) -> String {
        let mut output = Self::section_header("Final Judgment");
        let result = match &verdict.outcome {
            Outcome::Winner { name, .. } => format!(
                "🏆 {} wins by {:.1} points",
                name.bold(),
                verdict.margin
            )
            .green()
            .to_string(),
            Outcome::Tie {
                reason: TieReason::EqualTotals,
            } => "🤝 Tie: equal totals".yellow().to_string(),
            Outcome::Tie {
                reason: TieReason::InsufficientScores,
            } => "🤝 Tie: not enough scored turns to decide"
                .yellow()
                .to_string(),
        };
        output.push_str(&format!("{}\n\n", result));

        for tally in &verdict.tallies {
            output.push_str(&format!(
                "  {:<32} {:>6.1}  ({} scored, {} unscored)\n",
                tally.name, tally.total, tally.scored_turns, tally.unscored_turns
            ));
        }

        if !verdict.categories.is_empty() {
            output.push_str(&format!("\n{}\n", "Category winners:".cyan().bold()));
            for category in &verdict.categories {
                let winner = category
                    .winner
                    .map(|seat| verdict.tally(seat).name.as_str())
                    .unwrap_or("Even");
                output.push_str(&format!("  * {}: {}\n", category.label, winner));
            }
        }
        if let Some(quality) = verdict.quality {
            output.push_str(&format!(
                "\n{} {}\n",
                "Quality:".cyan().bold(),
                quality.label()
            ));
        }
        if !verdict.insights.is_empty() {
            output.push_str(&format!("\n{}\n", "Key insights:".cyan().bold()));
            for insight in &verdict.insights {
                output.push_str(&format!("  * {}\n", insight));
            }
        }
        output.push_str(&format!("\n{}\n", verdict.rationale));
        output
    }

    /// One-line outcome of a debate in a terminal state
    pub fn debate_result(debate: &Debate) -> String {
        let turns = debate.transcript().len();
        let max = debate.config().max_turns();
        match debate.state() {
            DebateState::Aborted => format!(
                "\n{} {} ({}/{} turns kept)\n",
                "Debate aborted:".red().bold(),
                debate.abort_reason().unwrap_or("unknown reason"),
                turns,
                max
            ),
            _ => {
                let elapsed = debate
                    .duration()
                    .map(|d| format!(" in {}s", d.num_seconds()))
                    .unwrap_or_default();
                format!(
                    "\n{} {}/{} turns{}\n",
                    "Debate complete:".green().bold(),
                    turns,
                    max,
                    elapsed
                )
            }
        }
    }

    /// Totals for every debate run this session
    pub fn session_summary(log: &SessionLog) -> String {
        let summary = log.summary();
        let mut output = Self::header("Session Summary");
        output.push('\n');
        output.push_str(&format!(
            "{} {} ({} completed, {} aborted)\n",
            "Debates:".cyan().bold(),
            summary.total_debates,
            summary.completed,
            summary.aborted
        ));
        output.push_str(&format!(
            "{} {:.1}%\n",
            "Completion rate:".cyan().bold(),
            summary.completion_rate
        ));
        output.push_str(&format!(
            "{} {} (avg {:.1})\n",
            "Turns:".cyan().bold(),
            summary.total_turns,
            summary.average_turns
        ));
        for (i, record) in log.records().iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} [{}] {} - {}\n",
                i + 1,
                record.topic,
                record.kind.display_name(),
                record.state.as_str(),
                record.winner.as_deref().unwrap_or("no winner")
            ));
        }
        output.push_str(&Self::footer());
        output
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn notice(message: &str) -> String {
        format!("{} {}", "->".cyan(), message)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(WIDTH);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(WIDTH).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_domain::{DebateKind, DebateRecord, ModelSpec, Persona};

    fn plain() {
        colored::control::set_override(false);
    }

    fn config(judge: bool) -> DebateConfig {
        let gpt = ModelSpec::new("gpt-4o", "GPT-4o", "gpt-4o", Provider::OpenAi);
        DebateConfig::builder(DebateKind::PoliticalDebate, "Carbon tax")
            .participants(
                Participant::new(Persona::progressive(), gpt.clone()),
                Participant::new(Persona::conservative(), gpt.clone()),
            )
            .max_turns(2)
            .judge(judge.then_some(gpt))
            .build()
            .unwrap()
    }

    fn debate(turns: &[&str], judgement: Option<TurnJudgement>) -> Debate {
        let config = config(judgement.is_some());
        let mut debate = Debate::new(config);
        debate.start().unwrap();
        for text in turns {
            let mut turn = debate.transcript().draft_next(*text);
            if let Some(j) = &judgement {
                turn = turn.with_judgement(j.clone());
            }
            debate.record_turn(turn).unwrap();
        }
        debate
    }

    fn full_score() -> JudgeScore {
        JudgeScore::try_new(Rubric::Political, Rubric::Political.keys().map(|k| (k, 7)))
            .unwrap()
            .with_feedback("Clear and sourced.")
    }

    #[test]
    fn test_welcome_lists_missing_keys() {
        plain();
        let text = ConsoleFormatter::welcome(&[(Provider::Groq, "GROQ_API_KEY".to_string())]);
        assert!(text.contains("Groq (set GROQ_API_KEY)"));
        assert!(!ConsoleFormatter::welcome(&[]).contains("Warning"));
    }

    #[test]
    fn test_setup_summary() {
        plain();
        let text = ConsoleFormatter::setup_summary(&config(true));
        assert!(text.contains("Topic: Carbon tax"));
        assert!(text.contains("Side 1: 🔴 Progressive Perspective (GPT-4o)"));
        assert!(text.contains("Length: 2 turns"));
        assert!(text.contains("Judge: GPT-4o"));
        assert!(text.contains("Web search: disabled"));
    }

    #[test]
    fn test_turn_header() {
        plain();
        let config = config(false);
        let text = ConsoleFormatter::turn_header(1, &config.participants()[1], 8);
        assert!(text.contains("🔵 Conservative Perspective (GPT-4o) · Turn 2/8"));
    }

    #[test]
    fn test_judgement_table() {
        plain();
        let debate = debate(&["Opening."], None);
        let turn = &debate.transcript().turns()[0];

        let scored = ConsoleFormatter::judgement(turn, &TurnJudgement::Scored(full_score()));
        assert!(scored.contains("Turn 1 (Progressive Perspective)"));
        assert_eq!(scored.matches("/10").count(), 8);
        assert!(scored.contains("56/80"));
        assert!(scored.contains("Feedback: Clear and sourced."));

        let missing =
            ConsoleFormatter::judgement(turn, &TurnJudgement::unavailable("invalid JSON"));
        assert!(missing.contains("no score available: invalid JSON"));
    }

    #[test]
    fn test_verdict_and_result() {
        plain();
        let mut debate = debate(&["a", "b"], Some(TurnJudgement::Scored(full_score())));
        let verdict = Verdict::from_transcript(Rubric::Political, debate.transcript());
        let text = ConsoleFormatter::verdict(&verdict);
        assert!(text.contains("Final Judgment"));
        assert!(text.contains("Tie"));

        debate.complete(Some(verdict)).unwrap();
        assert!(ConsoleFormatter::debate_result(&debate).contains("Debate complete: 2/2 turns"));
    }

    #[test]
    fn test_aborted_result() {
        plain();
        let mut debate = debate(&["a"], None);
        debate.abort("provider error on turn 2").unwrap();
        let text = ConsoleFormatter::debate_result(&debate);
        assert!(text.contains("Debate aborted: provider error on turn 2 (1/2 turns kept)"));
    }

    #[test]
    fn test_session_summary() {
        plain();
        let mut finished = debate(&["a", "b"], None);
        finished.complete(None).unwrap();
        let mut log = SessionLog::new();
        log.push(DebateRecord::from_debate(&finished));

        let text = ConsoleFormatter::session_summary(&log);
        assert!(text.contains("Debates: 1 (1 completed, 0 aborted)"));
        assert!(text.contains("Completion rate: 100.0%"));
        assert!(text.contains("1. Carbon tax [Political Debate] completed - no winner"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
