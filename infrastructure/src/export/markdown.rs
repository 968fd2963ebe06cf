//! Markdown rendering of a finished (or aborted) debate

use arena_domain::{Debate, JudgeScore, Outcome, Rubric, TieReason, TurnJudgement, Verdict};
use chrono::{DateTime, Local};
use std::fmt::Write;

pub(crate) const TRANSCRIPT_HEADING: &str = "## Debate Transcript";
pub(crate) const JUDGE_HEADING: &str = "#### ⚖️ Judge Scores";
pub(crate) const FINAL_HEADING: &str = "## Final Judgment";
pub(crate) const SUMMARY_HEADING: &str = "## Summary";
const TOPIC_FILE_CHARS: usize = 50;

/// `### {icon} {speaker} - Turn {n}`
pub(crate) fn turn_heading(icon: &str, speaker: &str, number: usize) -> String {
    format!("### {} {} - Turn {}", icon, speaker, number)
}

/// Topic reduced to characters safe in a file name: alphanumerics, `-`
/// and `_`, spaces turned into `_`, at most 50 characters.
pub fn safe_topic(topic: &str) -> String {
    let kept: String = topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe: String = kept
        .trim_end()
        .replace(' ', "_")
        .chars()
        .take(TOPIC_FILE_CHARS)
        .collect();
    if safe.is_empty() {
        "untitled".to_string()
    } else {
        safe
    }
}

/// `{YYYYMMDD_HHMMSS}_{safe_topic}_{kind}.md`
pub fn export_file_name(debate: &Debate, at: DateTime<Local>) -> String {
    format!(
        "{}_{}_{}.md",
        at.format("%Y%m%d_%H%M%S"),
        safe_topic(debate.config().topic()),
        debate.config().kind().as_str()
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Escape a value for use inside a table cell
pub(crate) fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Model text placed in the document body. Lines starting with `#` or `\\`
/// get a leading `\\` so they can never read as section headings.
pub(crate) fn escape_block(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with('#') || line.starts_with('\\') {
                format!("\\{}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the whole debate document
pub fn render_debate(debate: &Debate, generated_at: DateTime<Local>) -> String {
    let config = debate.config();
    let kind = config.kind();
    let mut out = String::new();

    let _ = writeln!(out, "# {}: {}\n", kind.display_name(), config.topic());
    let _ = writeln!(out, "- **Date:** {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "- **Type:** {} {}", kind.icon(), kind.display_name());
    let _ = writeln!(out, "- **Tools enabled:** {}", yes_no(config.tools_enabled()));
    let _ = writeln!(out, "- **Judge enabled:** {}", yes_no(config.judge_enabled()));
    if let Some(judge) = config.judge_model() {
        let _ = writeln!(out, "- **Judge model:** {}", judge.display_name);
    }
    if let Some(duration) = debate.duration() {
        let _ = writeln!(out, "- **Duration:** {}s", duration.num_seconds());
    }

    out.push_str("\n## Participants\n\n| Side | Persona | Model |\n|------|---------|-------|\n");
    for (i, participant) in config.participants().iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            i + 1,
            cell(&participant.label()),
            cell(&participant.model.display_name)
        );
    }

    let _ = writeln!(out, "\n{}\n", TRANSCRIPT_HEADING);
    for turn in debate.transcript().turns() {
        let icon = &config.participant(turn.seat()).persona.icon;
        let _ = writeln!(out, "{}\n", turn_heading(icon, turn.speaker(), turn.number()));
        let _ = writeln!(out, "{}\n", escape_block(turn.text()));
        if let Some(judgement) = turn.judgement() {
            render_judgement(&mut out, kind.rubric(), judgement);
        }
    }

    let _ = writeln!(out, "{}\n", FINAL_HEADING);
    match (debate.verdict(), debate.abort_reason()) {
        (_, Some(reason)) => {
            let _ = writeln!(out, "Debate aborted: {}\n", reason);
        }
        (Some(verdict), None) => render_verdict(&mut out, verdict),
        (None, None) => out.push_str("_Judge disabled: no scores recorded._\n\n"),
    }

    let _ = writeln!(out, "{}\n", SUMMARY_HEADING);
    let _ = writeln!(out, "- **Total turns:** {}", debate.transcript().len());
    let _ = writeln!(out, "- **Max turns:** {}", config.max_turns());
    let _ = writeln!(out, "- **Final state:** {}", debate.state().as_str());
    out.push_str("\n---\n*Generated by debate-arena*\n");
    out
}

fn render_judgement(out: &mut String, rubric: Rubric, judgement: &TurnJudgement) {
    let _ = writeln!(out, "{}\n", JUDGE_HEADING);
    match judgement {
        TurnJudgement::Scored(score) => render_score(out, rubric, score),
        TurnJudgement::Unavailable { reason } => {
            let _ = writeln!(out, "_No score available: {}_\n", reason);
        }
    }
}

fn render_score(out: &mut String, rubric: Rubric, score: &JudgeScore) {
    out.push_str("| Criterion | Score |\n|-----------|-------|\n");
    for (key, value) in score.scores() {
        let label = rubric.criterion(key).map(|c| c.label).unwrap_or(key);
        let _ = writeln!(out, "| {} | {}/10 |", label, value);
    }
    let _ = writeln!(out, "| **Total** | **{}/{}** |\n", score.total(), rubric.max_total());

    let highlights_label = match rubric {
        Rubric::Political => "Strengths",
        Rubric::RapBattle => "Best bars",
    };
    if !score.highlights().is_empty() {
        let line = format!("**{}:** {}", highlights_label, score.highlights().join("; "));
        let _ = writeln!(out, "{}", escape_block(&line));
    }
    if !score.weaknesses().is_empty() {
        let line = format!("**Weaknesses:** {}", score.weaknesses().join("; "));
        let _ = writeln!(out, "{}", escape_block(&line));
    }
    if !score.feedback().is_empty() {
        let line = format!("**Feedback:** {}", score.feedback());
        let _ = writeln!(out, "{}", escape_block(&line));
    }
    out.push('\n');
}

fn render_verdict(out: &mut String, verdict: &Verdict) {
    match &verdict.outcome {
        Outcome::Winner { name, .. } => {
            let _ = writeln!(
                out,
                "**Result:** 🏆 **{}** wins by {:.1} points\n",
                name, verdict.margin
            );
        }
        Outcome::Tie {
            reason: TieReason::EqualTotals,
        } => out.push_str("**Result:** 🤝 **Tie** (equal totals)\n\n"),
        Outcome::Tie {
            reason: TieReason::InsufficientScores,
        } => out.push_str("**Result:** 🤝 **Tie** (not enough scored turns to decide)\n\n"),
    }

    out.push_str("| Speaker | Scored turns | Total |\n|---------|--------------|-------|\n");
    for tally in &verdict.tallies {
        let _ = writeln!(
            out,
            "| {} | {} | {:.1} |",
            cell(&tally.name),
            tally.scored_turns,
            tally.total
        );
    }
    out.push('\n');

    if !verdict.categories.is_empty() {
        out.push_str("**Category winners:**\n");
        for category in &verdict.categories {
            let winner = category
                .winner
                .map(|seat| verdict.tally(seat).name.as_str())
                .unwrap_or("Even");
            let _ = writeln!(out, "- {}: {}", category.label, winner);
        }
        out.push('\n');
    }
    if let Some(quality) = verdict.quality {
        let _ = writeln!(out, "**Quality:** {}\n", quality.label());
    }
    if !verdict.insights.is_empty() {
        out.push_str("**Key insights:**\n");
        for insight in &verdict.insights {
            let _ = writeln!(out, "- {}", insight);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "**Judge's summary:** {}\n", verdict.rationale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::testing::{finished_debate, judged_debate};
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 5, 7).unwrap()
    }

    #[test]
    fn test_safe_topic() {
        assert_eq!(safe_topic("Should we tax carbon?"), "Should_we_tax_carbon");
        assert_eq!(safe_topic("Tupac vs. Biggie!!  "), "Tupac_vs_Biggie");
        assert_eq!(safe_topic("???"), "untitled");
        assert_eq!(safe_topic(&"a".repeat(80)).len(), 50);
    }

    #[test]
    fn test_escape_block() {
        assert_eq!(
            escape_block("plain\n# Title\n\\path\n  ## indented"),
            "plain\n\\# Title\n\\\\path\n  ## indented"
        );
    }

    #[test]
    fn test_file_name() {
        let debate = finished_debate(&["one", "two"]);
        assert_eq!(
            export_file_name(&debate, at()),
            "20250314_090507_Universal_basic_income_political_debate.md"
        );
    }

    #[test]
    fn test_document_layout() {
        let debate = finished_debate(&["Opening for UBI.", "Rebuttal on cost."]);
        let doc = render_debate(&debate, at());

        assert!(doc.starts_with("# Political Debate: Universal basic income\n"));
        assert!(doc.contains("- **Date:** 2025-03-14 09:05:07"));
        assert!(doc.contains("- **Judge enabled:** No"));
        assert!(doc.contains("| 1 | 🔴 Progressive Perspective | GPT-4o |"));
        assert!(doc.contains("### 🔴 Progressive Perspective - Turn 1\n\nOpening for UBI."));
        assert!(doc.contains("### 🔵 Conservative Perspective - Turn 2\n\nRebuttal on cost."));
        assert!(doc.contains("_Judge disabled: no scores recorded._"));
        assert!(doc.contains("- **Total turns:** 2"));
        assert!(doc.contains("- **Final state:** completed"));
        assert!(!doc.contains(JUDGE_HEADING));
    }

    #[test]
    fn test_judge_tables_and_verdict() {
        let debate = judged_debate();
        let doc = render_debate(&debate, at());
        assert_eq!(doc.matches(JUDGE_HEADING).count(), 2);
        assert!(doc.contains("| Logic & Reasoning | 9/10 |"));
        assert!(doc.contains("| **Total** | **72/80** |"));
        assert!(doc.contains("_No score available: judge timed out_"));
        assert!(doc.contains("**Result:** 🤝 **Tie** (not enough scored turns to decide)"));
    }
}
