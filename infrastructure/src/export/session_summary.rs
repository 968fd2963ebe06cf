//! Markdown overview of every debate run in one session

use super::markdown::cell;
use arena_domain::{DebateRecord, SessionLog};
use chrono::{DateTime, Local};
use std::fmt::Write;
use std::path::Path;

/// `session_summary_{YYYYMMDD_HHMMSS}.md`
pub fn session_summary_file_name(at: DateTime<Local>) -> String {
    format!("session_summary_{}.md", at.format("%Y%m%d_%H%M%S"))
}

/// Render the session overview.
///
/// Links to exported debates are made relative to `output_dir` when the
/// export lives inside it.
pub fn render_session_summary(log: &SessionLog, output_dir: &Path, at: DateTime<Local>) -> String {
    let summary = log.summary();
    let mut out = String::new();

    out.push_str("# Debate Session Summary\n\n");
    let _ = writeln!(out, "- **Generated:** {}", at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "- **Total debates:** {}", summary.total_debates);
    let _ = writeln!(out, "- **Completed:** {}", summary.completed);
    let _ = writeln!(out, "- **Aborted:** {}", summary.aborted);
    let _ = writeln!(out, "- **Completion rate:** {:.1}%", summary.completion_rate);
    let _ = writeln!(out, "- **Total turns:** {}", summary.total_turns);
    let _ = writeln!(out, "- **Average turns:** {:.1}", summary.average_turns);

    out.push_str("\n## Debates\n\n");
    out.push_str("| # | Topic | Type | Participants | Judge | Tools | Turns | Status | Winner |\n");
    out.push_str("|---|-------|------|--------------|-------|-------|-------|--------|--------|\n");
    for (i, record) in log.records().iter().enumerate() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {}/{} | {} | {} |",
            i + 1,
            cell(&record.topic),
            record.kind.display_name(),
            cell(&participants(record)),
            if record.judge_enabled { "Yes" } else { "No" },
            if record.tools_enabled { "Yes" } else { "No" },
            record.turns,
            record.max_turns,
            record.state.as_str(),
            cell(record.winner.as_deref().unwrap_or("-")),
        );
    }

    let exported: Vec<_> = log
        .records()
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.export_path.as_ref().map(|p| (i, r, p)))
        .collect();
    if !exported.is_empty() {
        out.push_str("\n## Debate Files\n\n");
        for (i, record, path) in exported {
            let link = path.strip_prefix(output_dir).unwrap_or(path);
            let _ = writeln!(out, "{}. [{}]({})", i + 1, record.topic, link.display());
        }
    }

    out.push_str("\n---\n*Generated by debate-arena*\n");
    out
}

fn participants(record: &DebateRecord) -> String {
    let [(first, first_model), (second, second_model)] = &record.participants;
    format!("{} ({}) vs {} ({})", first, first_model, second, second_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::testing::finished_debate;
    use arena_domain::DebateState;
    use chrono::TimeZone;
    use std::path::PathBuf;

    #[test]
    fn test_summary_table_and_links() {
        let debate = finished_debate(&["a", "b"]);
        let mut aborted = DebateRecord::from_debate(&debate);
        aborted.state = DebateState::Aborted;
        aborted.turns = 1;

        let mut log = SessionLog::new();
        log.push(
            DebateRecord::from_debate(&debate)
                .with_export_path(PathBuf::from("debates/20250101_120000_ubi_political_debate.md")),
        );
        log.push(aborted);

        let at = Local.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap();
        let doc = render_session_summary(&log, Path::new("debates"), at);

        assert_eq!(session_summary_file_name(at), "session_summary_20250101_123000.md");
        assert!(doc.contains("- **Total debates:** 2"));
        assert!(doc.contains("- **Completion rate:** 50.0%"));
        assert!(doc.contains("- **Average turns:** 1.5"));
        assert!(doc.contains("| 2/4 | completed |"));
        assert!(doc.contains("| 1/4 | aborted |"));
        assert!(doc.contains(
            "1. [Universal basic income](20250101_120000_ubi_political_debate.md)"
        ));
        assert!(!doc.contains("2. [Universal basic income]"));
    }
}
