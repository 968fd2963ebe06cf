//! Reads the transcript back out of an exported markdown document.

use super::ExportError;
use super::markdown::{FINAL_HEADING, JUDGE_HEADING, SUMMARY_HEADING, TRANSCRIPT_HEADING};
use std::path::Path;

/// Ordered `(speaker, text)` pairs from an exported debate.
///
/// Judge tables are skipped. A turn section runs until the heading of the
/// next turn number, its judge block, or the final judgment. Escaped body
/// lines are restored.
pub fn parse_transcript(markdown: &str) -> Result<Vec<(String, String)>, ExportError> {
    let mut lines = markdown.lines();
    if !lines.any(|line| line.trim_end() == TRANSCRIPT_HEADING) {
        return Err(ExportError::MissingTranscript);
    }

    let mut turns: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut in_judge_block = false;

    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == FINAL_HEADING || trimmed == SUMMARY_HEADING {
            break;
        }
        let next_number = turns.len() + usize::from(current.is_some()) + 1;
        if let Some(speaker) = parse_heading(trimmed, next_number) {
            flush(&mut turns, current.take());
            current = Some((speaker.to_string(), Vec::new()));
            in_judge_block = false;
        } else if trimmed == JUDGE_HEADING {
            in_judge_block = true;
        } else if !in_judge_block && let Some((_, body)) = current.as_mut() {
            body.push(unescape_line(line));
        }
    }
    flush(&mut turns, current);
    Ok(turns)
}

pub fn parse_transcript_file(path: &Path) -> Result<Vec<(String, String)>, ExportError> {
    let markdown = std::fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_transcript(&markdown)
}

fn flush(turns: &mut Vec<(String, String)>, section: Option<(String, Vec<&str>)>) {
    if let Some((speaker, body)) = section {
        turns.push((speaker, body.join("\n").trim().to_string()));
    }
}

/// Inverse of the export escaping: drop one leading `\\`
fn unescape_line(line: &str) -> &str {
    line.strip_prefix('\\').unwrap_or(line)
}

/// Speaker of a `### {icon} {speaker} - Turn {number}` heading
fn parse_heading(line: &str, number: usize) -> Option<&str> {
    let rest = line.strip_prefix("### ")?;
    let rest = rest.strip_suffix(&format!(" - Turn {}", number))?;
    let speaker = rest.split_once(' ').map(|(_, s)| s).unwrap_or(rest);
    Some(speaker.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::markdown::render_debate;
    use crate::export::testing::{finished_debate, judged_debate};
    use chrono::Local;

    #[test]
    fn test_round_trip_preserves_dialogue() {
        let debate = finished_debate(&[
            "UBI gives people security.\n\nPilots in Finland showed better wellbeing.",
            "The cost is enormous:\n- $3T a year\n- higher taxes",
            "Automation changes the math. ### is not a heading here",
            "Targeted programs do more with less.",
        ]);
        let doc = render_debate(&debate, Local::now());
        assert_eq!(parse_transcript(&doc).unwrap(), debate.transcript().dialogue());
    }

    #[test]
    fn test_round_trip_with_markdown_headings_in_replies() {
        let debate = finished_debate(&[
            "Point one.\n\n## Summary\n\nUBI works.",
            "Rebuttal.\n## Final Judgment\n#### ⚖️ Judge Scores\n### 🔵 Conservative Perspective - Turn 3",
            "\\escaped already\n\\# odd",
        ]);
        let doc = render_debate(&debate, Local::now());
        assert!(doc.contains("\\## Summary"));
        assert_eq!(parse_transcript(&doc).unwrap(), debate.transcript().dialogue());
    }

    #[test]
    fn test_judge_blocks_skipped() {
        let debate = judged_debate();
        let doc = render_debate(&debate, Local::now());
        let parsed = parse_transcript(&doc).unwrap();
        assert_eq!(parsed, debate.transcript().dialogue());
        assert!(parsed.iter().all(|(_, text)| !text.contains("Criterion")));
    }

    #[test]
    fn test_heading_for_wrong_turn_is_text() {
        let doc = "## Debate Transcript\n\n### 🔴 A - Turn 1\n\nquoting:\n### 🔵 B - Turn 7\n\n### 🔵 B - Turn 2\n\nreply\n\n## Summary\n";
        let parsed = parse_transcript(doc).unwrap();
        assert_eq!(
            parsed,
            [
                ("A".to_string(), "quoting:\n### 🔵 B - Turn 7".to_string()),
                ("B".to_string(), "reply".to_string())
            ]
        );
    }

    #[test]
    fn test_missing_transcript() {
        assert!(matches!(
            parse_transcript("# Notes\n\nnothing here"),
            Err(ExportError::MissingTranscript)
        ));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.md");
        let debate = finished_debate(&["first", "second"]);
        std::fs::write(&path, render_debate(&debate, Local::now())).unwrap();
        assert_eq!(parse_transcript_file(&path).unwrap().len(), 2);
    }
}
