//! Judge reply parsing.
//!
//! Pure text handling: locate the JSON object in a free-form LLM reply and
//! validate it against the rubric. No retries happen here; the caller
//! decides what to do with a [`ScoreFormatError`].

use serde_json::Value;

use super::rubric::Rubric;
use super::score::{JudgeScore, ScoreFormatError};

/// Extract the outermost `{ ... }` span from a reply.
///
/// Handles replies wrapped in markdown code fences or surrounded by prose.
pub fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    Some(&response[start..start + end + 1])
}

/// Parse and validate a judge reply.
///
/// Scores are read from a `"scores"` object, or from the top level when
/// the model flattened them. Every rubric criterion must be present as a
/// JSON integer within `0..=10`.
///
/// ```
/// use arena_domain::judge::{Rubric, parse_judge_response};
///
/// let reply = r#"Verdict: {"scores": {"flow_delivery": 8, "lyrical_complexity": 7,
///   "wordplay_creativity": 9, "punchlines_impact": 8, "crowd_appeal": 7,
///   "battle_tactics": 6, "rhyme_scheme": 8, "originality": 7},
///  "best_bars": ["bar one"], "feedback": "Strong closer"}"#;
/// let score = parse_judge_response(Rubric::RapBattle, reply).unwrap();
/// assert_eq!(score.total(), 60);
/// ```
pub fn parse_judge_response(rubric: Rubric, response: &str) -> Result<JudgeScore, ScoreFormatError> {
    let json_str = extract_json_object(response).ok_or(ScoreFormatError::NoJson)?;
    let parsed: Value = serde_json::from_str(json_str)
        .map_err(|e| ScoreFormatError::InvalidJson(e.to_string()))?;

    let scores_obj = match parsed.get("scores") {
        Some(Value::Object(map)) => map,
        Some(_) => return Err(ScoreFormatError::MissingScores),
        None => match &parsed {
            Value::Object(map) if rubric.keys().any(|k| map.contains_key(k)) => map,
            _ => return Err(ScoreFormatError::MissingScores),
        },
    };

    let mut raw = Vec::with_capacity(8);
    for key in rubric.keys() {
        let value = scores_obj
            .get(key)
            .ok_or_else(|| ScoreFormatError::MissingCriterion(key.to_string()))?;
        let int = value.as_i64().ok_or_else(|| ScoreFormatError::NotAnInteger {
            criterion: key.to_string(),
            value: value.to_string(),
        })?;
        raw.push((key, int));
    }

    let mut score = JudgeScore::try_new(rubric, raw)?;

    if let Some(Value::Object(rationale)) = parsed.get("rationale") {
        for (key, text) in rationale {
            if let Some(text) = text.as_str() {
                score = score.with_rationale(key.clone(), text);
            }
        }
    }

    let highlights = string_list(&parsed, rubric.highlights_key())
        .or_else(|| string_list(&parsed, "strengths"))
        .unwrap_or_default();
    let weaknesses = string_list(&parsed, "weaknesses").unwrap_or_default();
    let feedback = ["feedback", "specific_feedback", "judge_comments"]
        .iter()
        .find_map(|k| parsed.get(*k).and_then(|v| v.as_str()))
        .unwrap_or_default();

    Ok(score
        .with_highlights(highlights)
        .with_weaknesses(weaknesses)
        .with_feedback(feedback))
}

fn string_list(value: &Value, key: &str) -> Option<Vec<String>> {
    value.get(key).and_then(|v| v.as_array()).map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::to_string)
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn political_reply(overrides: &[(&str, &str)]) -> String {
        let mut fields: Vec<String> = Vec::new();
        for key in Rubric::Political.keys() {
            let value = overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| "7".to_string());
            fields.push(format!("\"{}\": {}", key, value));
        }
        format!(
            r#"Here is my evaluation:
```json
{{"scores": {{{}}}, "rationale": {{"logic_reasoning": "tight"}}, "strengths": ["clear"], "weaknesses": ["no data"], "feedback": "Cite sources."}}
```"#,
            fields.join(", ")
        )
    }

    #[test]
    fn test_parse_fenced_reply() {
        let score = parse_judge_response(Rubric::Political, &political_reply(&[])).unwrap();
        assert_eq!(score.total(), 56);
        assert_eq!(score.rationale("logic_reasoning"), Some("tight"));
        assert_eq!(score.highlights(), ["clear".to_string()]);
        assert_eq!(score.weaknesses(), ["no data".to_string()]);
        assert_eq!(score.feedback(), "Cite sources.");
    }

    #[test]
    fn test_parse_flat_scores() {
        let body: Vec<String> = Rubric::RapBattle
            .keys()
            .map(|k| format!("\"{}\": 6", k))
            .collect();
        let reply = format!("{{{}, \"judge_comments\": \"ok\"}}", body.join(", "));
        let score = parse_judge_response(Rubric::RapBattle, &reply).unwrap();
        assert_eq!(score.total(), 48);
        assert_eq!(score.feedback(), "ok");
    }

    #[test]
    fn test_no_json() {
        assert_eq!(
            parse_judge_response(Rubric::Political, "I'd give it an 8."),
            Err(ScoreFormatError::NoJson)
        );
    }

    #[test]
    fn test_broken_json() {
        assert!(matches!(
            parse_judge_response(Rubric::Political, "{\"scores\": {\"logic_reasoning\": }"),
            Err(ScoreFormatError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_scores_object() {
        assert_eq!(
            parse_judge_response(Rubric::Political, r#"{"verdict": "good"}"#),
            Err(ScoreFormatError::MissingScores)
        );
    }

    #[test]
    fn test_fractional_score_rejected() {
        let reply = political_reply(&[("evidence_quality", "7.5")]);
        assert!(matches!(
            parse_judge_response(Rubric::Political, &reply),
            Err(ScoreFormatError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_string_score_rejected() {
        let reply = political_reply(&[("originality", "\"8\"")]);
        assert!(matches!(
            parse_judge_response(Rubric::Political, &reply),
            Err(ScoreFormatError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let reply = political_reply(&[("factual_accuracy", "12")]);
        assert!(matches!(
            parse_judge_response(Rubric::Political, &reply),
            Err(ScoreFormatError::OutOfRange { value: 12, .. })
        ));
    }

    #[test]
    fn test_wrong_rubric_reports_missing_criterion() {
        let err = parse_judge_response(Rubric::RapBattle, &political_reply(&[])).unwrap_err();
        assert_eq!(err, ScoreFormatError::MissingCriterion("flow_delivery".to_string()));
    }
}
