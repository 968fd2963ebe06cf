//! Validated per-turn judge scores

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::rubric::{MAX_SCORE, MIN_SCORE, Rubric};

/// Why a judge reply could not be turned into a [`JudgeScore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreFormatError {
    #[error("no JSON object found in judge reply")]
    NoJson,

    #[error("judge reply is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("judge reply has no \"scores\" object")]
    MissingScores,

    #[error("missing criterion '{0}'")]
    MissingCriterion(String),

    #[error("criterion '{criterion}' is not an integer: {value}")]
    NotAnInteger { criterion: String, value: String },

    #[error("criterion '{criterion}' out of range 0-10: {value}")]
    OutOfRange { criterion: String, value: i64 },
}

/// Eight integer scores in `0..=10` plus the judge's commentary.
///
/// Only constructible through [`JudgeScore::try_new`], so a value of this
/// type always covers every criterion of its rubric with an in-range score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeScore {
    rubric: Rubric,
    scores: BTreeMap<String, u8>,
    rationale: BTreeMap<String, String>,
    highlights: Vec<String>,
    weaknesses: Vec<String>,
    feedback: String,
}

impl JudgeScore {
    /// Validate raw integer scores against the rubric.
    ///
    /// Keys that are not part of the rubric are ignored.
    pub fn try_new<K: AsRef<str>>(
        rubric: Rubric,
        raw: impl IntoIterator<Item = (K, i64)>,
    ) -> Result<Self, ScoreFormatError> {
        let raw: BTreeMap<String, i64> = raw
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v))
            .collect();

        let mut scores = BTreeMap::new();
        for key in rubric.keys() {
            let value = *raw
                .get(key)
                .ok_or_else(|| ScoreFormatError::MissingCriterion(key.to_string()))?;
            if value < MIN_SCORE as i64 || value > MAX_SCORE as i64 {
                return Err(ScoreFormatError::OutOfRange {
                    criterion: key.to_string(),
                    value,
                });
            }
            scores.insert(key.to_string(), value as u8);
        }

        Ok(Self {
            rubric,
            scores,
            rationale: BTreeMap::new(),
            highlights: Vec::new(),
            weaknesses: Vec::new(),
            feedback: String::new(),
        })
    }

    pub fn with_rationale(mut self, criterion: impl Into<String>, text: impl Into<String>) -> Self {
        let criterion = criterion.into();
        if self.rubric.criterion(&criterion).is_some() {
            self.rationale.insert(criterion, text.into());
        }
        self
    }

    pub fn with_highlights(mut self, highlights: Vec<String>) -> Self {
        self.highlights = highlights;
        self
    }

    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = weaknesses;
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = feedback.into();
        self
    }

    pub fn rubric(&self) -> Rubric {
        self.rubric
    }

    pub fn score(&self, criterion: &str) -> Option<u8> {
        self.scores.get(criterion).copied()
    }

    pub fn rationale(&self, criterion: &str) -> Option<&str> {
        self.rationale.get(criterion).map(|s| s.as_str())
    }

    /// Scores in rubric order
    pub fn scores(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        self.rubric
            .keys()
            .filter_map(|key| self.scores.get(key).map(|v| (key, *v)))
    }

    pub fn highlights(&self) -> &[String] {
        &self.highlights
    }

    pub fn weaknesses(&self) -> &[String] {
        &self.weaknesses
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn total(&self) -> u32 {
        self.scores.values().map(|v| *v as u32).sum()
    }
}

/// The judge's result for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnJudgement {
    Scored(JudgeScore),
    /// "No score available": the judge could not produce a valid score
    Unavailable { reason: String },
}

impl TurnJudgement {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        TurnJudgement::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn score(&self) -> Option<&JudgeScore> {
        match self {
            TurnJudgement::Scored(score) => Some(score),
            TurnJudgement::Unavailable { .. } => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, TurnJudgement::Scored(_))
    }
}
