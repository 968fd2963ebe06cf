//! Judge domain
//!
//! Scoring is fixed-schema: every turn is scored on the eight criteria of
//! a [`Rubric`], each an integer in `0..=10`. A reply that does not satisfy
//! the schema never becomes a [`JudgeScore`]; it surfaces as a
//! [`ScoreFormatError`] and the caller decides between retrying and
//! recording [`TurnJudgement::Unavailable`].
//!
//! - [`rubric`]: the political and rap battle rubrics
//! - [`score`]: validated scores and per-turn judgements
//! - [`parsing`]: JSON extraction and validation of judge replies
//! - [`verdict`]: aggregation of a transcript into a final [`Verdict`]

pub mod parsing;
pub mod rubric;
pub mod score;
pub mod verdict;

pub use parsing::{extract_json_object, parse_judge_response};
pub use rubric::{Category, Criterion, MAX_SCORE, MIN_SCORE, Rubric};
pub use score::{JudgeScore, ScoreFormatError, TurnJudgement};
pub use verdict::{CategoryResult, Outcome, QualityTier, SpeakerTally, TieReason, Verdict};
