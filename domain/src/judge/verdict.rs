//! Final verdict aggregation.
//!
//! Per speaker, each criterion is averaged over that speaker's scored
//! turns; the speaker total is the sum of those means. The higher total
//! wins. Equal totals are an explicit tie, never broken silently.

use serde::Serialize;

use super::rubric::Rubric;
use crate::debate::{Seat, Transcript};

/// Totals closer than this are considered equal
const TOTAL_EPSILON: f64 = 1e-9;
/// Category means closer than this are a tie
const CATEGORY_TIE_THRESHOLD: f64 = 0.5;

/// Aggregate scores for one speaker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerTally {
    pub seat: Seat,
    pub name: String,
    pub scored_turns: usize,
    pub unscored_turns: usize,
    /// `(criterion, mean)` in rubric order; empty when no turn was scored
    pub criterion_means: Vec<(&'static str, f64)>,
    pub total: f64,
}

impl SpeakerTally {
    pub fn mean(&self, criterion: &str) -> Option<f64> {
        self.criterion_means
            .iter()
            .find(|(k, _)| *k == criterion)
            .map(|(_, v)| *v)
    }

    pub fn has_scores(&self) -> bool {
        self.scored_turns > 0
    }
}

/// Why no winner was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieReason {
    /// Both speakers reached the same aggregate total
    EqualTotals,
    /// At least one speaker has no scored turn to aggregate
    InsufficientScores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Winner { seat: Seat, name: String },
    Tie { reason: TieReason },
}

impl Outcome {
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Winner { seat, .. } => Some(*seat),
            Outcome::Tie { .. } => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Outcome::Tie { .. })
    }
}

/// Result of one contested category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryResult {
    pub key: &'static str,
    pub label: &'static str,
    /// `None` when the means differ by less than half a point
    pub winner: Option<Seat>,
    pub means: [f64; 2],
}

/// Overall quality of the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    Good,
    Fair,
    Poor,
    Legendary,
    Fire,
    Solid,
    Weak,
}

impl QualityTier {
    fn classify(rubric: Rubric, average_total: f64) -> Self {
        match rubric {
            Rubric::Political => match average_total {
                t if t >= 65.0 => QualityTier::Excellent,
                t if t >= 55.0 => QualityTier::Good,
                t if t >= 45.0 => QualityTier::Fair,
                _ => QualityTier::Poor,
            },
            Rubric::RapBattle => match average_total {
                t if t >= 70.0 => QualityTier::Legendary,
                t if t >= 60.0 => QualityTier::Fire,
                t if t >= 50.0 => QualityTier::Solid,
                _ => QualityTier::Weak,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Excellent => "Excellent",
            QualityTier::Good => "Good",
            QualityTier::Fair => "Fair",
            QualityTier::Poor => "Poor",
            QualityTier::Legendary => "Legendary",
            QualityTier::Fire => "Fire",
            QualityTier::Solid => "Solid",
            QualityTier::Weak => "Weak",
        }
    }
}

/// Final aggregate judgement of a completed debate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub rubric: Rubric,
    pub tallies: [SpeakerTally; 2],
    pub outcome: Outcome,
    pub margin: f64,
    pub categories: Vec<CategoryResult>,
    pub quality: Option<QualityTier>,
    pub insights: Vec<String>,
    pub rationale: String,
}

impl Verdict {
    pub fn tally(&self, seat: Seat) -> &SpeakerTally {
        &self.tallies[seat.position()]
    }

    /// Aggregate every per-turn judgement in the transcript.
    pub fn from_transcript(rubric: Rubric, transcript: &Transcript) -> Self {
        let tallies = [
            tally_for(rubric, transcript, Seat::First),
            tally_for(rubric, transcript, Seat::Second),
        ];

        let both_scored = tallies.iter().all(|t| t.has_scores());
        let (outcome, margin) = if !both_scored {
            (
                Outcome::Tie {
                    reason: TieReason::InsufficientScores,
                },
                0.0,
            )
        } else {
            let diff = tallies[0].total - tallies[1].total;
            if diff.abs() < TOTAL_EPSILON {
                (
                    Outcome::Tie {
                        reason: TieReason::EqualTotals,
                    },
                    0.0,
                )
            } else {
                let seat = if diff > 0.0 { Seat::First } else { Seat::Second };
                let name = tallies[seat.position()].name.clone();
                (Outcome::Winner { seat, name }, diff.abs())
            }
        };

        let categories = if both_scored {
            category_results(rubric, &tallies)
        } else {
            Vec::new()
        };
        let quality = both_scored
            .then(|| QualityTier::classify(rubric, (tallies[0].total + tallies[1].total) / 2.0));
        let insights = insights(rubric, transcript, &tallies);
        let rationale = rationale(&tallies, &outcome, margin, quality);

        Self {
            rubric,
            tallies,
            outcome,
            margin,
            categories,
            quality,
            insights,
            rationale,
        }
    }
}

fn tally_for(rubric: Rubric, transcript: &Transcript, seat: Seat) -> SpeakerTally {
    let turns: Vec<_> = transcript.turns().iter().filter(|t| t.seat() == seat).collect();
    let scores: Vec<_> = turns
        .iter()
        .filter_map(|t| t.judgement().and_then(|j| j.score()))
        .collect();

    let criterion_means: Vec<(&'static str, f64)> = if scores.is_empty() {
        Vec::new()
    } else {
        rubric
            .keys()
            .map(|key| {
                let sum: u32 = scores.iter().filter_map(|s| s.score(key)).map(u32::from).sum();
                (key, sum as f64 / scores.len() as f64)
            })
            .collect()
    };
    let total: f64 = criterion_means.iter().map(|(_, m)| m).sum();

    SpeakerTally {
        seat,
        name: transcript.participant(seat).to_string(),
        scored_turns: scores.len(),
        unscored_turns: turns.len() - scores.len(),
        criterion_means,
        total,
    }
}

fn category_results(rubric: Rubric, tallies: &[SpeakerTally; 2]) -> Vec<CategoryResult> {
    rubric
        .categories()
        .iter()
        .map(|category| {
            let means = [
                group_mean(&tallies[0], category.criteria),
                group_mean(&tallies[1], category.criteria),
            ];
            let diff = means[0] - means[1];
            let winner = if diff.abs() < CATEGORY_TIE_THRESHOLD {
                None
            } else if diff > 0.0 {
                Some(Seat::First)
            } else {
                Some(Seat::Second)
            };
            CategoryResult {
                key: category.key,
                label: category.label,
                winner,
                means,
            }
        })
        .collect()
}

fn group_mean(tally: &SpeakerTally, criteria: &[&str]) -> f64 {
    let values: Vec<f64> = criteria.iter().filter_map(|c| tally.mean(c)).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn insights(rubric: Rubric, transcript: &Transcript, tallies: &[SpeakerTally; 2]) -> Vec<String> {
    let mut out = Vec::new();
    let scored: Vec<_> = tallies.iter().filter(|t| t.has_scores()).collect();
    if scored.is_empty() {
        return out;
    }

    let overall: Vec<(&'static str, f64)> = rubric
        .keys()
        .map(|key| {
            let sum: f64 = scored.iter().filter_map(|t| t.mean(key)).sum();
            (key, sum / scored.len() as f64)
        })
        .collect();

    let label = |key: &str| rubric.criterion(key).map(|c| c.label).unwrap_or("unknown");
    if let Some((key, mean)) = overall.iter().max_by(|a, b| a.1.total_cmp(&b.1)) {
        out.push(format!("Strongest area: {} ({:.1}/10)", label(key), mean));
    }
    if let Some((key, mean)) = overall.iter().min_by(|a, b| a.1.total_cmp(&b.1)) {
        out.push(format!("Weakest area: {} ({:.1}/10)", label(key), mean));
    }

    let average = overall.iter().map(|(_, m)| m).sum::<f64>() / overall.len() as f64;
    out.push(
        match average {
            a if a >= 7.5 => "High-caliber exchange with consistently strong performances",
            a if a >= 6.0 => "Solid exchange with room to sharpen arguments",
            _ => "Significant room for improvement on both sides",
        }
        .to_string(),
    );

    let best_turn = transcript
        .turns()
        .iter()
        .filter_map(|t| t.judgement().and_then(|j| j.score()).map(|s| (t, s)))
        .max_by_key(|(t, s)| (s.total(), std::cmp::Reverse(t.index())));
    if let Some((turn, score)) = best_turn {
        out.push(format!(
            "Highest-scoring turn: {} in turn {} ({}/{})",
            turn.speaker(),
            turn.number(),
            score.total(),
            rubric.max_total()
        ));
        if let Some(bar) = score.highlights().first() {
            out.push(format!("Standout moment: \"{}\"", bar));
        }
    }
    out
}

fn rationale(
    tallies: &[SpeakerTally; 2],
    outcome: &Outcome,
    margin: f64,
    quality: Option<QualityTier>,
) -> String {
    let totals = format!(
        "{} {:.1} vs {} {:.1}",
        tallies[0].name, tallies[0].total, tallies[1].name, tallies[1].total
    );
    let mut text = match outcome {
        Outcome::Winner { name, .. } => {
            let strength = match margin {
                m if m >= 5.0 => "a decisive",
                m if m >= 2.0 => "a clear",
                _ => "a narrow",
            };
            format!("{} wins by {} margin of {:.1} points ({}).", name, strength, margin, totals)
        }
        Outcome::Tie {
            reason: TieReason::EqualTotals,
        } => format!("The debate is a tie: both sides finished level ({}).", totals),
        Outcome::Tie {
            reason: TieReason::InsufficientScores,
        } => {
            let missing: Vec<&str> = tallies
                .iter()
                .filter(|t| !t.has_scores())
                .map(|t| t.name.as_str())
                .collect();
            format!(
                "No winner can be declared: no scored turns for {}.",
                missing.join(" and ")
            )
        }
    };
    if let Some(quality) = quality {
        text.push_str(&format!(" Overall quality: {}.", quality.label()));
    }
    let unscored: usize = tallies.iter().map(|t| t.unscored_turns).sum();
    if unscored > 0 {
        text.push_str(&format!(
            " {} turn(s) had no score available and were excluded.",
            unscored
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::{JudgeScore, TurnJudgement};

    fn scored(rubric: Rubric, values: [i64; 8]) -> TurnJudgement {
        let raw: Vec<_> = rubric.keys().zip(values).collect();
        TurnJudgement::Scored(JudgeScore::try_new(rubric, raw).unwrap())
    }

    fn uniform(rubric: Rubric, v: i64) -> TurnJudgement {
        scored(rubric, [v; 8])
    }

    fn transcript_with(judgements: Vec<Option<TurnJudgement>>) -> Transcript {
        let mut t = Transcript::new(["Left".to_string(), "Right".to_string()], judgements.len());
        for (i, j) in judgements.into_iter().enumerate() {
            let mut turn = t.draft_next(format!("turn {}", i));
            if let Some(j) = j {
                turn = turn.with_judgement(j);
            }
            t.append(turn).unwrap();
        }
        t
    }

    #[test]
    fn test_winner_by_mean_totals() {
        let r = Rubric::Political;
        let t = transcript_with(vec![
            Some(uniform(r, 8)),
            Some(uniform(r, 6)),
            Some(uniform(r, 6)),
            Some(uniform(r, 6)),
        ]);
        let v = Verdict::from_transcript(r, &t);
        // Left: mean 7 per criterion -> 56, Right: 6 -> 48
        assert_eq!(v.tally(Seat::First).total, 56.0);
        assert_eq!(v.tally(Seat::Second).total, 48.0);
        assert_eq!(v.outcome.winner(), Some(Seat::First));
        assert_eq!(v.margin, 8.0);
        assert!(v.rationale.starts_with("Left wins by a decisive margin"));
        assert_eq!(v.quality, Some(QualityTier::Fair));
    }

    #[test]
    fn test_equal_totals_reported_as_tie() {
        let r = Rubric::Political;
        let t = transcript_with(vec![
            Some(scored(r, [10, 0, 5, 5, 5, 5, 5, 5])),
            Some(scored(r, [0, 10, 5, 5, 5, 5, 5, 5])),
        ]);
        let v = Verdict::from_transcript(r, &t);
        assert_eq!(
            v.outcome,
            Outcome::Tie {
                reason: TieReason::EqualTotals
            }
        );
        assert_eq!(v.margin, 0.0);
        assert!(v.rationale.contains("tie"));
    }

    #[test]
    fn test_unavailable_turns_are_excluded() {
        let r = Rubric::RapBattle;
        let t = transcript_with(vec![
            Some(uniform(r, 9)),
            Some(uniform(r, 7)),
            Some(TurnJudgement::unavailable("bad json twice")),
            Some(uniform(r, 7)),
        ]);
        let v = Verdict::from_transcript(r, &t);
        assert_eq!(v.tally(Seat::First).scored_turns, 1);
        assert_eq!(v.tally(Seat::First).unscored_turns, 1);
        assert_eq!(v.tally(Seat::First).total, 72.0);
        assert_eq!(v.outcome.winner(), Some(Seat::First));
        assert!(v.rationale.contains("excluded"));
    }

    #[test]
    fn test_no_scores_for_one_side() {
        let r = Rubric::Political;
        let t = transcript_with(vec![Some(uniform(r, 7)), None]);
        let v = Verdict::from_transcript(r, &t);
        assert_eq!(
            v.outcome,
            Outcome::Tie {
                reason: TieReason::InsufficientScores
            }
        );
        assert!(v.rationale.contains("Right"));
        assert!(v.categories.is_empty());
        assert_eq!(v.quality, None);
    }

    #[test]
    fn test_category_tie_threshold() {
        let r = Rubric::Political;
        // rebuttal_effectiveness is index 4
        let t = transcript_with(vec![
            Some(scored(r, [8, 5, 5, 8, 7, 5, 5, 5])),
            Some(scored(r, [5, 5, 5, 5, 7, 5, 5, 5])),
        ]);
        let v = Verdict::from_transcript(r, &t);
        let logic = v.categories.iter().find(|c| c.key == "best_logic").unwrap();
        assert_eq!(logic.winner, Some(Seat::First));
        let rebuttals = v.categories.iter().find(|c| c.key == "best_rebuttals").unwrap();
        assert_eq!(rebuttals.winner, None);
    }

    #[test]
    fn test_insights_name_extremes() {
        let r = Rubric::Political;
        let t = transcript_with(vec![
            Some(scored(r, [9, 3, 6, 6, 6, 6, 6, 6])),
            Some(scored(r, [9, 3, 6, 6, 6, 6, 6, 6])),
        ]);
        let v = Verdict::from_transcript(r, &t);
        assert!(v.insights.iter().any(|i| i.contains("Strongest area: Logic & Reasoning")));
        assert!(v.insights.iter().any(|i| i.contains("Weakest area: Evidence Quality")));
    }

    #[test]
    fn test_rap_quality_tiers() {
        assert_eq!(QualityTier::classify(Rubric::RapBattle, 71.0), QualityTier::Legendary);
        assert_eq!(QualityTier::classify(Rubric::RapBattle, 60.0), QualityTier::Fire);
        assert_eq!(QualityTier::classify(Rubric::RapBattle, 10.0), QualityTier::Weak);
    }
}
