//! Fixed eight-criterion scoring rubrics

use serde::{Deserialize, Serialize};

/// Lowest score a criterion can receive
pub const MIN_SCORE: u8 = 0;
/// Highest score a criterion can receive
pub const MAX_SCORE: u8 = 10;

/// One scored dimension of a rubric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criterion {
    pub key: &'static str,
    pub label: &'static str,
    pub guidance: &'static str,
}

/// A group of criteria contested as one category in the final verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    pub criteria: &'static [&'static str],
}

/// Which rubric a judge scores against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rubric {
    Political,
    RapBattle,
}

const POLITICAL: [Criterion; 8] = [
    Criterion {
        key: "logic_reasoning",
        label: "Logic & Reasoning",
        guidance: "Soundness of the argument and absence of fallacies",
    },
    Criterion {
        key: "evidence_quality",
        label: "Evidence Quality",
        guidance: "Use of concrete facts, data and examples",
    },
    Criterion {
        key: "source_credibility",
        label: "Source Credibility",
        guidance: "Reliability of cited sources and research",
    },
    Criterion {
        key: "argument_structure",
        label: "Argument Structure",
        guidance: "Organization and flow from claim to conclusion",
    },
    Criterion {
        key: "rebuttal_effectiveness",
        label: "Rebuttal Effectiveness",
        guidance: "How directly and convincingly the opponent is answered",
    },
    Criterion {
        key: "clarity_communication",
        label: "Clarity & Communication",
        guidance: "Plain, persuasive and accessible language",
    },
    Criterion {
        key: "factual_accuracy",
        label: "Factual Accuracy",
        guidance: "Correctness of the claims made",
    },
    Criterion {
        key: "originality",
        label: "Originality",
        guidance: "Fresh perspectives rather than talking points",
    },
];

const RAP_BATTLE: [Criterion; 8] = [
    Criterion {
        key: "flow_delivery",
        label: "Flow & Delivery",
        guidance: "Rhythm, cadence and how the verse rides the beat",
    },
    Criterion {
        key: "lyrical_complexity",
        label: "Lyrical Complexity",
        guidance: "Multi-syllabic and internal rhymes, density of ideas",
    },
    Criterion {
        key: "wordplay_creativity",
        label: "Wordplay & Creativity",
        guidance: "Double meanings, metaphors and clever turns of phrase",
    },
    Criterion {
        key: "punchlines_impact",
        label: "Punchlines & Impact",
        guidance: "Memorable, hard-hitting lines",
    },
    Criterion {
        key: "crowd_appeal",
        label: "Crowd Appeal",
        guidance: "Energy and how a live crowd would react",
    },
    Criterion {
        key: "battle_tactics",
        label: "Battle Tactics",
        guidance: "Direct responses and attacks on the opponent",
    },
    Criterion {
        key: "rhyme_scheme",
        label: "Rhyme Scheme",
        guidance: "Consistency and ambition of the rhyme patterns",
    },
    Criterion {
        key: "originality",
        label: "Originality",
        guidance: "Fresh angles and a distinct voice",
    },
];

const POLITICAL_CATEGORIES: [Category; 4] = [
    Category {
        key: "best_logic",
        label: "Best Logic",
        criteria: &["logic_reasoning", "argument_structure"],
    },
    Category {
        key: "best_evidence",
        label: "Best Evidence",
        criteria: &["evidence_quality", "source_credibility", "factual_accuracy"],
    },
    Category {
        key: "best_communication",
        label: "Best Communication",
        criteria: &["clarity_communication", "originality"],
    },
    Category {
        key: "best_rebuttals",
        label: "Best Rebuttals",
        criteria: &["rebuttal_effectiveness"],
    },
];

const RAP_CATEGORIES: [Category; 4] = [
    Category {
        key: "best_flow",
        label: "Best Flow",
        criteria: &["flow_delivery", "rhyme_scheme"],
    },
    Category {
        key: "best_wordplay",
        label: "Best Wordplay",
        criteria: &["wordplay_creativity", "lyrical_complexity"],
    },
    Category {
        key: "best_punchlines",
        label: "Best Punchlines",
        criteria: &["punchlines_impact", "battle_tactics"],
    },
    Category {
        key: "best_crowd_appeal",
        label: "Best Crowd Appeal",
        criteria: &["crowd_appeal", "originality"],
    },
];

impl Rubric {
    pub fn criteria(&self) -> &'static [Criterion; 8] {
        match self {
            Rubric::Political => &POLITICAL,
            Rubric::RapBattle => &RAP_BATTLE,
        }
    }

    pub fn categories(&self) -> &'static [Category] {
        match self {
            Rubric::Political => &POLITICAL_CATEGORIES,
            Rubric::RapBattle => &RAP_CATEGORIES,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.criteria().iter().map(|c| c.key)
    }

    pub fn criterion(&self, key: &str) -> Option<&'static Criterion> {
        self.criteria().iter().find(|c| c.key == key)
    }

    /// Highest attainable total for one turn
    pub fn max_total(&self) -> u32 {
        self.criteria().len() as u32 * MAX_SCORE as u32
    }

    /// How many prior turns the judge sees as context
    pub fn context_window(&self) -> usize {
        match self {
            Rubric::Political => 3,
            Rubric::RapBattle => 2,
        }
    }

    /// JSON key for the list of highlights (`strengths` / `best_bars`)
    pub fn highlights_key(&self) -> &'static str {
        match self {
            Rubric::Political => "strengths",
            Rubric::RapBattle => "best_bars",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rubric::Political => "political",
            Rubric::RapBattle => "rap_battle",
        }
    }
}
