//! Debate kinds

use serde::{Deserialize, Serialize};

use crate::judge::Rubric;

/// The format of a debate session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateKind {
    /// Structured progressive vs conservative debate
    PoliticalDebate,
    /// Looser exchange of political perspectives
    PoliticalDiscussion,
    /// Analytical comparison of policy approaches
    PolicyAnalysis,
    /// Two rappers trading verses
    RapBattle,
}

impl DebateKind {
    pub const ALL: [DebateKind; 4] = [
        DebateKind::PoliticalDebate,
        DebateKind::PoliticalDiscussion,
        DebateKind::PolicyAnalysis,
        DebateKind::RapBattle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebateKind::PoliticalDebate => "political_debate",
            DebateKind::PoliticalDiscussion => "political_discussion",
            DebateKind::PolicyAnalysis => "policy_analysis",
            DebateKind::RapBattle => "rap_battle",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DebateKind::PoliticalDebate => "Political Debate",
            DebateKind::PoliticalDiscussion => "Political Discussion",
            DebateKind::PolicyAnalysis => "Policy Analysis",
            DebateKind::RapBattle => "Rap Battle",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DebateKind::PoliticalDebate => "🗳️",
            DebateKind::PoliticalDiscussion => "🏛️",
            DebateKind::PolicyAnalysis => "📊",
            DebateKind::RapBattle => "🎤",
        }
    }

    pub fn rubric(&self) -> Rubric {
        match self {
            DebateKind::RapBattle => Rubric::RapBattle,
            _ => Rubric::Political,
        }
    }

    pub fn is_rap_battle(&self) -> bool {
        matches!(self, DebateKind::RapBattle)
    }

    /// Default turn budget offered in the setup menu
    pub fn default_max_turns(&self) -> usize {
        match self {
            DebateKind::PoliticalDebate => 8,
            DebateKind::PoliticalDiscussion | DebateKind::PolicyAnalysis => 6,
            DebateKind::RapBattle => 6,
        }
    }
}

impl std::fmt::Display for DebateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for DebateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DebateKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown debate kind: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubric_selection() {
        assert_eq!(DebateKind::RapBattle.rubric(), Rubric::RapBattle);
        assert_eq!(DebateKind::PolicyAnalysis.rubric(), Rubric::Political);
    }

    #[test]
    fn test_from_str_roundtrip() {
        for kind in DebateKind::ALL {
            assert_eq!(kind.as_str().parse::<DebateKind>().unwrap(), kind);
        }
        assert!("town_hall".parse::<DebateKind>().is_err());
    }
}
