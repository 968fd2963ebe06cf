//! Transcript: the ordered, append-only record of turns

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;
use crate::judge::TurnJudgement;

/// Position a participant occupies. `First` speaks on even turn indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::First, Seat::Second];

    /// The seat that speaks at a given turn index
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 { Seat::First } else { Seat::Second }
    }

    pub fn other(&self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Seat::First => "first",
            Seat::Second => "second",
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One complete response by one participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    index: usize,
    seat: Seat,
    speaker: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    judgement: Option<TurnJudgement>,
}

impl Turn {
    pub fn new(index: usize, seat: Seat, speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            index,
            seat,
            speaker: speaker.into(),
            text: text.into(),
            judgement: None,
        }
    }

    pub fn with_judgement(mut self, judgement: TurnJudgement) -> Self {
        self.judgement = Some(judgement);
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 1-based turn number for display
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn judgement(&self) -> Option<&TurnJudgement> {
        self.judgement.as_ref()
    }
}

/// Ordered record of all turns in one debate.
///
/// Appends are validated: indices run `0..n`, seats alternate starting
/// with [`Seat::First`], and the length never exceeds `max_turns`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    participants: [String; 2],
    max_turns: usize,
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new(participants: [String; 2], max_turns: usize) -> Self {
        Self {
            participants,
            max_turns,
            turns: Vec::with_capacity(max_turns),
        }
    }

    pub fn participant(&self, seat: Seat) -> &str {
        &self.participants[seat.position()]
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.turns.len() >= self.max_turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Index of the turn that would be appended next
    pub fn next_index(&self) -> usize {
        self.turns.len()
    }

    pub fn next_seat(&self) -> Seat {
        Seat::for_index(self.next_index())
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Build (but do not append) the next turn for the seat whose turn it is.
    pub fn draft_next(&self, text: impl Into<String>) -> Turn {
        let seat = self.next_seat();
        Turn::new(self.next_index(), seat, self.participant(seat), text)
    }

    /// Append a turn, enforcing ordering, alternation and the turn limit.
    pub fn append(&mut self, turn: Turn) -> Result<&Turn, DomainError> {
        if self.is_full() {
            return Err(DomainError::TurnLimitReached(self.max_turns));
        }
        let expected = self.next_index();
        if turn.index != expected {
            return Err(DomainError::TurnOutOfOrder {
                expected,
                actual: turn.index,
            });
        }
        let seat = Seat::for_index(expected);
        if turn.seat != seat {
            return Err(DomainError::WrongSpeaker {
                index: expected,
                expected: seat.as_str(),
            });
        }
        self.turns.push(turn);
        Ok(&self.turns[expected])
    }

    /// Ordered `(speaker, text)` pairs
    pub fn dialogue(&self) -> Vec<(String, String)> {
        self.turns
            .iter()
            .map(|t| (t.speaker.clone(), t.text.clone()))
            .collect()
    }
}
