//! Error types for rejected actions.
//!
//! Every rejection carries enough detail for a UI to explain which rule
//! failed. None of these are fatal; the state that produced them is left
//! untouched.

use thiserror::Error;

use super::player::PlayerId;
use crate::cards::Card;
use crate::rules::Shape;

/// The specific rule a play or pass broke.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("a {found} cannot be played on a {expected}")]
    ShapeMismatch { expected: Shape, found: Shape },
    #[error("straight of {found} cards cannot follow a straight of {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("does not beat the current pile")]
    NotHigher,
    #[error("bombs cannot beat bombs without the bomb hierarchy rule")]
    BombsIncomparable,
    #[error("only a higher bomb can beat a bomb")]
    CannotBeatBomb,
    #[error("the opening play must include {0}")]
    MissingOpeningCard(Card),
    #[error("the leader of a trick cannot pass")]
    PassOnLead,
    #[error("{0} is not in the player's hand")]
    CardNotInHand(Card),
    #[error("{0} was listed twice")]
    DuplicateCard(Card),
    #[error("no cards were played")]
    EmptyPlay,
    #[error("the round is over")]
    RoundOver,
}

/// Crate-wide error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TienLenError {
    #[error("cards {cards:?} do not form a valid combination")]
    InvalidCombination { cards: Vec<Card> },
    #[error("illegal move: {0}")]
    IllegalMove(#[from] RuleViolation),
    #[error("it is not {actual}'s turn (expected {expected})")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    #[error("{0} has already finished and holds no cards")]
    EmptyHandAction(PlayerId),
    #[error("{0} players requested, Tien Len needs 2 to 4")]
    InvalidPlayerCount(usize),
    #[error("{0} was dealt no cards")]
    EmptyDeal(PlayerId),
    #[error("{0} is not seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("round aborted: {0}")]
    InvariantViolation(String),
}

impl TienLenError {
    /// The rule behind an `IllegalMove`, if this is one.
    #[must_use]
    pub fn violation(&self) -> Option<&RuleViolation> {
        match self {
            TienLenError::IllegalMove(v) => Some(v),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TienLenError>;
