//! Tiến Lên rules: classification, the beats relation, move generation and
//! the `RulesEngine` seam.
//!
//! Everything here is pure: functions take the active `HouseRules` as an
//! argument and never touch round state.

pub mod combination;
pub mod validator;
pub mod movegen;
pub mod engine;

pub use combination::{classify, BombKind, Combination, RankKey, Shape};
pub use validator::{check_play, compare_keys, may_play};
pub use movegen::{legal_moves, LegalMoves};
pub use engine::{RoundResult, RulesEngine};
