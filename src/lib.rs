//! # tien-len
//!
//! Rule and decision engine for Tiến Lên, the Vietnamese shedding card
//! game, for 2 to 4 players.
//!
//! ## Design Principles
//!
//! 1. **Rules as data**: House rules are a plain `HouseRules` value passed
//!    into every rule function, never ambient state.
//!
//! 2. **Values, not mutation**: Every action takes a `GameState` and
//!    returns a new one. A rejected action leaves the caller's state as it
//!    was, with an error naming the rule that failed.
//!
//! 3. **Deterministic**: Deals and AI sampling draw from a seeded
//!    `GameRng`; the same seed replays the same round.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs` keeps undo
//!   and lookahead cheap.
//!
//! - **Explicit ordering**: Cards compare through `CardOrder`, so the
//!   flipped-suit rule can be injected and tested in isolation.
//!
//! ## Modules
//!
//! - `cards`: Cards, notation, deck and hands
//! - `core`: Players, state, actions, RNG, house rules, errors
//! - `rules`: Classifier, beats relation, move generator, `RulesEngine`
//! - `games`: The Tiến Lên round state machine
//! - `ai`: Evaluator, personalities, lookahead and selector
//!
//! ## Example
//!
//! ```rust
//! use tien_len::{apply_pass, apply_play, legal_moves, new_round, HouseRules};
//!
//! let state = new_round(4, HouseRules::default(), 42).unwrap();
//! let leader = state.current_player();
//! let opening = legal_moves(&state, leader).next().unwrap();
//! let state = apply_play(&state, leader, opening.cards()).unwrap();
//!
//! let next = state.current_player();
//! let state = apply_pass(&state, next).unwrap();
//! assert_eq!(state.passes(), 1);
//! ```

pub mod cards;
pub mod core;
pub mod rules;
pub mod games;
pub mod ai;

// Re-export commonly used types
pub use crate::cards::{parse_cards, Card, CardOrder, Deck, Hand, ParseCardError, Rank, Suit};

pub use crate::core::{
    Action, ActionRecord, GameRng, GameRngState, GameState, HouseRules, Phase, Pile, PlayerId,
    PlayerMap, Result, RuleViolation, Seat, TienLenError,
};

pub use crate::rules::{
    check_play, classify, may_play, BombKind, Combination, LegalMoves, RankKey, RoundResult,
    RulesEngine, Shape,
};

pub use crate::games::tien_len::{
    apply_pass, apply_play, legal_moves, new_round, round_from_hands, undo_last, TienLen,
    TienLenBuilder,
};

pub use crate::ai::{
    ai_choose, hint, AIWeights, Difficulty, Evaluator, Factor, LookaheadPolicy, Minimax,
    NoLookahead, OnePly, Personality, Selector, SelectorConfig,
};
