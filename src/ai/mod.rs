//! Computer players.
//!
//! ## Overview
//!
//! Decisions flow one way: legal moves from the state machine, neutral
//! scoring by the [`Evaluator`], then personality bias, optional lookahead
//! and a temperature-controlled pick in the [`Selector`]. A [`Difficulty`]
//! picks the lookahead: none, one ply, or a short minimax search.
//!
//! Weights are explicit values, so several AI players with different
//! personalities can share a table without cross-talk.
//!
//! ## Usage
//!
//! ```rust
//! use tien_len::ai::{Personality, Selector};
//! use tien_len::core::{GameRng, HouseRules};
//! use tien_len::games::tien_len::new_round;
//!
//! let state = new_round(4, HouseRules::default(), 7).unwrap();
//! let player = state.current_player();
//! let personality = Personality::Aggressive;
//!
//! let mut rng = GameRng::new(7).for_context("selector");
//! let action = Selector::for_personality(personality)
//!     .choose(&state, player, &personality.weights(), &mut rng)
//!     .unwrap();
//! assert!(!action.is_pass());
//! ```

pub mod weights;
pub mod features;
pub mod evaluator;
pub mod lookahead;
pub mod selector;

pub use weights::{AIWeights, Difficulty, Factor, ParseAiError, Personality, SelectorConfig};
pub use features::Features;
pub use evaluator::Evaluator;
pub use lookahead::{outlook, LookaheadPolicy, Minimax, NoLookahead, OnePly};
pub use selector::{ai_choose, hint, ScoredMove, Selector};
