//! Core engine types: players, state, actions, RNG, configuration, errors.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod action;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::HouseRules;
pub use error::{Result, RuleViolation, TienLenError};
pub use action::{Action, ActionRecord};
pub use state::{GameState, Phase, Pile, PileEntry, Seat};
