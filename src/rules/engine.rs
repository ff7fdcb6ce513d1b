//! Rules engine trait.
//!
//! The seam between the game rules and anything that searches over them
//! (the AI lookahead, tests, a host driving the round):
//! - What actions are legal
//! - How actions produce the next state
//! - When the round is over

use crate::core::action::Action;
use crate::core::config::HouseRules;
use crate::core::error::Result;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// Outcome of a finished round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundResult {
    /// Players from first out to last.
    pub finish_order: Vec<PlayerId>,
}

impl RoundResult {
    /// The first player to empty their hand.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.finish_order.first().copied()
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == Some(player)
    }

    /// Finishing place of `player`, 0 for the winner.
    #[must_use]
    pub fn place(&self, player: PlayerId) -> Option<usize> {
        self.finish_order.iter().position(|&p| p == player)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Empty if the player cannot act
/// - `apply_action`: Pure and deterministic; the input state is untouched
/// - `is_terminal`: `None` while the round continues
pub trait RulesEngine {
    fn rules(&self) -> &HouseRules;

    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    fn apply_action(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<GameState>;

    fn is_terminal(&self, state: &GameState) -> Option<RoundResult>;
}
