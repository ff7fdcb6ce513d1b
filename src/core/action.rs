//! Actions a player can take on their turn, and the history record.
//!
//! Tiến Lên has two verbs: play a combination or pass. Plays carry the
//! classified combination so history consumers never re-classify.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::rules::Combination;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Play(Combination),
    Pass,
}

impl Action {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }

    /// The combination played, if any.
    #[must_use]
    pub fn combination(&self) -> Option<&Combination> {
        match self {
            Action::Play(combo) => Some(combo),
            Action::Pass => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Play(combo) => write!(f, "play {combo}"),
            Action::Pass => f.write_str("pass"),
        }
    }
}

/// A recorded action with its position in the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,

    /// Trick number, starting at 1.
    pub trick: u32,

    /// Position within the round, starting at 0.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, trick: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            trick,
            sequence,
        }
    }
}
