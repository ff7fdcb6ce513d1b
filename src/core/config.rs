//! House rule configuration.
//!
//! The surrounding application owns the options file format; the engine
//! only needs the deserialized toggles. Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::cards::CardOrder;

/// Optional rule toggles for a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseRules {
    /// Allow a 2 as the top card of a straight (Q-K-A-2, never wrapping).
    pub allow_two_in_straights: bool,

    /// A strictly longer straight beats a shorter one regardless of rank.
    pub chain_cutting: bool,

    /// Runs of three or more consecutive pairs count as bombs that cut 2s.
    pub bomb_beats_two: bool,

    /// Bombs may beat lower bombs. Without it bomb-on-bomb is illegal.
    pub bomb_hierarchy: bool,

    /// Reverse the suit ranking (♥ lowest).
    pub flip_suit_rank: bool,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            allow_two_in_straights: false,
            chain_cutting: false,
            bomb_beats_two: false,
            bomb_hierarchy: true,
            flip_suit_rank: false,
        }
    }
}

impl HouseRules {
    pub fn with_two_in_straights(mut self, enabled: bool) -> Self {
        self.allow_two_in_straights = enabled;
        self
    }

    pub fn with_chain_cutting(mut self, enabled: bool) -> Self {
        self.chain_cutting = enabled;
        self
    }

    pub fn with_bomb_beats_two(mut self, enabled: bool) -> Self {
        self.bomb_beats_two = enabled;
        self
    }

    pub fn with_bomb_hierarchy(mut self, enabled: bool) -> Self {
        self.bomb_hierarchy = enabled;
        self
    }

    pub fn with_flipped_suits(mut self, enabled: bool) -> Self {
        self.flip_suit_rank = enabled;
        self
    }

    /// Card order implied by these rules.
    #[must_use]
    pub fn card_order(&self) -> CardOrder {
        CardOrder::new(self.flip_suit_rank)
    }
}
