//! Round state.
//!
//! `GameState` is the authoritative aggregate for one round: seats with
//! their hands and pass flags, the pile of the current trick, the discard,
//! turn order and the finishing order. It is an immutable value; the state
//! machine in [`crate::games::tien_len`] produces a new state per action.
//!
//! Uses `im` persistent data structures so clones are O(1), which keeps
//! both the one-level undo and AI lookahead cheap.

use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::action::ActionRecord;
use super::config::HouseRules;
use super::error::{Result, TienLenError};
use super::player::{PlayerId, PlayerMap};
use crate::cards::{Card, Hand};
use crate::rules::Combination;

/// State machine phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The current player opens a trick and may not pass.
    AwaitingLead,
    /// The current player must beat the pile or pass.
    AwaitingFollow,
    /// At most one player still holds cards.
    RoundOver,
}

/// One player's seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub hand: Hand,

    /// Passed since the last play on this trick.
    pub passed: bool,

    /// Finishing place, 0 for the first player out.
    pub place: Option<usize>,
}

impl Seat {
    #[must_use]
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            passed: false,
            place: None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.place.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileEntry {
    pub player: PlayerId,
    pub combination: Combination,
}

/// Plays made in the current trick, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    plays: Vector<PileEntry>,
}

impl Pile {
    /// The combination the next play must beat.
    #[must_use]
    pub fn top(&self) -> Option<&Combination> {
        self.plays.last().map(|entry| &entry.combination)
    }

    /// Who made the top play.
    #[must_use]
    pub fn last_player(&self) -> Option<PlayerId> {
        self.plays.last().map(|entry| entry.player)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PileEntry> {
        self.plays.iter()
    }

    pub(crate) fn push(&mut self, player: PlayerId, combination: Combination) {
        self.plays.push_back(PileEntry { player, combination });
    }

    pub(crate) fn clear(&mut self) {
        self.plays.clear();
    }
}

/// Complete state of one round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) rules: HouseRules,
    pub(crate) seats: PlayerMap<Seat>,
    pub(crate) pile: Pile,
    /// Every card played this round, including the current pile.
    pub(crate) discard: Vector<Card>,
    pub(crate) phase: Phase,
    pub(crate) current: PlayerId,
    /// Consecutive passes since the last play.
    pub(crate) passes: usize,
    /// Card the first play of the round must include; cleared once played.
    pub(crate) opening_card: Option<Card>,
    pub(crate) finish_order: Vector<PlayerId>,
    pub(crate) history: Vector<ActionRecord>,
    pub(crate) trick: u32,
    pub(crate) seed: u64,
    /// Number of cards dealt; hands plus discard always add up to it.
    pub(crate) dealt: usize,
    #[serde(skip)]
    pub(crate) previous: Option<Arc<GameState>>,
}

impl GameState {
    /// Fresh round state. `leader` opens and must play `opening_card`.
    pub(crate) fn new(
        rules: HouseRules,
        hands: Vec<Hand>,
        leader: PlayerId,
        opening_card: Card,
        seed: u64,
    ) -> Self {
        let dealt = hands.iter().map(Hand::len).sum();
        Self {
            rules,
            seats: PlayerMap::from_vec(hands.into_iter().map(Seat::new).collect()),
            pile: Pile::default(),
            discard: Vector::new(),
            phase: Phase::AwaitingLead,
            current: leader,
            passes: 0,
            opening_card: Some(opening_card),
            finish_order: Vector::new(),
            history: Vector::new(),
            trick: 1,
            seed,
            dealt,
            previous: None,
        }
    }

    #[must_use]
    pub fn rules(&self) -> &HouseRules {
        &self.rules
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.player_count()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_round_over(&self) -> bool {
        self.phase == Phase::RoundOver
    }

    /// Whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// # Panics
    ///
    /// Panics if `player` is not seated.
    #[must_use]
    pub fn seat(&self, player: PlayerId) -> &Seat {
        &self.seats[player]
    }

    /// # Panics
    ///
    /// Panics if `player` is not seated.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.seats[player].hand
    }

    #[must_use]
    pub fn seats(&self) -> &PlayerMap<Seat> {
        &self.seats
    }

    #[must_use]
    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    /// The combination to beat, `None` on a lead.
    #[must_use]
    pub fn top(&self) -> Option<&Combination> {
        self.pile.top()
    }

    /// Who made the last play of the current trick.
    #[must_use]
    pub fn last_player(&self) -> Option<PlayerId> {
        self.pile.last_player()
    }

    #[must_use]
    pub fn discard(&self) -> &Vector<Card> {
        &self.discard
    }

    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }

    #[must_use]
    pub fn opening_card(&self) -> Option<Card> {
        self.opening_card
    }

    #[must_use]
    pub fn finish_order(&self) -> &Vector<PlayerId> {
        &self.finish_order
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Current trick number, starting at 1.
    #[must_use]
    pub fn trick(&self) -> u32 {
        self.trick
    }

    /// Seed the round was dealt from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// State before the last action, if there was one.
    #[must_use]
    pub fn previous(&self) -> Option<&GameState> {
        self.previous.as_deref()
    }

    /// Whether `player` still holds cards.
    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.seats.contains(player) && !self.seats[player].is_finished()
    }

    /// Players still holding cards, in seat order.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats
            .iter()
            .filter(|(_, seat)| !seat.is_finished())
            .map(|(player, _)| player)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// First active seat after `player` in turn order, if any.
    #[must_use]
    pub fn next_active_after(&self, player: PlayerId) -> Option<PlayerId> {
        let count = self.player_count();
        let mut seat = player;
        for _ in 0..count {
            seat = seat.next(count);
            if self.is_active(seat) {
                return Some(seat);
            }
        }
        None
    }

    /// Players ordered by standing: finished players by place, then the
    /// rest by fewest cards held (ties by seat).
    #[must_use]
    pub fn rankings(&self) -> Vec<PlayerId> {
        let mut ranking: Vec<PlayerId> = self.finish_order.iter().copied().collect();
        let mut rest: Vec<PlayerId> = self.active_players().collect();
        rest.sort_by_key(|&p| (self.seats[p].hand.len(), p.index()));
        ranking.extend(rest);
        ranking
    }

    /// Round points per seat (`player_count - 1 - place`) once the round
    /// is over.
    #[must_use]
    pub fn round_points(&self) -> Option<PlayerMap<u32>> {
        if !self.is_round_over() {
            return None;
        }
        let last = self.player_count() - 1;
        Some(PlayerMap::new(self.player_count(), |player| {
            self.seats[player]
                .place
                .map_or(0, |place| last.saturating_sub(place) as u32)
        }))
    }

    /// Verify that hands and discard partition the dealt cards exactly.
    pub fn check_accounting(&self) -> Result<()> {
        let mut seen: FxHashSet<Card> = FxHashSet::default();
        let held = self.seats.values().flat_map(|seat| seat.hand.iter());
        for card in held.chain(self.discard.iter().copied()) {
            if !seen.insert(card) {
                warn!(%card, "card accounted for twice");
                return Err(TienLenError::InvariantViolation(format!(
                    "{card} appears more than once"
                )));
            }
        }
        if seen.len() != self.dealt {
            warn!(cards = seen.len(), dealt = self.dealt, "deck accounting mismatch");
            return Err(TienLenError::InvariantViolation(format!(
                "{} cards accounted for, expected {}",
                seen.len(),
                self.dealt
            )));
        }
        Ok(())
    }
}
