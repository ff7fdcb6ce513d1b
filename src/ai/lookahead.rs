//! Lookahead strategies for the selector.
//!
//! A lookahead adjusts a move's score by what the opponents can do about
//! it. Strategies are trait objects or generics over [`LookaheadPolicy`],
//! so a deeper search can replace the one-ply estimate without touching
//! the selector.

use crate::core::{Action, GameState, PlayerId};
use crate::rules::{Combination, RulesEngine};

use super::evaluator::Evaluator;

/// Score adjustment for playing `combo` from `state`.
pub trait LookaheadPolicy {
    fn adjust(&self, state: &GameState, player: PlayerId, combo: &Combination, evaluator: &Evaluator) -> f64;
}

impl<P: LookaheadPolicy + ?Sized> LookaheadPolicy for Box<P> {
    fn adjust(&self, state: &GameState, player: PlayerId, combo: &Combination, evaluator: &Evaluator) -> f64 {
        (**self).adjust(state, player, combo, evaluator)
    }
}

/// No adjustment.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLookahead;

impl LookaheadPolicy for NoLookahead {
    fn adjust(&self, _: &GameState, _: PlayerId, _: &Combination, _: &Evaluator) -> f64 {
        0.0
    }
}

/// One-ply estimate: simulate the move, then subtract a weighted score of
/// the next player's best reply.
///
/// Reads the opponents' actual hands. That is the engine's own view of the
/// round, not what a human at the table could see.
#[derive(Clone, Debug)]
pub struct OnePly<E> {
    engine: E,
    /// Share of the best reply's score subtracted.
    pub reply_weight: f64,
}

impl<E: RulesEngine> OnePly<E> {
    pub const DEFAULT_REPLY_WEIGHT: f64 = 0.25;

    pub fn new(engine: E) -> Self {
        Self {
            engine,
            reply_weight: Self::DEFAULT_REPLY_WEIGHT,
        }
    }

    pub fn with_reply_weight(mut self, weight: f64) -> Self {
        self.reply_weight = weight;
        self
    }
}

impl<E: RulesEngine> LookaheadPolicy for OnePly<E> {
    fn adjust(&self, state: &GameState, player: PlayerId, combo: &Combination, evaluator: &Evaluator) -> f64 {
        let Ok(next) = self.engine.apply_action(state, player, &Action::Play(combo.clone())) else {
            return 0.0;
        };
        if self.engine.is_terminal(&next).is_some() {
            return 0.0;
        }
        let responder = next.current_player();
        if responder == player {
            return 0.0;
        }

        let replies: Vec<Combination> = self
            .engine
            .legal_actions(&next, responder)
            .into_iter()
            .filter_map(|action| match action {
                Action::Play(reply) => Some(reply),
                Action::Pass => None,
            })
            .collect();
        evaluator
            .best(&next, &replies)
            .map_or(0.0, |(_, score)| -self.reply_weight * score)
    }
}

/// Depth-limited minimax over whole actions, passes included.
///
/// `depth` counts plies from the candidate move itself, so depth 1 judges
/// the position right after the move and depth 2 lets the next player
/// answer first. Leaves are scored by [`outlook`]. Like [`OnePly`] it sees
/// every hand.
#[derive(Clone, Debug)]
pub struct Minimax<E> {
    engine: E,
    depth: usize,
    /// Scale applied to the searched outlook.
    pub weight: f64,
}

impl<E: RulesEngine> Minimax<E> {
    pub const DEFAULT_WEIGHT: f64 = 0.5;

    pub fn new(engine: E, depth: usize) -> Self {
        Self {
            engine,
            depth: depth.max(1),
            weight: Self::DEFAULT_WEIGHT,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn search(&self, state: &GameState, player: PlayerId, depth: usize) -> f64 {
        if depth == 0 || self.engine.is_terminal(state).is_some() {
            return outlook(state, player);
        }
        let actor = state.current_player();
        let values = self
            .engine
            .legal_actions(state, actor)
            .into_iter()
            .filter_map(|action| self.engine.apply_action(state, actor, &action).ok())
            .map(|next| self.search(&next, player, depth - 1));
        let value = if actor == player {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        };
        if value.is_finite() {
            value
        } else {
            outlook(state, player)
        }
    }
}

impl<E: RulesEngine> LookaheadPolicy for Minimax<E> {
    fn adjust(&self, state: &GameState, player: PlayerId, combo: &Combination, _: &Evaluator) -> f64 {
        match self.engine.apply_action(state, player, &Action::Play(combo.clone())) {
            Ok(next) => self.weight * self.search(&next, player, self.depth - 1),
            Err(_) => 0.0,
        }
    }
}

/// How well `player` stands, in `[-1, 1]`.
///
/// A finished player scores by place, 1 for first down to -1 for last.
/// Otherwise the card gap to the closest rival, over a full hand.
#[must_use]
pub fn outlook(state: &GameState, player: PlayerId) -> f64 {
    let seat = state.seat(player);
    if let Some(place) = seat.place {
        let last = state.player_count().saturating_sub(1).max(1);
        return 1.0 - 2.0 * place as f64 / last as f64;
    }
    let own = seat.hand.len() as f64;
    let rival = state
        .active_players()
        .filter(|&p| p != player)
        .map(|p| state.hand(p).len())
        .min()
        .unwrap_or(0) as f64;
    ((rival - own) / 13.0).clamp(-1.0, 1.0)
}
