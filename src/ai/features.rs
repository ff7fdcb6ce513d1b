//! Per-move heuristic factors.
//!
//! Factors are computed on the hand left after the move, from the point of
//! view of the player whose turn it is.

use std::ops::Index;

use crate::cards::{full_deck, CardOrder, Hand, Rank, RankGroups};
use crate::core::{GameState, HouseRules, PlayerId};
use crate::rules::{BombKind, Combination, Shape};

use super::weights::{AIWeights, Factor};

/// Shortest run of ranks that counts as sequence material.
const RUN_LENGTH: usize = 3;

/// Factor values for one candidate move, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Features {
    values: [f64; Factor::COUNT],
}

impl Features {
    #[must_use]
    pub fn get(&self, factor: Factor) -> f64 {
        self.values[factor.index()]
    }

    /// `Σ weight_i × factor_i`.
    #[must_use]
    pub fn weighted(&self, weights: &AIWeights) -> f64 {
        Factor::ALL.iter().map(|&f| weights.get(f) * self.get(f)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Compute the factors of `combo` for the current player.
    #[must_use]
    pub fn compute(state: &GameState, combo: &Combination) -> Self {
        let player = state.current_player();
        let hand = state.hand(player);
        let after = hand.without(combo.cards());
        let order = state.rules().card_order();

        let mut values = [0.0; Factor::COUNT];
        values[Factor::FinishPriority.index()] = finish_priority(hand, &after, combo);
        values[Factor::BombRisk.index()] = bomb_risk(hand, combo, after.is_empty());
        values[Factor::LeadAggression.index()] = lead_aggression(state, hand, combo);
        values[Factor::DefenseHoldouts.index()] = defense_holdouts(hand, &after);
        values[Factor::SequenceValue.index()] = sequence_value(hand, combo);
        values[Factor::OpponentPressure.index()] =
            strength(combo, order) * closeness(state, player);
        Self { values }
    }
}

impl Index<Factor> for Features {
    type Output = f64;

    fn index(&self, factor: Factor) -> &f64 {
        &self.values[factor.index()]
    }
}

fn ratio(part: usize, whole: usize, empty: f64) -> f64 {
    if whole == 0 {
        empty
    } else {
        part as f64 / whole as f64
    }
}

fn finish_priority(hand: &Hand, after: &Hand, combo: &Combination) -> f64 {
    if after.is_empty() {
        1.0
    } else {
        ratio(combo.len(), hand.len(), 0.0)
    }
}

/// Share of four-of-a-kind groups the move touches.
fn bomb_risk(hand: &Hand, combo: &Combination, finishing: bool) -> f64 {
    if finishing {
        return 0.0;
    }
    let groups = hand.rank_groups();
    let bombs: Vec<usize> = (0..Rank::COUNT).filter(|&r| groups[r].len() == 4).collect();
    let touched = bombs
        .iter()
        .filter(|&&r| combo.cards().iter().any(|c| c.rank.index() == r))
        .count();
    ratio(touched, bombs.len(), 0.0)
}

fn strength(combo: &Combination, order: CardOrder) -> f64 {
    f64::from(order.value(combo.top_card())) / f64::from(CardOrder::MAX_VALUE)
}

/// 1 when the move takes the lead outright, else its top card's strength.
fn lead_aggression(state: &GameState, hand: &Hand, combo: &Combination) -> f64 {
    let order = state.rules().card_order();
    let unseen = Hand::new(
        full_deck()
            .into_iter()
            .filter(|&c| !hand.contains(c) && !state.discard().contains(&c)),
        order,
    );
    if answerable(&unseen.rank_groups(), combo, state.rules(), order) {
        strength(combo, order)
    } else {
        1.0
    }
}

/// Whether the unseen cards hold a higher play of the same shape.
fn answerable(unseen: &RankGroups, combo: &Combination, rules: &HouseRules, order: CardOrder) -> bool {
    let all = Rank::COUNT;
    let below_two = Rank::Two.index();
    let straight_limit = if rules.allow_two_in_straights { all } else { below_two };
    let (per_rank, rank_limit, longer) = match combo.shape() {
        Shape::Single => (1, all, false),
        Shape::Pair => (2, all, false),
        Shape::Triple => (3, all, false),
        Shape::Straight => (1, straight_limit, rules.chain_cutting),
        Shape::Bomb(_) if !rules.bomb_hierarchy => return false,
        Shape::Bomb(BombKind::FourOfAKind) => (4, all, false),
        Shape::Bomb(BombKind::PairRun) => (2, below_two, true),
    };

    let len = combo.length().min(rank_limit);
    let top = order.value(combo.top_card());
    let max_len = if longer { rank_limit } else { len };
    (len..=max_len).any(|window| {
        (0..=rank_limit - window).any(|start| {
            let ranks = start..start + window;
            let filled = ranks.clone().all(|r| unseen[r].len() >= per_rank);
            filled
                && (window > len
                    || unseen[start + window - 1]
                        .last()
                        .is_some_and(|&c| order.value(c) > top))
        })
    })
}

fn is_holdout(rank: Rank) -> bool {
    matches!(rank, Rank::Ace | Rank::Two)
}

fn defense_holdouts(hand: &Hand, after: &Hand) -> f64 {
    let held = hand.iter().filter(|c| is_holdout(c.rank)).count();
    let kept = after.iter().filter(|c| is_holdout(c.rank)).count();
    ratio(kept, held, 1.0)
}

/// Which ranks of the hand sit inside a run of at least `RUN_LENGTH`
/// consecutive ranks below 2.
fn run_ranks(hand: &Hand) -> [bool; Rank::COUNT] {
    let groups = hand.rank_groups();
    let mut in_run = [false; Rank::COUNT];
    let mut start = 0;
    while start < Rank::Two.index() {
        let mut end = start;
        while end < Rank::Two.index() && !groups[end].is_empty() {
            end += 1;
        }
        if end - start >= RUN_LENGTH {
            in_run[start..end].iter_mut().for_each(|slot| *slot = true);
        }
        start = end + 1;
    }
    in_run
}

/// Share of run cards kept; a straight played counts as kept.
fn sequence_value(hand: &Hand, combo: &Combination) -> f64 {
    let in_run = run_ranks(hand);
    let run_cards: Vec<_> = hand.iter().filter(|c| in_run[c.rank.index()]).collect();
    if combo.shape() == Shape::Straight {
        return 1.0;
    }
    let kept = run_cards.iter().filter(|&&c| !combo.contains(c)).count();
    ratio(kept, run_cards.len(), 1.0)
}

/// 1 when an opponent is down to one card, falling to 0 at 13 cards.
fn closeness(state: &GameState, player: PlayerId) -> f64 {
    state
        .active_players()
        .filter(|&p| p != player)
        .map(|p| state.hand(p).len())
        .min()
        .map_or(0.0, |cards| {
            (1.0 - (cards.saturating_sub(1) as f64) / 12.0).clamp(0.0, 1.0)
        })
}
