//! The "beats" relation.
//!
//! Decides whether a candidate combination may be played on the current
//! pile under the active house rules. Everything that depends on global
//! round state (turn order, the opening card) lives in the state machine.

use std::cmp::Ordering;

use super::combination::{BombKind, Combination, RankKey, Shape};
use crate::core::config::HouseRules;
use crate::core::error::RuleViolation;

/// Order two rank keys, or `None` if they are not comparable.
///
/// Same shape and length compare by top card. Bombs compare by tier then
/// top card, only under `bomb_hierarchy`. With `chain_cutting`, straights
/// of different lengths compare by length.
#[must_use]
pub fn compare_keys(a: RankKey, b: RankKey, rules: &HouseRules) -> Option<Ordering> {
    if a.shape.is_bomb() && b.shape.is_bomb() {
        if !rules.bomb_hierarchy {
            return None;
        }
        let tier_a = a.bomb_tier()?;
        let tier_b = b.bomb_tier()?;
        return Some(tier_a.cmp(&tier_b).then(a.top.cmp(&b.top)));
    }
    if a.shape != b.shape {
        return None;
    }
    if a.length == b.length {
        return Some(a.top.cmp(&b.top));
    }
    if a.shape == Shape::Straight && rules.chain_cutting {
        return Some(a.length.cmp(&b.length));
    }
    None
}

/// Check `candidate` against the pile top, naming the rule it breaks.
pub fn check_play(
    top: Option<&Combination>,
    candidate: &Combination,
    rules: &HouseRules,
) -> Result<(), RuleViolation> {
    let Some(top) = top else {
        return Ok(());
    };

    match (top.is_bomb(), candidate.shape()) {
        (true, Shape::Bomb(_)) => match compare_keys(candidate.key(), top.key(), rules) {
            Some(Ordering::Greater) => Ok(()),
            Some(_) => Err(RuleViolation::NotHigher),
            None => Err(RuleViolation::BombsIncomparable),
        },
        (true, _) => Err(RuleViolation::CannotBeatBomb),
        (false, Shape::Bomb(BombKind::FourOfAKind)) => Ok(()),
        (false, Shape::Bomb(BombKind::PairRun)) => pair_run_on(top, candidate),
        (false, found) => {
            if found != top.shape() {
                return Err(RuleViolation::ShapeMismatch {
                    expected: top.shape(),
                    found,
                });
            }
            match compare_keys(candidate.key(), top.key(), rules) {
                Some(Ordering::Greater) => Ok(()),
                Some(_) => Err(RuleViolation::NotHigher),
                None => Err(RuleViolation::LengthMismatch {
                    expected: top.length(),
                    found: candidate.length(),
                }),
            }
        }
    }
}

/// Pair runs only cut 2s: any run beats a single 2, four or more pairs
/// beat a pair of 2s.
fn pair_run_on(top: &Combination, run: &Combination) -> Result<(), RuleViolation> {
    if !top.is_all_twos() {
        return Err(RuleViolation::ShapeMismatch {
            expected: top.shape(),
            found: run.shape(),
        });
    }
    match top.shape() {
        Shape::Single => Ok(()),
        Shape::Pair if run.length() >= 4 => Ok(()),
        _ => Err(RuleViolation::NotHigher),
    }
}

/// Whether `candidate` may be played on the pile.
#[must_use]
pub fn may_play(top: Option<&Combination>, candidate: &Combination, rules: &HouseRules) -> bool {
    check_play(top, candidate, rules).is_ok()
}
