//! Legal move generation.
//!
//! [`LegalMoves`] walks a hand lazily, stage by stage: singles, pairs,
//! triples, straights, four-of-a-kind and, with `bomb_beats_two`, pair
//! runs. Within a stage candidates come out by length, then starting rank,
//! then suit choice, so the order is stable for a given hand. Every
//! candidate goes through [`classify`] and [`may_play`] before it is
//! yielded.

use smallvec::SmallVec;

use super::combination::{classify, BombKind, Combination, Shape};
use super::validator::may_play;
use crate::cards::{Card, Hand, Rank};
use crate::core::config::HouseRules;

/// One enumeration stage: `per_rank` cards from each of `min_len..=max_len`
/// consecutive ranks below `rank_limit`.
#[derive(Clone, Copy, Debug)]
struct Stage {
    shape: Shape,
    per_rank: usize,
    min_len: usize,
    max_len: usize,
    rank_limit: usize,
}

impl Stage {
    const fn new(shape: Shape, per_rank: usize, min_len: usize, max_len: usize, rank_limit: usize) -> Self {
        Self {
            shape,
            per_rank,
            min_len,
            max_len,
            rank_limit,
        }
    }

    /// Whether a play of this stage's shape could ever follow `top`.
    fn can_answer(&self, top: Option<&Combination>) -> bool {
        match top {
            None => true,
            Some(_) if self.shape.is_bomb() => true,
            Some(top) => !top.is_bomb() && top.shape() == self.shape,
        }
    }
}

fn stages(rules: &HouseRules) -> SmallVec<[Stage; 6]> {
    let all = Rank::COUNT;
    let below_two = Rank::Two.index();
    let straight_limit = if rules.allow_two_in_straights { all } else { below_two };

    let mut stages: SmallVec<[Stage; 6]> = SmallVec::new();
    stages.push(Stage::new(Shape::Single, 1, 1, 1, all));
    stages.push(Stage::new(Shape::Pair, 2, 1, 1, all));
    stages.push(Stage::new(Shape::Triple, 3, 1, 1, all));
    stages.push(Stage::new(Shape::Straight, 1, 3, straight_limit, straight_limit));
    stages.push(Stage::new(Shape::Bomb(BombKind::FourOfAKind), 4, 1, 1, all));
    if rules.bomb_beats_two {
        stages.push(Stage::new(Shape::Bomb(BombKind::PairRun), 2, 3, below_two, below_two));
    }
    stages
}

/// All `k`-card subsets of a rank group, in a fixed order.
fn subsets(group: &[Card], k: usize) -> Vec<SmallVec<[Card; 4]>> {
    let n = group.len();
    if k > n {
        return Vec::new();
    }
    (0u8..(1 << n))
        .filter(|mask| mask.count_ones() as usize == k)
        .map(|mask| {
            group
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &c)| c)
                .collect()
        })
        .collect()
}

/// Lazy, finite iterator over the combinations a hand may play.
///
/// Not restartable: collect it if you need more than one pass.
pub struct LegalMoves<'a> {
    rules: HouseRules,
    top: Option<&'a Combination>,
    groups: [SmallVec<[Card; 4]>; Rank::COUNT],
    stages: SmallVec<[Stage; 6]>,
    stage: usize,
    /// `per_rank`-subsets of each rank group for the current stage.
    choices: [Vec<SmallVec<[Card; 4]>>; Rank::COUNT],
    len: usize,
    start: usize,
    odometer: SmallVec<[usize; Rank::COUNT]>,
    in_window: bool,
}

impl<'a> LegalMoves<'a> {
    fn new(hand: &Hand, top: Option<&'a Combination>, rules: &HouseRules) -> Self {
        let mut moves = Self {
            rules: *rules,
            top,
            groups: hand.rank_groups(),
            stages: stages(rules),
            stage: 0,
            choices: std::array::from_fn(|_| Vec::new()),
            len: 0,
            start: 0,
            odometer: SmallVec::new(),
            in_window: false,
        };
        moves.enter_stage();
        moves
    }

    /// Skip stages that cannot answer the pile and prepare the next one.
    fn enter_stage(&mut self) {
        while let Some(stage) = self.stages.get(self.stage).copied() {
            if stage.can_answer(self.top) {
                for (rank, group) in self.groups.iter().enumerate() {
                    self.choices[rank] = subsets(group, stage.per_rank);
                }
                self.len = stage.min_len;
                self.start = 0;
                self.in_window = false;
                return;
            }
            self.stage += 1;
        }
    }

    /// Move to the next window of ranks that all have enough cards.
    fn seek_window(&mut self, stage: Stage) -> bool {
        while self.len <= stage.max_len {
            while self.start + self.len <= stage.rank_limit {
                let window = self.start..self.start + self.len;
                if window.clone().all(|rank| !self.choices[rank].is_empty()) {
                    self.odometer = std::iter::repeat(0).take(self.len).collect();
                    return true;
                }
                self.start += 1;
            }
            self.len += 1;
            self.start = 0;
        }
        false
    }

    /// Step to the next suit choice within the window.
    fn advance_odometer(&mut self) -> bool {
        for slot in (0..self.odometer.len()).rev() {
            let rank = self.start + slot;
            self.odometer[slot] += 1;
            if self.odometer[slot] < self.choices[rank].len() {
                return true;
            }
            self.odometer[slot] = 0;
        }
        false
    }

    fn current_cards(&self) -> SmallVec<[Card; 8]> {
        self.odometer
            .iter()
            .enumerate()
            .flat_map(|(slot, &choice)| self.choices[self.start + slot][choice].iter().copied())
            .collect()
    }

    fn next_candidate(&mut self) -> Option<SmallVec<[Card; 8]>> {
        loop {
            let stage = *self.stages.get(self.stage)?;
            if self.in_window {
                if self.advance_odometer() {
                    return Some(self.current_cards());
                }
                self.in_window = false;
                self.start += 1;
            }
            if self.seek_window(stage) {
                self.in_window = true;
                return Some(self.current_cards());
            }
            self.stage += 1;
            self.enter_stage();
        }
    }
}

impl Iterator for LegalMoves<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        while let Some(cards) = self.next_candidate() {
            if let Some(combo) = classify(&cards, &self.rules) {
                if may_play(self.top, &combo, &self.rules) {
                    return Some(combo);
                }
            }
        }
        None
    }
}

/// Combinations from `hand` that may be played on `top`.
pub fn legal_moves<'a>(hand: &Hand, top: Option<&'a Combination>, rules: &HouseRules) -> LegalMoves<'a> {
    LegalMoves::new(hand, top, rules)
}
