//! Combination classifier.
//!
//! Turns an unordered set of cards into a tagged [`Combination`] with a
//! comparison key, or rejects it. Classification depends on the house
//! rules: 2s in straights, pair-run bombs and the suit order.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, Rank};
use crate::core::config::HouseRules;
use crate::core::error::TienLenError;

/// Kinds of bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BombKind {
    /// Four cards of one rank (tứ quý).
    FourOfAKind,
    /// Three or more pairs of consecutive ranks. Only with `bomb_beats_two`.
    PairRun,
}

/// Shape class of a combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Single,
    Pair,
    Triple,
    Straight,
    Bomb(BombKind),
}

impl Shape {
    /// Enumeration priority used by the move generator.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Shape::Single => 0,
            Shape::Pair => 1,
            Shape::Triple => 2,
            Shape::Straight => 3,
            Shape::Bomb(BombKind::FourOfAKind) => 4,
            Shape::Bomb(BombKind::PairRun) => 5,
        }
    }

    #[must_use]
    pub const fn is_bomb(self) -> bool {
        matches!(self, Shape::Bomb(_))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Single => "single",
            Shape::Pair => "pair",
            Shape::Triple => "triple",
            Shape::Straight => "straight",
            Shape::Bomb(BombKind::FourOfAKind) => "four-of-a-kind bomb",
            Shape::Bomb(BombKind::PairRun) => "pair-run bomb",
        };
        f.write_str(name)
    }
}

/// Comparison key: shape, length and the value of the highest card.
///
/// `length` is the card count, except for pair runs where it counts pairs.
/// Keys are only comparable when shape and length agree, bar the house
/// rule exceptions; see [`crate::rules::validator::compare_keys`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankKey {
    pub shape: Shape,
    pub length: u8,
    pub top: u8,
}

impl RankKey {
    /// Strength tier among bombs: 3-pair run < four-of-a-kind < longer runs.
    #[must_use]
    pub fn bomb_tier(self) -> Option<u8> {
        match self.shape {
            Shape::Bomb(BombKind::PairRun) if self.length <= 3 => Some(0),
            Shape::Bomb(BombKind::FourOfAKind) => Some(1),
            Shape::Bomb(BombKind::PairRun) => Some(self.length - 2),
            _ => None,
        }
    }
}

/// A classified, playable set of cards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    key: RankKey,
    /// Ascending by card value.
    cards: SmallVec<[Card; 4]>,
}

impl Combination {
    /// Classify `cards`, failing with `InvalidCombination`.
    pub fn try_new(cards: &[Card], rules: &HouseRules) -> Result<Self, TienLenError> {
        classify(cards, rules).ok_or_else(|| TienLenError::InvalidCombination {
            cards: cards.to_vec(),
        })
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.key.shape
    }

    #[must_use]
    pub fn key(&self) -> RankKey {
        self.key
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.key.length as usize
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    #[must_use]
    pub fn is_bomb(&self) -> bool {
        self.key.shape.is_bomb()
    }

    /// The defining (highest) card.
    #[must_use]
    pub fn top_card(&self) -> Card {
        self.cards[self.cards.len() - 1]
    }

    /// Whether every card is a 2 (a single 2 or a pair of 2s).
    #[must_use]
    pub fn is_all_twos(&self) -> bool {
        self.cards.iter().all(|c| c.rank == Rank::Two)
    }

    #[must_use]
    pub fn bomb_tier(&self) -> Option<u8> {
        self.key.bomb_tier()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.key.shape)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}

/// Classify a card set, or `None` if it is not a playable shape.
///
/// Total and deterministic: input order does not matter and duplicate
/// cards are rejected.
pub fn classify(cards: &[Card], rules: &HouseRules) -> Option<Combination> {
    let order = rules.card_order();
    let mut sorted: SmallVec<[Card; 4]> = cards.iter().copied().collect();
    order.sort(&mut sorted);

    if sorted.is_empty() || sorted.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }

    let n = sorted.len();
    let same_rank = sorted.iter().all(|c| c.rank == sorted[0].rank);
    let (shape, length) = match n {
        1 => (Shape::Single, 1),
        2 if same_rank => (Shape::Pair, 2),
        3 if same_rank => (Shape::Triple, 3),
        4 if same_rank => (Shape::Bomb(BombKind::FourOfAKind), 4),
        _ if is_straight(&sorted, rules) => (Shape::Straight, n),
        _ if rules.bomb_beats_two && is_pair_run(&sorted) => (Shape::Bomb(BombKind::PairRun), n / 2),
        _ => return None,
    };

    let top = order.value(sorted[n - 1]);
    Some(Combination {
        key: RankKey {
            shape,
            length: length as u8,
            top,
        },
        cards: sorted,
    })
}

fn is_straight(sorted: &[Card], rules: &HouseRules) -> bool {
    if sorted.len() < 3 {
        return false;
    }
    if !rules.allow_two_in_straights && sorted.iter().any(|c| c.rank == Rank::Two) {
        return false;
    }
    sorted
        .windows(2)
        .all(|w| w[1].rank.index() == w[0].rank.index() + 1)
}

fn is_pair_run(sorted: &[Card]) -> bool {
    if sorted.len() < 6 || sorted.len() % 2 != 0 {
        return false;
    }
    if sorted.iter().any(|c| c.rank == Rank::Two) {
        return false;
    }
    let pairs: SmallVec<[Rank; 6]> = sorted
        .chunks(2)
        .map(|p| if p[0].rank == p[1].rank { Some(p[0].rank) } else { None })
        .collect::<Option<_>>()
        .unwrap_or_default();
    pairs.len() * 2 == sorted.len()
        && pairs.windows(2).all(|w| w[1].index() == w[0].index() + 1)
}
