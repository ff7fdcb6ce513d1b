//! A player's hand.
//!
//! Backed by `im::Vector` so cloning a `GameState` stays O(1). Cards are
//! kept sorted ascending under the round's `CardOrder`.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, CardOrder, Rank};

/// Cards of a hand grouped by rank index, each group ascending by value.
pub type RankGroups = [SmallVec<[Card; 4]>; Rank::COUNT];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vector<Card>,
}

impl Hand {
    /// Build a hand, sorting the cards under `order`.
    #[must_use]
    pub fn new(cards: impl IntoIterator<Item = Card>, order: CardOrder) -> Self {
        let mut sorted: Vec<Card> = cards.into_iter().collect();
        order.sort(&mut sorted);
        Self {
            cards: sorted.into_iter().collect(),
        }
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

    /// Iterate cards in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Card> {
        self.iter().collect()
    }

    /// Remove all of `cards`, or nothing.
    ///
    /// Returns the first card not held on failure.
    pub fn remove_cards(&mut self, cards: &[Card]) -> Result<(), Card> {
        if let Some(&missing) = cards.iter().find(|&&c| !self.contains(c)) {
            return Err(missing);
        }
        for card in cards {
            if let Some(idx) = self.cards.index_of(card) {
                self.cards.remove(idx);
            }
        }
        Ok(())
    }

    /// The hand left after playing `cards` (cards not held are ignored).
    #[must_use]
    pub fn without(&self, cards: &[Card]) -> Hand {
        Self {
            cards: self.cards.iter().filter(|c| !cards.contains(*c)).copied().collect(),
        }
    }

    /// Number of cards held of `rank`.
    #[must_use]
    pub fn count_rank(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|c| c.rank == rank).count()
    }

    /// Group the hand by rank.
    #[must_use]
    pub fn rank_groups(&self) -> RankGroups {
        let mut groups: RankGroups = std::array::from_fn(|_| SmallVec::new());
        for card in self.iter() {
            groups[card.rank.index()].push(card);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::card::{parse_cards, Suit};

    fn hand(s: &str) -> Hand {
        Hand::new(parse_cards(s).unwrap(), CardOrder::default())
    }

    #[test]
    fn test_hand_is_sorted() {
        let h = hand("2♠ 3♥ 3♠ K♦");
        assert_eq!(h.to_vec(), parse_cards("3♠ 3♥ K♦ 2♠").unwrap());

        let flipped = Hand::new(parse_cards("3♥ 3♠").unwrap(), CardOrder::new(true));
        assert_eq!(flipped.to_vec(), parse_cards("3♥ 3♠").unwrap());
    }

    #[test]
    fn test_remove_cards_is_atomic() {
        let mut h = hand("3♠ 4♠ 5♠");
        let missing = Card::new(Rank::Six, Suit::Spades);

        let result = h.remove_cards(&[Card::new(Rank::Three, Suit::Spades), missing]);
        assert_eq!(result, Err(missing));
        assert_eq!(h.len(), 3);

        assert!(h.remove_cards(&parse_cards("3♠ 5♠").unwrap()).is_ok());
        assert_eq!(h.to_vec(), parse_cards("4♠").unwrap());
    }

    #[test]
    fn test_without_leaves_original() {
        let h = hand("3♠ 4♠ 5♠");
        let rest = h.without(&parse_cards("4♠").unwrap());
        assert_eq!(rest.len(), 2);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_rank_groups() {
        let h = hand("3♠ 3♥ 3♣ 7♦ 2♥");
        let groups = h.rank_groups();
        assert_eq!(groups[Rank::Three.index()].len(), 3);
        assert_eq!(groups[Rank::Seven.index()].len(), 1);
        assert_eq!(groups[Rank::Two.index()].len(), 1);
        assert!(groups[Rank::Four.index()].is_empty());
        assert_eq!(h.count_rank(Rank::Three), 3);
    }
}
