//! The 52-card deck and dealing.

use crate::core::rng::GameRng;

use super::card::{Card, Rank, Suit};

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// All 52 cards in canonical order (rank major, suit minor).
#[must_use]
pub fn full_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for rank in Rank::ALL {
        for suit in Suit::ALL {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

/// A standard deck. No jokers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// An unshuffled deck in canonical order.
    #[must_use]
    pub fn new() -> Self {
        Self { cards: full_deck() }
    }

    /// A deck shuffled with the given RNG.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::new();
        rng.shuffle(&mut deck.cards);
        deck
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

    /// Deal the whole deck round-robin into `hands` hands.
    ///
    /// When 52 is not divisible by `hands` the first seats receive one
    /// extra card, so no card is ever left undealt.
    #[must_use]
    pub fn deal(self, hands: usize) -> Vec<Vec<Card>> {
        let hands = hands.max(1);
        let mut dealt: Vec<Vec<Card>> = (0..hands)
            .map(|_| Vec::with_capacity(DECK_SIZE / hands + 1))
            .collect();
        for (i, card) in self.cards.into_iter().enumerate() {
            dealt[i % hands].push(card);
        }
        dealt
    }
}
