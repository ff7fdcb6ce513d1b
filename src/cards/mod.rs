//! Card and deck model.
//!
//! - `card`: suits, ranks, cards and the house-rule aware `CardOrder`
//! - `deck`: the 52-card deck and round-robin dealing
//! - `hand`: a player's sorted, cheaply clonable hand

pub mod card;
pub mod deck;
pub mod hand;

pub use card::{parse_cards, Card, CardOrder, ParseCardError, Rank, Suit};
pub use deck::{full_deck, Deck, DECK_SIZE};
pub use hand::{Hand, RankGroups};
