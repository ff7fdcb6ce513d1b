//! Card values: suit, rank and the house-rule dependent card order.
//!
//! `Card` deliberately does not implement `Ord`. The strength of a card
//! depends on the active `flip_suit_rank` house rule, so every comparison
//! goes through [`CardOrder`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four suits.
///
/// Declaration order is the default suit ranking: ♠ < ♣ < ♦ < ♥.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Clubs,
    Diamonds,
    Hearts,
}

impl Suit {
    /// All suits in default ascending order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];

    /// Index in the default (unflipped) suit order.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Unicode symbol used in card notation.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
        }
    }

    fn from_symbol(c: char) -> Option<Suit> {
        match c {
            '♠' | 'S' | 's' => Some(Suit::Spades),
            '♣' | 'C' | 'c' => Some(Suit::Clubs),
            '♦' | 'D' | 'd' => Some(Suit::Diamonds),
            '♥' | 'H' | 'h' => Some(Suit::Hearts),
            _ => None,
        }
    }
}

/// Card rank in Tiến Lên order: 3 is the lowest, 2 the highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    Two,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 13] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Two,
    ];

    /// Number of ranks.
    pub const COUNT: usize = 13;

    /// 0-based position in the rank order (Three = 0, Two = 12).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank at the given position, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Rank> {
        Rank::ALL.get(index).copied()
    }

    /// Short label used in card notation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
        }
    }

    fn from_label(label: &str) -> Option<Rank> {
        let rank = match label.to_ascii_uppercase().as_str() {
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" => Rank::Ace,
            "2" => Rank::Two,
            _ => return None,
        };
        Some(rank)
    }
}

/// A playing card. Equality is structural.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.symbol())
    }
}

/// Error parsing card notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseCardError {
    #[error("empty card notation")]
    Empty,
    #[error("unknown suit in {0:?}")]
    UnknownSuit(String),
    #[error("unknown rank in {0:?}")]
    UnknownRank(String),
    #[error("card {0} listed twice")]
    Duplicate(Card),
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses `3♠`, `10♥`, `QD` or `th` style notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_char = s.chars().last().ok_or(ParseCardError::Empty)?;
        let suit =
            Suit::from_symbol(suit_char).ok_or_else(|| ParseCardError::UnknownSuit(s.to_string()))?;
        let rank_part = &s[..s.len() - suit_char.len_utf8()];
        let rank =
            Rank::from_label(rank_part).ok_or_else(|| ParseCardError::UnknownRank(s.to_string()))?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse a whitespace separated list of cards, rejecting duplicates.
///
/// ```
/// use tien_len::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("3♠ 3♣ 10h").unwrap();
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Hearts));
/// ```
pub fn parse_cards(s: &str) -> Result<Vec<Card>, ParseCardError> {
    let mut cards: Vec<Card> = Vec::new();
    for token in s.split_whitespace() {
        let card: Card = token.parse()?;
        if cards.contains(&card) {
            return Err(ParseCardError::Duplicate(card));
        }
        cards.push(card);
    }
    Ok(cards)
}

/// Total order over cards under the active suit ranking.
///
/// A card's value is `rank_index * 4 + suit_index`, so rank dominates and
/// suit breaks ties. Two distinct cards never share a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardOrder {
    /// Reverse the suit ranking (♥ lowest, ♠ highest).
    pub flip_suit_rank: bool,
}

impl CardOrder {
    /// Highest possible card value.
    pub const MAX_VALUE: u8 = 51;

    #[must_use]
    pub const fn new(flip_suit_rank: bool) -> Self {
        Self { flip_suit_rank }
    }

    /// Position of a suit in the active suit order.
    #[must_use]
    pub const fn suit_rank(self, suit: Suit) -> u8 {
        if self.flip_suit_rank {
            3 - suit.index()
        } else {
            suit.index()
        }
    }

    /// Comparison value of a card in `0..=51`.
    #[must_use]
    pub const fn value(self, card: Card) -> u8 {
        card.rank.index() as u8 * 4 + self.suit_rank(card.suit)
    }

    /// Compare two cards.
    #[must_use]
    pub fn compare(self, a: Card, b: Card) -> Ordering {
        self.value(a).cmp(&self.value(b))
    }

    /// The lowest card in the deck; its holder leads the round.
    #[must_use]
    pub const fn lowest_card(self) -> Card {
        let suit = if self.flip_suit_rank { Suit::Hearts } else { Suit::Spades };
        Card::new(Rank::Three, suit)
    }

    /// Sort cards ascending by value.
    pub fn sort(self, cards: &mut [Card]) {
        cards.sort_by_key(|&c| self.value(c));
    }

    /// Highest card of a non-empty slice.
    #[must_use]
    pub fn highest(self, cards: &[Card]) -> Option<Card> {
        cards.iter().copied().max_by_key(|&c| self.value(c))
    }
}
