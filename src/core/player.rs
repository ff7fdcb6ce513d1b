//! Player identification and per-seat storage.
//!
//! Seats are numbered clockwise from 0; turn order follows seat order.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat index of a player, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one at a table of `player_count`.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count.max(1)) as u8)
    }

    /// All seats at a table of `player_count`.
    ///
    /// ```
    /// use tien_len::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`.
///
/// ```
/// use tien_len::core::{PlayerId, PlayerMap};
///
/// let mut cards_left: PlayerMap<usize> = PlayerMap::with_value(4, 13);
/// cards_left[PlayerId::new(1)] = 12;
/// assert_eq!(cards_left[PlayerId::new(1)], 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build with a per-seat factory.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Build from one value per seat, in seat order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Whether `player` names a seat in this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        assert_eq!(p0.index(), 0);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId::new(2).next(4), PlayerId::new(3));
        assert_eq!(PlayerId::new(3).next(4), PlayerId::new(0));
        assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert!(map.contains(PlayerId::new(3)));
        assert!(!map.contains(PlayerId::new(4)));
    }

    #[test]
    fn test_player_map_mutation_and_iter() {
        let mut map: PlayerMap<i32> = PlayerMap::with_value(3, 0);
        map[PlayerId::new(1)] = 7;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[1], (PlayerId::new(1), &7));
        assert_eq!(map.values().sum::<i32>(), 7);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::from_vec(vec![1, 2]);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }
}
