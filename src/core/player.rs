//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! A match always has exactly two players, `PlayerId::FIRST` and
//! `PlayerId::SECOND`. `opponent()` flips between them.
//!
//! ## PlayerMap
//!
//! Per-player storage backed by `Vec` for O(1) access, indexable by
//! `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::{EngineError, EngineResult};

/// Player identifier.
///
/// Player indices are 0-based: the first player is `PlayerId::FIRST`.
/// Only the two valid ids can be constructed or deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// The player who takes the first turn.
    pub const FIRST: PlayerId = PlayerId(0);
    /// The other player.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a player ID, rejecting anything but 0 and 1.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(1), Ok(PlayerId::SECOND));
    /// assert!(PlayerId::new(2).is_err());
    /// ```
    pub fn new(id: u8) -> EngineResult<Self> {
        match id {
            0 => Ok(Self::FIRST),
            1 => Ok(Self::SECOND),
            _ => Err(EngineError::invalid(format!("no player with index {id}"))),
        }
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other player of a two-player match.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
    /// assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - (self.0 & 1))
    }

    /// Both players, in turn order.
    pub fn both() -> [PlayerId; 2] {
        [Self::FIRST, Self::SECOND]
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = EngineError;

    fn try_from(id: u8) -> EngineResult<Self> {
        Self::new(id)
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> u8 {
        player.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ccg_rules::core::{PlayerId, PlayerMap};
///
/// let mut armor: PlayerMap<i32> = PlayerMap::new(|_| 0);
/// armor[PlayerId::SECOND] = 5;
///
/// assert_eq!(armor[PlayerId::FIRST], 0);
/// assert_eq!(armor[PlayerId::SECOND], 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map for both players from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: PlayerId::both().into_iter().map(factory).collect(),
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
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
        let p0 = PlayerId::new(0).unwrap();
        let p1 = PlayerId::new(1).unwrap();

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_out_of_range_ids_are_rejected() {
        assert!(matches!(PlayerId::new(2), Err(EngineError::InvalidArgument(_))));
        assert!(PlayerId::try_from(u8::MAX).is_err());
        assert!(serde_json::from_str::<PlayerId>("2").is_err());
        assert_eq!(serde_json::from_str::<PlayerId>("1").unwrap(), PlayerId::SECOND);
        assert_eq!(serde_json::to_string(&PlayerId::FIRST).unwrap(), "0");
    }

    #[test]
    fn test_opponent_is_involution() {
        for p in PlayerId::both() {
            assert_ne!(p, p.opponent());
            assert_eq!(p, p.opponent().opponent());
        }
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::FIRST], 0);
        assert_eq!(map[PlayerId::SECOND], 10);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<i32> = PlayerMap::new(|_| 0);

        map[PlayerId::FIRST] = 10;
        map[PlayerId::SECOND] = 20;

        assert_eq!(map[PlayerId::FIRST], 10);
        assert_eq!(map[PlayerId::SECOND], 20);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::FIRST, &0), (PlayerId::SECOND, &1)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
