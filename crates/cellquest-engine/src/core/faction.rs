use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One of the five factions contesting the grid.
///
/// Iteration order ([`Faction::ALL`]) is significant: it is the order in which
/// faction counts are reported and in which the learning step visits factions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Faction {
    #[display("blue")]
    Blue = 0,
    #[display("red")]
    Red = 1,
    #[display("yellow")]
    Yellow = 2,
    #[display("green")]
    Green = 3,
    #[display("purple")]
    Purple = 4,
}

impl Faction {
    /// Number of factions (5).
    pub const LEN: usize = 5;

    pub const ALL: [Faction; Self::LEN] = [
        Faction::Blue,
        Faction::Red,
        Faction::Yellow,
        Faction::Green,
        Faction::Purple,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case key used in JSON maps and ledger file names (`"blue"`, ...).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Faction::Blue => "blue",
            Faction::Red => "red",
            Faction::Yellow => "yellow",
            Faction::Green => "green",
            Faction::Purple => "purple",
        }
    }

    /// Owner token written into cell records (`"TeamBlue"`, ...).
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Faction::Blue => "TeamBlue",
            Faction::Red => "TeamRed",
            Faction::Yellow => "TeamYellow",
            Faction::Green => "TeamGreen",
            Faction::Purple => "TeamPurple",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }

    /// Strength triple stamped into a faction's seed cell when a new episode is built.
    ///
    /// The round engine never reads it back.
    #[must_use]
    pub const fn seed_strength(self) -> [u32; 3] {
        match self {
            Faction::Blue => [10, 1, 1],
            Faction::Red => [1, 10, 1],
            Faction::Yellow => [1, 1, 1],
            Faction::Green => [1, 1, 10],
            Faction::Purple => [10, 10, 10],
        }
    }
}

/// Token used for cells without an owner.
pub const UNOWNED_TOKEN: &str = "None";

/// A fixed-size table holding one value per faction.
///
/// Serialized as a JSON object keyed by [`Faction::key`]
/// (`{"blue": .., "red": .., "yellow": .., "green": .., "purple": ..}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "KeyedFactionMap<T>",
    into = "KeyedFactionMap<T>",
    bound(
        serialize = "T: Clone + Serialize",
        deserialize = "T: Deserialize<'de>"
    )
)]
pub struct FactionMap<T>([T; Faction::LEN]);

impl<T> FactionMap<T> {
    #[must_use]
    pub const fn new(values: [T; Faction::LEN]) -> Self {
        Self(values)
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(Faction) -> T,
    {
        Self(Faction::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Faction, &T)> + '_ {
        Faction::ALL.into_iter().zip(&self.0)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    pub fn map<U, F>(&self, mut f: F) -> FactionMap<U>
    where
        F: FnMut(Faction, &T) -> U,
    {
        FactionMap::from_fn(|faction| f(faction, &self.0[faction.index()]))
    }
}

impl<T> Index<Faction> for FactionMap<T> {
    type Output = T;

    fn index(&self, faction: Faction) -> &T {
        &self.0[faction.index()]
    }
}

impl<T> IndexMut<Faction> for FactionMap<T> {
    fn index_mut(&mut self, faction: Faction) -> &mut T {
        &mut self.0[faction.index()]
    }
}

#[derive(Serialize, Deserialize)]
struct KeyedFactionMap<T> {
    blue: T,
    red: T,
    yellow: T,
    green: T,
    purple: T,
}

impl<T> From<KeyedFactionMap<T>> for FactionMap<T> {
    fn from(keyed: KeyedFactionMap<T>) -> Self {
        let KeyedFactionMap {
            blue,
            red,
            yellow,
            green,
            purple,
        } = keyed;
        Self([blue, red, yellow, green, purple])
    }
}

impl<T> From<FactionMap<T>> for KeyedFactionMap<T> {
    fn from(map: FactionMap<T>) -> Self {
        let [blue, red, yellow, green, purple] = map.0;
        Self {
            blue,
            red,
            yellow,
            green,
            purple,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        for faction in Faction::ALL {
            assert_eq!(Faction::from_token(faction.token()), Some(faction));
        }
        assert_eq!(Faction::from_token(UNOWNED_TOKEN), None);
        assert_eq!(Faction::from_token("teamblue"), None);
    }

    #[test]
    fn test_faction_map_serializes_by_key() {
        let map = FactionMap::new([1, 2, 3, 4, 5]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"blue":1,"red":2,"yellow":3,"green":4,"purple":5}"#);

        let parsed: FactionMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[Faction::Green], 4);
    }

    #[test]
    fn test_faction_map_index_follows_all_order() {
        let map = FactionMap::from_fn(Faction::index);
        for (i, faction) in Faction::ALL.into_iter().enumerate() {
            assert_eq!(map[faction], i);
        }
    }
}
