use std::fmt;

use super::faction::{Faction, UNOWNED_TOKEN};

/// Carrying capacity: the logistic growth ceiling and the population upper bound.
pub const CARRYING_CAPACITY: u32 = 1000;

/// Highest terrain value a cell can hold.
pub const MAX_TERRAIN: u32 = 2550;

/// Terrain value of freshly built cells, and the value an exhausted owned cell resets to.
pub const SEED_TERRAIN: u32 = 2400;

/// Rounds a working population up and clamps it into `[1, CARRYING_CAPACITY]`.
///
/// Non-finite or sub-unit values become 1.
#[must_use]
pub fn clamp_population(value: f64) -> u32 {
    if value.is_nan() || value < 1.0 {
        return 1;
    }
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let population = value.ceil().min(f64::from(CARRYING_CAPACITY)) as u32;
    population
}

/// Rounds a working terrain value up and clamps it into `[1, MAX_TERRAIN]`.
#[must_use]
pub fn clamp_terrain(value: f64) -> u32 {
    if value.is_nan() || value < 1.0 {
        return 1;
    }
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let terrain = value.ceil().min(f64::from(MAX_TERRAIN)) as u32;
    terrain
}

/// A single grid cell.
///
/// Position is implied by the cell's row-major index in the [`Grid`](super::Grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub owner: Option<Faction>,
    pub population: u32,
    pub terrain: u32,
    /// Legacy battle counter. Written at initialization, carried on the wire.
    pub battle: u32,
    /// Legacy per-cell strength triple. Written at initialization, never read by the round engine.
    pub legacy_strength: [u32; 3],
}

impl Cell {
    /// An unowned cell as laid down by a new episode.
    pub const SEED: Self = Self {
        owner: None,
        population: 1,
        terrain: SEED_TERRAIN,
        battle: 1,
        legacy_strength: [1, 1, 1],
    };

    /// What an unreadable cell record decodes to.
    pub const MALFORMED: Self = Self {
        owner: None,
        population: 0,
        terrain: 0,
        battle: 0,
        legacy_strength: [0, 0, 0],
    };

    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    #[must_use]
    pub fn owner_token(&self) -> &'static str {
        self.owner.map_or(UNOWNED_TOKEN, Faction::token)
    }

    /// Decodes one `x-y.Owner.pop.battle.terrain.a_b_c` record.
    ///
    /// The coordinate tag is not consumed. Fields that are missing or unreadable fall
    /// back to [`Cell::MALFORMED`]'s values instead of failing.
    #[must_use]
    pub fn parse_record(record: &str) -> Self {
        let mut fields = record.split('.').skip(1);
        let owner = fields.next().and_then(Faction::from_token);
        let population = fields.next().map_or(0, parse_int_field);
        let battle = fields.next().map_or(0, parse_int_field);
        let terrain = fields.next().map_or(0, parse_int_field);
        let legacy_strength = fields.next().map_or([0; 3], |triple| {
            let mut parts = triple.split('_').map(parse_int_field);
            [(); 3].map(|()| parts.next().unwrap_or(0))
        });
        Self {
            owner,
            population,
            terrain,
            battle,
            legacy_strength,
        }
    }

    /// Returns a displayable record for this cell at `index` on a grid with side `side`.
    #[must_use]
    pub fn record(&self, index: usize, side: usize) -> CellRecord<'_> {
        CellRecord {
            cell: self,
            index,
            side,
        }
    }
}

fn parse_int_field(field: &str) -> u32 {
    field.trim().parse().unwrap_or(0)
}

/// A cell formatted as its wire record, tagged with its 1-indexed `x-y` coordinate.
#[derive(Debug, Clone, Copy)]
pub struct CellRecord<'a> {
    cell: &'a Cell,
    index: usize,
    side: usize,
}

impl fmt::Display for CellRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = self.index % self.side + 1;
        let y = self.index / self.side + 1;
        let [a, b, c] = self.cell.legacy_strength;
        write!(
            f,
            "{x}-{y}.{}.{}.{}.{}.{a}_{b}_{c}",
            self.cell.owner_token(),
            self.cell.population,
            self.cell.battle,
            self.cell.terrain,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_format() {
        let cell = Cell {
            owner: Some(Faction::Red),
            population: 42,
            terrain: 2399,
            battle: 1,
            legacy_strength: [1, 10, 1],
        };
        assert_eq!(cell.record(61, 60).to_string(), "2-2.TeamRed.42.1.2399.1_10_1");
        assert_eq!(Cell::SEED.record(0, 60).to_string(), "1-1.None.1.1.2400.1_1_1");
    }

    #[test]
    fn test_parse_record() {
        let cell = Cell::parse_record("15-15.TeamBlue.17.1.2401.10_1_1");
        assert_eq!(cell.owner, Some(Faction::Blue));
        assert_eq!(cell.population, 17);
        assert_eq!(cell.battle, 1);
        assert_eq!(cell.terrain, 2401);
        assert_eq!(cell.legacy_strength, [10, 1, 1]);
    }

    #[test]
    fn test_parse_record_unreadable_numbers_become_zero() {
        let cell = Cell::parse_record("1-1.TeamGreen.12.1.24x0.1_-1_1");
        assert_eq!(cell.owner, Some(Faction::Green));
        assert_eq!(cell.population, 12);
        assert_eq!(cell.terrain, 0);
        assert_eq!(cell.legacy_strength, [1, 0, 1]);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_population(f64::NAN), 1);
        assert_eq!(clamp_population(-40.0), 1);
        assert_eq!(clamp_population(12.2), 13);
        assert_eq!(clamp_population(f64::INFINITY), CARRYING_CAPACITY);
        assert_eq!(clamp_terrain(0.0), 1);
        assert_eq!(clamp_terrain(2549.5), 2550);
        assert_eq!(clamp_terrain(9000.0), MAX_TERRAIN);
    }

    #[test]
    fn test_parse_malformed_record_defaults() {
        assert_eq!(Cell::parse_record(""), Cell::MALFORMED);
        assert_eq!(Cell::parse_record("garbage"), Cell::MALFORMED);

        let cell = Cell::parse_record("3-1.TeamNobody.x.1");
        assert_eq!(cell.owner, None);
        assert_eq!(cell.population, 0);
        assert_eq!(cell.terrain, 0);
    }
}
