//! Fresh-episode board construction.

use crate::core::{Cell, Faction, FactionMap, Grid};

use super::{params::GlobalParams, settings::FactionSettings, snapshot::Snapshot};

/// Smallest grid side on which the five seed positions are distinct.
pub const MIN_SIDE: usize = 4;

/// Largest grid side accepted for new episodes and stored snapshots.
pub const MAX_SIDE: usize = 1024;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EpisodeError {
    #[display("grid side {side} is too small, at least {} is required", MIN_SIDE)]
    GridTooSmall { side: usize },
    #[display("grid side {side} is too large, at most {} is allowed", MAX_SIDE)]
    GridTooLarge { side: usize },
}

/// 1-indexed `(x, y)` seed position of `faction` on a `side`×`side` grid.
///
/// `x` is the column and `y` the row; fractions of the side are rounded up.
#[must_use]
pub fn seed_position(faction: Faction, side: usize) -> (usize, usize) {
    let quarter = side.div_ceil(4);
    let three_quarters = (3 * side).div_ceil(4);
    let half = side.div_ceil(2);
    match faction {
        Faction::Blue => (quarter, quarter),
        Faction::Red => (three_quarters, three_quarters),
        Faction::Yellow => (quarter, three_quarters),
        Faction::Green => (three_quarters, quarter),
        Faction::Purple => (half, half),
    }
}

/// Lays down a `side`×`side` grid of seed cells with one cell per faction.
pub fn seed_grid(side: usize) -> Result<Grid, EpisodeError> {
    if side < MIN_SIDE {
        return Err(EpisodeError::GridTooSmall { side });
    }
    if side > MAX_SIDE {
        return Err(EpisodeError::GridTooLarge { side });
    }
    let mut grid = Grid::new(side);
    for faction in Faction::ALL {
        let (x, y) = seed_position(faction, side);
        *grid.at_mut(y - 1, x - 1) = Cell {
            owner: Some(faction),
            legacy_strength: faction.seed_strength(),
            ..Cell::SEED
        };
    }
    Ok(grid)
}

/// Builds the round-zero snapshot of a new episode.
///
/// # Example
///
/// ```
/// use cellquest_engine::{FactionMap, FactionSettings, GlobalParams, new_episode};
///
/// let settings = FactionMap::from_fn(|_| FactionSettings::UNIT);
/// let snapshot = new_episode(60, 10, settings, GlobalParams::fallback()).unwrap();
/// assert_eq!(snapshot.round_count(), 0);
/// assert_eq!(snapshot.counts().owned(), 5);
/// assert!(!snapshot.is_finished());
/// ```
pub fn new_episode(
    side: usize,
    cell_size: u32,
    settings: FactionMap<FactionSettings>,
    params: GlobalParams,
) -> Result<Snapshot, EpisodeError> {
    let grid = seed_grid(side)?;
    Ok(Snapshot::from_parts(grid, cell_size, settings, params))
}
