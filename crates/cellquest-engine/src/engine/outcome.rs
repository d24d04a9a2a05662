use serde::{Deserialize, Serialize};

use crate::core::{Faction, FactionMap, Grid};

/// Live-cell count per faction.
///
/// Serialized as `{"blue": n, "red": n, "yellow": n, "green": n, "purple": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionCounts(FactionMap<u64>);

impl FactionCounts {
    #[must_use]
    pub const fn new(counts: FactionMap<u64>) -> Self {
        Self(counts)
    }

    /// Counts the owned cells of `grid`.
    #[must_use]
    pub fn tally(grid: &Grid) -> Self {
        Self(grid.faction_counts())
    }

    #[must_use]
    pub fn get(&self, faction: Faction) -> u64 {
        self.0[faction]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Faction, u64)> + '_ {
        self.0.iter().map(|(f, c)| (f, *c))
    }

    /// Total number of owned cells.
    #[must_use]
    pub fn owned(&self) -> u64 {
        self.0.values().sum()
    }

    /// Factions without a single live cell.
    pub fn eliminated(&self) -> impl Iterator<Item = Faction> + '_ {
        self.iter().filter(|(_, c)| *c == 0).map(|(f, _)| f)
    }

    /// Factions holding the most cells. Ties are all returned, in [`Faction::ALL`] order.
    #[must_use]
    pub fn leaders(&self) -> Vec<Faction> {
        let best = self.0.values().copied().max().unwrap_or(0);
        self.iter()
            .filter(|(_, c)| *c == best)
            .map(|(f, _)| f)
            .collect()
    }
}

/// Whether an episode is over: some faction has no live cells left.
///
/// Several factions may be eliminated in the same round; this does not tell them
/// apart or name a winner.
#[must_use]
pub fn is_episode_finished(counts: &FactionCounts) -> bool {
    counts.eliminated().next().is_some()
}
