use serde::{Deserialize, Serialize};

use crate::core::{Faction, FactionMap, Grid};

use super::{
    episode::MAX_SIDE,
    outcome::{self, FactionCounts},
    overrides::RoundOverrides,
    params::GlobalParams,
    settings::FactionSettings,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SnapshotError {
    #[display("snapshot grid side must be positive")]
    EmptyGrid,
    #[display("snapshot grid side {side} exceeds {}", MAX_SIDE)]
    SideTooLarge { side: usize },
    #[display(
        "snapshot grid side {side} needs {expected} cells, found totalCells {total_cells} and {records} records"
    )]
    SideMismatch {
        side: usize,
        expected: usize,
        total_cells: usize,
        records: usize,
    },
}

/// Authoritative board state between rounds.
///
/// Holds the grid, the settings of every faction, the global parameter vector and the
/// episode progress. The JSON form uses the state-file layout (`oneSide`, `cellSize`,
/// `reloadCount`, `totalCells`, `teamCounts`, `blueSettings` .. `purpleSettings`,
/// `waiSettings`, `Finished`, `coordString`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRepr", into = "SnapshotRepr")]
pub struct Snapshot {
    pub(crate) grid: Grid,
    pub(crate) cell_size: u32,
    pub(crate) round_count: u64,
    pub(crate) counts: FactionCounts,
    pub(crate) settings: FactionMap<FactionSettings>,
    pub(crate) params: GlobalParams,
    pub(crate) finished: bool,
}

impl Snapshot {
    /// Wraps a grid at round zero. Counts and the finished flag are derived from the grid.
    #[must_use]
    pub fn from_parts(
        grid: Grid,
        cell_size: u32,
        settings: FactionMap<FactionSettings>,
        params: GlobalParams,
    ) -> Self {
        let counts = FactionCounts::tally(&grid);
        Self {
            grid,
            cell_size,
            round_count: 0,
            finished: outcome::is_episode_finished(&counts),
            counts,
            settings,
            params,
        }
    }

    #[must_use]
    pub fn with_round_count(mut self, round_count: u64) -> Self {
        self.round_count = round_count;
        self
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[must_use]
    pub fn round_count(&self) -> u64 {
        self.round_count
    }

    #[must_use]
    pub fn counts(&self) -> &FactionCounts {
        &self.counts
    }

    #[must_use]
    pub fn settings(&self) -> &FactionMap<FactionSettings> {
        &self.settings
    }

    #[must_use]
    pub fn faction_settings(&self, faction: Faction) -> FactionSettings {
        self.settings[faction]
    }

    #[must_use]
    pub fn params(&self) -> &GlobalParams {
        &self.params
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.grid.len()
    }

    /// Replaces stored settings and parameters with the ones present in `overrides`.
    pub fn apply_overrides(&mut self, overrides: &RoundOverrides) {
        for (faction, settings) in overrides.settings.iter() {
            if let Some(settings) = settings {
                self.settings[faction] = *settings;
            }
        }
        if let Some(params) = &overrides.params {
            self.params = params.clone();
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRepr {
    one_side: usize,
    cell_size: u32,
    reload_count: u64,
    total_cells: usize,
    team_counts: FactionCounts,
    blue_settings: FactionSettings,
    red_settings: FactionSettings,
    yellow_settings: FactionSettings,
    green_settings: FactionSettings,
    purple_settings: FactionSettings,
    wai_settings: GlobalParams,
    #[serde(rename = "Finished")]
    finished: bool,
    coord_string: String,
}

impl TryFrom<SnapshotRepr> for Snapshot {
    type Error = SnapshotError;

    fn try_from(repr: SnapshotRepr) -> Result<Self, Self::Error> {
        let side = repr.one_side;
        if side == 0 {
            return Err(SnapshotError::EmptyGrid);
        }
        let expected = side
            .checked_mul(side)
            .filter(|_| side <= MAX_SIDE)
            .ok_or(SnapshotError::SideTooLarge { side })?;
        let records = repr.coord_string.split(',').count();
        if repr.total_cells != expected || records != expected {
            return Err(SnapshotError::SideMismatch {
                side,
                expected,
                total_cells: repr.total_cells,
                records,
            });
        }
        Ok(Self {
            grid: Grid::parse_records(repr.one_side, &repr.coord_string),
            cell_size: repr.cell_size,
            round_count: repr.reload_count,
            counts: repr.team_counts,
            settings: FactionMap::new([
                repr.blue_settings,
                repr.red_settings,
                repr.yellow_settings,
                repr.green_settings,
                repr.purple_settings,
            ]),
            params: repr.wai_settings,
            finished: repr.finished,
        })
    }
}

impl From<Snapshot> for SnapshotRepr {
    fn from(snapshot: Snapshot) -> Self {
        let settings = snapshot.settings;
        Self {
            one_side: snapshot.grid.side(),
            cell_size: snapshot.cell_size,
            reload_count: snapshot.round_count,
            total_cells: snapshot.grid.len(),
            team_counts: snapshot.counts,
            blue_settings: settings[Faction::Blue],
            red_settings: settings[Faction::Red],
            yellow_settings: settings[Faction::Yellow],
            green_settings: settings[Faction::Green],
            purple_settings: settings[Faction::Purple],
            wai_settings: snapshot.params,
            finished: snapshot.finished,
            coord_string: snapshot.grid.to_records(),
        }
    }
}
