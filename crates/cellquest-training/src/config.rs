use cellquest_engine::DEFAULT_SIDE;

use crate::{learning::FactionLearning, ledger::Ledger, ledger::ParamsRecord};

/// Settings of an [`Arena`](crate::arena::Arena).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Grid side of new episodes.
    pub side: usize,
    /// Pixel size of a cell, carried in the snapshot for renderers.
    pub cell_size: u32,
    /// Maximum records kept per ledger.
    pub ledger_capacity: usize,
    pub faction_learning: FactionLearning,
    /// Perturb each faction's loaded settings when setting up an episode.
    pub mutate_faction_settings: bool,
}

impl ArenaConfig {
    pub const DEFAULT_CELL_SIZE: u32 = 10;
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_SIDE,
            cell_size: Self::DEFAULT_CELL_SIZE,
            ledger_capacity: Ledger::<ParamsRecord>::DEFAULT_CAPACITY,
            faction_learning: FactionLearning::default(),
            mutate_faction_settings: false,
        }
    }
}
