//! Learning step run when an episode finishes.

use cellquest_engine::{Faction, FactionMap, FactionSettings, GlobalParams, Snapshot};
use serde::Serialize;

use crate::ledger::{FactionRecord, Ledger, ParamsRecord};

/// Which factions' results are offered to their ledgers when an episode ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactionLearning {
    /// Only the first faction in [`Faction::ALL`] order (Blue) is evaluated.
    #[default]
    FirstOnly,
    /// Every faction is evaluated.
    AllFactions,
}

impl FactionLearning {
    fn factions(self) -> &'static [Faction] {
        match self {
            FactionLearning::FirstOnly => &Faction::ALL[..1],
            FactionLearning::AllFactions => &Faction::ALL,
        }
    }
}

/// The parameter ledger and one ledger per faction.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerBook {
    pub params: Ledger<ParamsRecord>,
    pub factions: FactionMap<Ledger<FactionRecord>>,
}

impl LedgerBook {
    /// Empty ledgers holding at most `capacity` records each.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            params: Ledger::new(capacity),
            factions: FactionMap::from_fn(|_| Ledger::new(capacity)),
        }
    }

    /// Best known settings of `faction`, or [`FactionSettings::UNIT`] without history.
    #[must_use]
    pub fn best_settings(&self, faction: Faction) -> FactionSettings {
        self.factions[faction]
            .head()
            .map_or(FactionSettings::UNIT, |record| record.settings)
    }

    /// Best known parameter vector, or [`GlobalParams::fallback`] without history.
    #[must_use]
    pub fn best_params(&self) -> GlobalParams {
        self.params
            .head()
            .map_or_else(GlobalParams::fallback, |record| record.0.clone())
    }
}

/// What the learning step changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningReport {
    pub episode_length: u64,
    /// Whether the parameter vector became the new ledger head.
    pub params_promoted: bool,
    /// Factions whose result became their ledger head.
    pub promoted_factions: Vec<Faction>,
}

/// Offers the results of a finished episode to the ledgers.
///
/// The parameter vector, with index 0 set to the episode length, becomes the head of
/// the parameter ledger when it lasted strictly longer than the current head. Each
/// evaluated faction's `(count, settings)` becomes the head of its ledger when the
/// count strictly beats the current head.
pub fn learn_from_episode(
    snapshot: &Snapshot,
    book: &mut LedgerBook,
    policy: FactionLearning,
) -> LearningReport {
    let episode_length = snapshot.round_count();

    let mut params = snapshot.params().clone();
    params.set_episode_length(episode_length);
    let params_promoted = book.params.offer(ParamsRecord(params));
    if params_promoted {
        tracing::info!(episode_length, "parameter vector promoted");
    }

    let mut promoted_factions = vec![];
    for &faction in policy.factions() {
        let record = FactionRecord {
            count: snapshot.counts().get(faction),
            settings: snapshot.faction_settings(faction),
        };
        if book.factions[faction].offer(record) {
            tracing::info!(%faction, count = record.count, "faction settings promoted");
            promoted_factions.push(faction);
        }
    }

    LearningReport {
        episode_length,
        params_promoted,
        promoted_factions,
    }
}

#[cfg(test)]
mod tests {
    use cellquest_engine::Grid;

    use super::*;

    fn finished_snapshot(round_count: u64) -> Snapshot {
        let mut grid = Grid::new(4);
        grid.at_mut(0, 0).owner = Some(Faction::Blue);
        grid.at_mut(0, 1).owner = Some(Faction::Blue);
        grid.at_mut(2, 2).owner = Some(Faction::Green);
        let settings = FactionMap::from_fn(|f| {
            let v = f64::from(u8::try_from(f.index()).unwrap() + 1);
            FactionSettings::new(v, v, v)
        });
        Snapshot::from_parts(grid, 10, settings, GlobalParams::fallback())
            .with_round_count(round_count)
    }

    #[test]
    fn test_first_episode_fills_empty_ledgers() {
        let mut book = LedgerBook::new(16);
        let report =
            learn_from_episode(&finished_snapshot(40), &mut book, FactionLearning::FirstOnly);
        assert_eq!(report.episode_length, 40);
        assert!(report.params_promoted);
        assert_eq!(report.promoted_factions, [Faction::Blue]);

        assert_eq!(book.best_params().episode_length(), 40.0);
        let blue = book.factions[Faction::Blue].head().unwrap();
        assert_eq!(blue.count, 2);
        assert_eq!(blue.settings, FactionSettings::new(1.0, 1.0, 1.0));
        assert!(book.factions[Faction::Green].is_empty());
    }

    #[test]
    fn test_shorter_episode_does_not_replace_head() {
        let mut book = LedgerBook::new(16);
        learn_from_episode(&finished_snapshot(40), &mut book, FactionLearning::FirstOnly);
        let report =
            learn_from_episode(&finished_snapshot(40), &mut book, FactionLearning::FirstOnly);
        assert!(!report.params_promoted);
        assert!(report.promoted_factions.is_empty());
        assert_eq!(book.params.len(), 1);

        let report =
            learn_from_episode(&finished_snapshot(41), &mut book, FactionLearning::FirstOnly);
        assert!(report.params_promoted);
        assert_eq!(book.params.len(), 2);
    }

    #[test]
    fn test_all_factions_policy() {
        let mut book = LedgerBook::new(16);
        let report =
            learn_from_episode(&finished_snapshot(9), &mut book, FactionLearning::AllFactions);
        assert_eq!(report.promoted_factions, Faction::ALL);
        // a zero count still fills an empty ledger
        assert_eq!(book.factions[Faction::Red].head().unwrap().count, 0);
        assert_eq!(
            book.best_settings(Faction::Green),
            FactionSettings::new(4.0, 4.0, 4.0)
        );
    }

    #[test]
    fn test_defaults_without_history() {
        let book = LedgerBook::new(4);
        assert_eq!(book.best_settings(Faction::Purple), FactionSettings::UNIT);
        assert_eq!(book.best_params(), GlobalParams::fallback());
    }
}
