//! The operation service: `get`, `reset`, `round` and whole-episode play over a store.

use std::str::FromStr;

use cellquest_engine::{EpisodeError, RngDice, RoundOverrides, Snapshot, play_round};
use rand::Rng;

use crate::{
    config::ArenaConfig,
    episode,
    learning::{self, LearningReport, LedgerBook},
    store::{LedgerId, LedgerStore, SnapshotStore, StoreError},
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ArenaError {
    #[display("No state found")]
    MissingSnapshot,
    #[display("Invalid action")]
    UnsupportedOperation { action: String },
    #[display("{_0}")]
    #[from]
    Store(StoreError),
    #[display("{_0}")]
    #[from]
    Episode(EpisodeError),
}

impl ArenaError {
    /// The error as reported to clients: `{"error": "<message>"}`.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Operation names accepted by [`Arena::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    Reset,
    Round,
}

impl FromStr for Action {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Action::Get),
            "reset" => Ok(Action::Reset),
            "round" => Ok(Action::Round),
            _ => Err(ArenaError::UnsupportedOperation {
                action: s.to_owned(),
            }),
        }
    }
}

/// Result of one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub snapshot: Snapshot,
    /// Present when the round finished the episode.
    pub learning: Option<LearningReport>,
}

/// Single writer over a snapshot store and its ledgers.
///
/// Every mutating operation takes `&mut self`, so one arena is the only writer of its
/// store. Combat dice and episode mutation both draw from the arena's RNG.
///
/// # Example
///
/// ```
/// use cellquest_engine::RoundOverrides;
/// use cellquest_training::{arena::Arena, config::ArenaConfig, store::MemoryStore};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let config = ArenaConfig { side: 12, ..ArenaConfig::default() };
/// let mut arena = Arena::new(MemoryStore::new(), config, StdRng::seed_from_u64(0));
///
/// arena.reset().unwrap();
/// let result = arena.round(&RoundOverrides::none()).unwrap();
/// assert_eq!(result.snapshot.round_count(), 1);
/// assert_eq!(arena.get().unwrap(), result.snapshot);
/// ```
#[derive(Debug)]
pub struct Arena<S, R> {
    store: S,
    config: ArenaConfig,
    rng: R,
}

impl<S, R> Arena<S, R>
where
    S: SnapshotStore + LedgerStore,
    R: Rng,
{
    pub fn new(store: S, config: ArenaConfig, rng: R) -> Self {
        Self { store, config, rng }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Loads every ledger.
    pub fn ledger_book(&self) -> Result<LedgerBook, ArenaError> {
        Ok(LedgerBook::load(&self.store, self.config.ledger_capacity)?)
    }

    /// Returns the stored snapshot.
    pub fn get(&self) -> Result<Snapshot, ArenaError> {
        self.store
            .load_snapshot()?
            .ok_or(ArenaError::MissingSnapshot)
    }

    /// Starts a new episode from the ledgers and stores it.
    pub fn reset(&mut self) -> Result<Snapshot, ArenaError> {
        let book = self.ledger_book()?;
        let snapshot = episode::start_episode(&book, &self.config, &mut self.rng)?;
        self.store.save_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Plays one round on the stored snapshot and stores the result.
    ///
    /// When the round finishes the episode, its results are offered to the ledgers.
    pub fn round(&mut self, overrides: &RoundOverrides) -> Result<RoundResult, ArenaError> {
        let current = self.get()?;
        let snapshot = play_round(&current, overrides, &mut RngDice(&mut self.rng));
        self.store.save_snapshot(&snapshot)?;

        let learning = if snapshot.is_finished() {
            Some(self.learn(&snapshot)?)
        } else {
            None
        };
        Ok(RoundResult { snapshot, learning })
    }

    fn learn(&mut self, snapshot: &Snapshot) -> Result<LearningReport, ArenaError> {
        let mut book = self.ledger_book()?;
        let report =
            learning::learn_from_episode(snapshot, &mut book, self.config.faction_learning);
        if report.params_promoted {
            book.save(&mut self.store, LedgerId::Params)?;
        }
        for &faction in &report.promoted_factions {
            book.save(&mut self.store, LedgerId::Faction(faction))?;
        }
        tracing::info!(
            rounds = report.episode_length,
            counts = ?snapshot.counts(),
            "episode finished"
        );
        Ok(report)
    }

    /// Runs the operation named `action`.
    ///
    /// `overrides` are only used by `round`.
    pub fn dispatch(
        &mut self,
        action: &str,
        overrides: &RoundOverrides,
    ) -> Result<Snapshot, ArenaError> {
        match action.parse::<Action>()? {
            Action::Get => self.get(),
            Action::Reset => self.reset(),
            Action::Round => Ok(self.round(overrides)?.snapshot),
        }
    }

    /// Resets and plays rounds until the episode finishes or `max_rounds` rounds ran.
    ///
    /// The returned result carries a learning report only if the episode finished.
    pub fn play_episode(&mut self, max_rounds: u64) -> Result<RoundResult, ArenaError> {
        let mut result = RoundResult {
            snapshot: self.reset()?,
            learning: None,
        };
        while !result.snapshot.is_finished() && result.snapshot.round_count() < max_rounds {
            result = self.round(&RoundOverrides::none())?;
        }
        if !result.snapshot.is_finished() {
            tracing::info!(max_rounds, "episode stopped before a faction was eliminated");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use cellquest_engine::{Faction, FactionSettings, GlobalParams};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use crate::{learning::FactionLearning, store::MemoryStore};

    use super::*;

    fn arena(config: ArenaConfig) -> Arena<MemoryStore, Pcg32> {
        Arena::new(MemoryStore::new(), config, Pcg32::seed_from_u64(17))
    }

    fn small() -> ArenaConfig {
        ArenaConfig {
            side: 8,
            ..ArenaConfig::default()
        }
    }

    #[test]
    fn test_get_without_state() {
        let arena = arena(small());
        let err = arena.get().unwrap_err();
        assert!(matches!(err, ArenaError::MissingSnapshot));
        assert_eq!(err.payload().to_string(), r#"{"error":"No state found"}"#);
    }

    #[test]
    fn test_round_without_state() {
        let mut arena = arena(small());
        assert!(matches!(
            arena.round(&RoundOverrides::none()),
            Err(ArenaError::MissingSnapshot)
        ));
    }

    #[test]
    fn test_unknown_action() {
        let mut arena = arena(small());
        let err = arena
            .dispatch("explode", &RoundOverrides::none())
            .unwrap_err();
        assert!(matches!(err, ArenaError::UnsupportedOperation { .. }));
        assert_eq!(err.payload().to_string(), r#"{"error":"Invalid action"}"#);
    }

    #[test]
    fn test_dispatch_round_trip() {
        let mut arena = arena(small());
        let reset = arena.dispatch("reset", &RoundOverrides::none()).unwrap();
        assert_eq!(arena.dispatch("get", &RoundOverrides::none()).unwrap(), reset);

        let overrides =
            RoundOverrides::none().with_settings(Faction::Red, FactionSettings::new(1.0, 10.0, 1.0));
        let next = arena.dispatch("round", &overrides).unwrap();
        assert_eq!(next.round_count(), 1);
        assert_eq!(
            next.faction_settings(Faction::Red),
            FactionSettings::new(1.0, 10.0, 1.0)
        );
        assert_eq!(arena.get().unwrap(), next);
    }

    #[test]
    fn test_play_episode_updates_ledgers() {
        let mut arena = arena(small());
        let result = arena.play_episode(5_000).unwrap();
        assert!(result.snapshot.is_finished());
        let report = result.learning.unwrap();
        assert_eq!(report.episode_length, result.snapshot.round_count());
        assert!(report.params_promoted);

        let book = arena.ledger_book().unwrap();
        let head = book.params.head().unwrap();
        #[expect(clippy::cast_precision_loss)]
        let length = result.snapshot.round_count() as f64;
        assert_eq!(head.0.episode_length(), length);
        // blue's count fills its empty ledger, others are not evaluated
        assert_eq!(book.factions[Faction::Blue].len(), 1);
        assert!(book.factions[Faction::Red].is_empty());
    }

    #[test]
    fn test_play_episode_respects_round_cap() {
        let mut arena = arena(small());
        let result = arena.play_episode(1).unwrap();
        assert_eq!(result.snapshot.round_count(), 1);
        assert!(!result.snapshot.is_finished());
        assert!(result.learning.is_none());
        assert!(arena.ledger_book().unwrap().params.is_empty());
    }

    #[test]
    fn test_next_episode_starts_from_ledger_head() {
        let config = ArenaConfig {
            faction_learning: FactionLearning::AllFactions,
            ..small()
        };
        let mut arena = arena(config);
        arena.play_episode(5_000).unwrap();
        let book = arena.ledger_book().unwrap();
        let best = book.best_params();

        let next = arena.reset().unwrap();
        assert_eq!(next.params().episode_length(), best.episode_length());
        let differing = best
            .as_slice()
            .iter()
            .zip(next.params().as_slice())
            .filter(|(a, b)| a != b)
            .count();
        assert!(differing <= 1);
        for faction in Faction::ALL {
            assert_eq!(next.faction_settings(faction), book.best_settings(faction));
        }
        assert_ne!(best, GlobalParams::fallback());
    }
}
