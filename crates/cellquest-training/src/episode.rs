//! Episode initializer: builds the next episode from the ledgers.

use cellquest_engine::{EpisodeError, Faction, FactionMap, Snapshot, new_episode};
use rand::Rng;

use crate::{config::ArenaConfig, learning::LedgerBook, mutation};

/// Sets up a new round-zero episode.
///
/// Each faction starts from its ledger head (or unit settings), optionally perturbed.
/// The global parameter vector starts from its ledger head (or the fallback vector) and
/// always goes through [`mutation::mutate_params`].
pub fn start_episode<R>(
    book: &LedgerBook,
    config: &ArenaConfig,
    rng: &mut R,
) -> Result<Snapshot, EpisodeError>
where
    R: Rng + ?Sized,
{
    let mut settings = FactionMap::from_fn(|faction| book.best_settings(faction));
    if config.mutate_faction_settings {
        for faction in Faction::ALL {
            mutation::mutate_settings(&mut settings[faction], rng);
        }
    }

    let mut params = book.best_params();
    let index = mutation::mutate_params(&mut params, rng);
    tracing::debug!(index, value = params.get(index), "mutated global parameter");

    new_episode(config.side, config.cell_size, settings, params)
}
