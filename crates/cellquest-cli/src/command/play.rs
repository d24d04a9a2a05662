use std::path::PathBuf;

use cellquest_engine::{Faction, FactionCounts};
use cellquest_training::{arena::Arena, store::FileStore};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::{self, Output};

use super::client_result;

const DEFAULT_MAX_ROUNDS: u64 = 10_000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Number of episodes to play
    #[arg(long, default_value_t = 1)]
    episodes: usize,
    /// Round limit per episode
    #[arg(long, default_value_t = DEFAULT_MAX_ROUNDS)]
    max_rounds: u64,
    /// Output file path for the episode summaries
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EpisodeSummary {
    episode: usize,
    rounds: u64,
    finished: bool,
    counts: FactionCounts,
    leaders: Vec<Faction>,
    params_promoted: bool,
    promoted_factions: Vec<Faction>,
}

pub(crate) fn run(arena: &mut Arena<FileStore, Pcg32>, arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        episodes,
        max_rounds,
        output,
    } = arg;

    let mut summaries = vec![];
    for episode in 0..*episodes {
        let result = client_result(arena.play_episode(*max_rounds))?;
        let snapshot = &result.snapshot;
        if snapshot.is_finished() {
            util::append_win_log(&arena.store().win_log_path(), snapshot.counts())?;
        }

        let summary = EpisodeSummary {
            episode,
            rounds: snapshot.round_count(),
            finished: snapshot.is_finished(),
            counts: *snapshot.counts(),
            leaders: snapshot.counts().leaders(),
            params_promoted: result.learning.as_ref().is_some_and(|r| r.params_promoted),
            promoted_factions: result
                .learning
                .map(|r| r.promoted_factions)
                .unwrap_or_default(),
        };
        eprintln!(
            "Episode #{episode}: {} rounds, finished: {}, leaders: {:?}",
            summary.rounds, summary.finished, summary.leaders
        );
        summaries.push(summary);
    }

    Output::save_json(&summaries, output.as_deref())?;
    if let Some(path) = output {
        eprintln!("Summaries saved to {}", path.display());
    }
    Ok(())
}
