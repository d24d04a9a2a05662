use std::path::{Path, PathBuf};

use cellquest_engine::{RoundOverrides, Snapshot};
use cellquest_training::{arena::Arena, store::FileStore};
use rand_pcg::Pcg32;

use crate::util::{self, Output};

use super::client_result;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RoundArg {
    /// JSON file with settings overrides (`-` reads stdin)
    #[arg(long)]
    overrides: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ActArg {
    /// Operation name
    action: String,
    /// JSON file with settings overrides for `round` (`-` reads stdin)
    #[arg(long)]
    overrides: Option<PathBuf>,
}

fn load_overrides(path: Option<&Path>) -> anyhow::Result<RoundOverrides> {
    path.map_or_else(|| Ok(RoundOverrides::none()), util::read_overrides)
}

fn log_if_finished(store: &FileStore, snapshot: &Snapshot) -> anyhow::Result<()> {
    if snapshot.is_finished() {
        util::append_win_log(&store.win_log_path(), snapshot.counts())?;
    }
    Ok(())
}

pub(crate) fn run_round(arena: &mut Arena<FileStore, Pcg32>, arg: &RoundArg) -> anyhow::Result<()> {
    let overrides = load_overrides(arg.overrides.as_deref())?;
    let result = client_result(arena.round(&overrides))?;
    log_if_finished(arena.store(), &result.snapshot)?;
    if let Some(report) = &result.learning {
        eprintln!(
            "Episode finished after {} rounds (parameters promoted: {}, factions promoted: {:?})",
            report.episode_length, report.params_promoted, report.promoted_factions
        );
    }
    Output::save_json(&result.snapshot, None)
}

pub(crate) fn run_act(arena: &mut Arena<FileStore, Pcg32>, arg: &ActArg) -> anyhow::Result<()> {
    let overrides = load_overrides(arg.overrides.as_deref())?;
    let snapshot = client_result(arena.dispatch(&arg.action, &overrides))?;
    if arg.action == "round" {
        log_if_finished(arena.store(), &snapshot)?;
    }
    Output::save_json(&snapshot, None)
}
