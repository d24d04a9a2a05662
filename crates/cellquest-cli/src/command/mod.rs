use std::{io, path::PathBuf};

use cellquest_engine::DEFAULT_SIDE;
use cellquest_training::{
    arena::{Arena, ArenaError},
    config::ArenaConfig,
    learning::FactionLearning,
    ledger::{Ledger, ParamsRecord},
    store::FileStore,
};
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use tracing_subscriber::EnvFilter;

use self::{
    ledger::LedgerArg,
    play::PlayArg,
    round::{ActArg, RoundArg},
};
use crate::util::{Layout, Output};

mod ledger;
mod play;
mod round;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    arena: ArenaArg,
    /// Operation to run
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, clap::Args)]
struct ArenaArg {
    /// Directory holding the state file, the ledgers and the win log
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,
    /// Seed for combat dice and episode mutation
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Grid side of new episodes
    #[arg(long, global = true, default_value_t = DEFAULT_SIDE)]
    side: usize,
    /// Maximum records kept per ledger
    #[arg(long, global = true, default_value_t = Ledger::<ParamsRecord>::DEFAULT_CAPACITY)]
    ledger_capacity: usize,
    /// Offer every faction's result to its ledger, not only the first faction's
    #[arg(long, global = true)]
    learn_all_factions: bool,
    /// Perturb faction settings loaded from the ledgers when a new episode starts
    #[arg(long, global = true)]
    mutate_faction_settings: bool,
}

impl ArenaArg {
    fn config(&self) -> ArenaConfig {
        ArenaConfig {
            side: self.side,
            ledger_capacity: self.ledger_capacity,
            faction_learning: if self.learn_all_factions {
                FactionLearning::AllFactions
            } else {
                FactionLearning::FirstOnly
            },
            mutate_faction_settings: self.mutate_faction_settings,
            ..ArenaConfig::default()
        }
    }

    fn open(&self) -> Arena<FileStore, Pcg32> {
        let rng = match self.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Arena::new(FileStore::new(&self.data_dir), self.config(), rng)
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print the stored snapshot
    Get,
    /// Start a new episode from the ledgers
    Reset,
    /// Play one round on the stored snapshot
    Round(#[clap(flatten)] RoundArg),
    /// Run an operation by name (`get`, `reset` or `round`)
    Act(#[clap(flatten)] ActArg),
    /// Play whole episodes until a faction is eliminated
    Play(#[clap(flatten)] PlayArg),
    /// Show the ledgers
    Ledger(#[clap(flatten)] LedgerArg),
}

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let CommandArgs { arena, mode } = CommandArgs::parse();
    let mut arena = arena.open();
    match mode {
        Mode::Get => {
            let snapshot = client_result(arena.get())?;
            Output::save_json(&snapshot, None)?;
        }
        Mode::Reset => {
            let snapshot = client_result(arena.reset())?;
            Output::save_json(&snapshot, None)?;
        }
        Mode::Round(arg) => round::run_round(&mut arena, &arg)?,
        Mode::Act(arg) => round::run_act(&mut arena, &arg)?,
        Mode::Play(arg) => play::run(&mut arena, &arg)?,
        Mode::Ledger(arg) => ledger::run(&arena, &arg)?,
    }
    Ok(())
}

/// Prints the client-facing payload of operation errors before failing.
fn client_result<T>(result: Result<T, ArenaError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            if matches!(
                err,
                ArenaError::MissingSnapshot | ArenaError::UnsupportedOperation { .. }
            ) {
                Output::stdout().write_json(&err.payload(), Layout::Compact)?;
            }
            Err(err.into())
        }
    }
}
