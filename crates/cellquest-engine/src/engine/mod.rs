//! Round simulation and episode state.
//!
//! This module drives the grid defined in [`crate::core`] through an episode:
//!
//! - [`new_episode`] - Lays down a fresh board with one seed cell per faction
//! - [`Snapshot`] - Board state between rounds, including settings and parameters
//! - [`play_round`] - One synchronous round transition
//! - [`FactionCounts`] / [`is_episode_finished`] - Win detection
//! - [`CombatDice`] - Source of combat randomness
//!
//! The per-cell sub-steps live in [`growth`], [`combat`] and [`migration`].
//!
//! # Episode Flow
//!
//! 1. Build a round-zero [`Snapshot`] with [`new_episode`]
//! 2. Call [`play_round`] repeatedly, optionally passing [`RoundOverrides`]
//! 3. Stop once [`Snapshot::is_finished`] reports an eliminated faction
//!
//! The first round only advances the counter; cells start changing from the second.
//!
//! # Example
//!
//! ```
//! use cellquest_engine::{
//!     FactionMap, FactionSettings, GlobalParams, RngDice, RoundOverrides, new_episode, play_round,
//! };
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let settings = FactionMap::from_fn(|_| FactionSettings::UNIT);
//! let mut snapshot = new_episode(16, 10, settings, GlobalParams::fallback()).unwrap();
//! let mut dice = RngDice(StdRng::seed_from_u64(1));
//!
//! while !snapshot.is_finished() && snapshot.round_count() < 500 {
//!     snapshot = play_round(&snapshot, &RoundOverrides::none(), &mut dice);
//! }
//! println!("leaders: {:?}", snapshot.counts().leaders());
//! ```

pub use self::{
    dice::*, episode::*, outcome::*, overrides::*, params::*, round::*, settings::*, snapshot::*,
};

pub mod combat;
pub mod growth;
pub mod migration;

mod dice;
mod episode;
mod outcome;
mod overrides;
mod params;
mod round;
mod settings;
mod snapshot;
