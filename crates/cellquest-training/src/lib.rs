//! Adaptive learning and the episode lifecycle around the round engine.
//!
//! The engine crate only knows how to advance a board. This crate decides which settings
//! and parameters an episode starts with, remembers which of them did well, and owns the
//! persisted state between calls.
//!
//! # How Learning Works
//!
//! 1. **Setup** - A new episode takes each faction's best known settings and the best
//!    known global parameter vector, with one parameter coefficient randomly scaled
//! 2. **Play** - Rounds run until some faction is eliminated
//! 3. **Record** - The parameter vector is tagged with the episode length and offered to
//!    its ledger; faction results are offered to theirs
//! 4. **Repeat** - The next setup starts from whatever now heads the ledgers
//!
//! A ledger head is only replaced by a strictly better record, so the search climbs
//! greedily: longer episodes for the parameter vector, more surviving cells for a
//! faction.
//!
//! # Architecture
//!
//! ```text
//! Arena (get / reset / round / play_episode)
//!     ↓ reset
//! Episode initializer ← LedgerBook ← LedgerStore
//!     ↓ snapshot
//! cellquest_engine::play_round
//!     ↓ finished
//! Learning step → LedgerBook → LedgerStore
//! ```
//!
//! See [`arena::Arena`] for the entry point.
//!
//! # Current Limitations
//!
//! - **Greedy hill climbing**: only one coefficient changes per episode and a single lucky
//!   episode can hold the head indefinitely
//! - **Single writer**: an arena assumes it is the only process touching its store

pub mod arena;
pub mod config;
pub mod episode;
pub mod learning;
pub mod ledger;
pub mod mutation;
pub mod store;
