//! Persistence of the snapshot and the ledgers.
//!
//! The arena only talks to the [`SnapshotStore`] and [`LedgerStore`] traits.
//! [`FileStore`] keeps the on-disk layout of a data directory:
//!
//! | file | contents |
//! |---|---|
//! | `CellQuestState.json` | current snapshot |
//! | `WAIlog.txt` | parameter ledger |
//! | `blueLog.txt` .. `purpleLog.txt` | faction ledgers |
//! | `CellQuestWins.log` | finished-episode log, appended by the binary |
//!
//! [`MemoryStore`] keeps the same data in memory for tests and embedding.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use cellquest_engine::{Faction, FactionMap, Snapshot};

use crate::{
    learning::LedgerBook,
    ledger::{Ledger, LedgerRecord},
};

pub const STATE_FILE: &str = "CellQuestState.json";
pub const WIN_LOG_FILE: &str = "CellQuestWins.log";

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to decode snapshot from {origin}")]
    Decode {
        origin: String,
        source: serde_json::Error,
    },
    #[display("failed to encode snapshot")]
    Encode { source: serde_json::Error },
}

/// Identifies one ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerId {
    Params,
    Faction(Faction),
}

impl LedgerId {
    pub fn all() -> impl Iterator<Item = LedgerId> {
        std::iter::once(LedgerId::Params).chain(Faction::ALL.map(LedgerId::Faction))
    }

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            LedgerId::Params => "WAIlog.txt",
            LedgerId::Faction(Faction::Blue) => "blueLog.txt",
            LedgerId::Faction(Faction::Red) => "redLog.txt",
            LedgerId::Faction(Faction::Yellow) => "yellowLog.txt",
            LedgerId::Faction(Faction::Green) => "greenLog.txt",
            LedgerId::Faction(Faction::Purple) => "purpleLog.txt",
        }
    }
}

pub trait SnapshotStore {
    /// Loads the current snapshot, or `None` when none has been saved yet.
    fn load_snapshot(&self) -> Result<Option<Snapshot>, StoreError>;

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

pub trait LedgerStore {
    /// Loads the raw text of a ledger, or `None` when it does not exist.
    fn load_ledger(&self, id: LedgerId) -> Result<Option<String>, StoreError>;

    fn save_ledger(&mut self, id: LedgerId, text: &str) -> Result<(), StoreError>;
}

fn decode_snapshot(text: &str, origin: &str) -> Result<Snapshot, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Decode {
        origin: origin.to_owned(),
        source,
    })
}

impl LedgerBook {
    /// Loads every ledger from `store`. Missing ledgers start empty.
    pub fn load<S>(store: &S, capacity: usize) -> Result<Self, StoreError>
    where
        S: LedgerStore + ?Sized,
    {
        fn load_one<S, R>(store: &S, id: LedgerId, capacity: usize) -> Result<Ledger<R>, StoreError>
        where
            S: LedgerStore + ?Sized,
            R: LedgerRecord,
        {
            Ok(store
                .load_ledger(id)?
                .map_or_else(|| Ledger::new(capacity), |text| Ledger::parse(&text, capacity)))
        }

        let params = load_one(store, LedgerId::Params, capacity)?;
        let mut factions = FactionMap::from_fn(|_| Ledger::new(capacity));
        for faction in Faction::ALL {
            factions[faction] = load_one(store, LedgerId::Faction(faction), capacity)?;
        }
        Ok(Self { params, factions })
    }

    /// Writes one ledger back to `store`.
    pub fn save<S>(&self, store: &mut S, id: LedgerId) -> Result<(), StoreError>
    where
        S: LedgerStore + ?Sized,
    {
        let text = match id {
            LedgerId::Params => self.params.to_text(),
            LedgerId::Faction(faction) => self.factions[faction].to_text(),
        };
        store.save_ledger(id, &text)
    }
}

/// Store backed by a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    #[must_use]
    pub fn ledger_path(&self, id: LedgerId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    #[must_use]
    pub fn win_log_path(&self) -> PathBuf {
        self.dir.join(WIN_LOG_FILE)
    }

    fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(path, contents).map_err(|source| StoreError::Io {
            path: path.to_owned(),
            source,
        })
    }
}

impl SnapshotStore for FileStore {
    fn load_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        let path = self.state_path();
        Self::read_optional(&path)?
            .map(|text| decode_snapshot(&text, &path.display().to_string()))
            .transpose()
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text =
            serde_json::to_string_pretty(snapshot).map_err(|source| StoreError::Encode { source })?;
        self.write(&self.state_path(), &text)
    }
}

impl LedgerStore for FileStore {
    fn load_ledger(&self, id: LedgerId) -> Result<Option<String>, StoreError> {
        Self::read_optional(&self.ledger_path(id))
    }

    fn save_ledger(&mut self, id: LedgerId, text: &str) -> Result<(), StoreError> {
        self.write(&self.ledger_path(id), text)
    }
}

/// Store keeping everything in memory. The snapshot is held in its JSON form.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Option<String>,
    ledgers: HashMap<LedgerId, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ledger_text(&self, id: LedgerId) -> Option<&str> {
        self.ledgers.get(&id).map(String::as_str)
    }
}

impl SnapshotStore for MemoryStore {
    fn load_snapshot(&self) -> Result<Option<Snapshot>, StoreError> {
        self.snapshot
            .as_deref()
            .map(|text| decode_snapshot(text, "memory"))
            .transpose()
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let text = serde_json::to_string(snapshot).map_err(|source| StoreError::Encode { source })?;
        self.snapshot = Some(text);
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn load_ledger(&self, id: LedgerId) -> Result<Option<String>, StoreError> {
        Ok(self.ledgers.get(&id).cloned())
    }

    fn save_ledger(&mut self, id: LedgerId, text: &str) -> Result<(), StoreError> {
        self.ledgers.insert(id, text.to_owned());
        Ok(())
    }
}
