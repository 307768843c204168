//! Store handle: where the journal lives and which backend holds it.

use crate::core::db::{SqliteStorage, journal_db_path};
use crate::core::error::BrewlogError;
use crate::core::journal::Journal;
use crate::core::storage::{JsonDirStorage, Storage, UnavailableStorage};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Backend discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// `journal.db` key-value table; cascading deletes commit in one transaction.
    #[default]
    Sqlite,
    /// `coffeeBeans.json` and `brewRecords.json` side by side.
    Json,
}

#[derive(Debug, Clone)]
pub struct Store {
    pub kind: StoreKind,
    /// Data directory holding the backend's files.
    pub root: PathBuf,
}

impl Store {
    pub fn new(kind: StoreKind, root: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            root: root.into(),
        }
    }

    pub fn open_storage(&self) -> Result<Box<dyn Storage>, BrewlogError> {
        let storage: Box<dyn Storage> = match self.kind {
            StoreKind::Sqlite => Box::new(SqliteStorage::open(&self.root)?),
            StoreKind::Json => Box::new(JsonDirStorage::new(&self.root)),
        };
        Ok(storage)
    }

    /// Opens the journal. A backend that cannot be opened is not fatal: the
    /// journal starts empty with the failure as its load warning.
    pub fn open_journal(&self) -> Result<Journal<Box<dyn Storage>>, BrewlogError> {
        let storage: Box<dyn Storage> = match self.open_storage() {
            Ok(storage) => storage,
            Err(BrewlogError::Persistence(err)) => {
                warn!(backend = %self.describe(), error = %err, "storage could not be opened");
                Box::new(UnavailableStorage::new(self.describe(), &err))
            }
            Err(other) => return Err(other),
        };
        Ok(Journal::open(storage))
    }

    pub fn describe(&self) -> String {
        match self.kind {
            StoreKind::Sqlite => format!("sqlite:{}", journal_db_path(&self.root).display()),
            StoreKind::Json => format!("json:{}", self.root.display()),
        }
    }
}
