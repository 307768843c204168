//! Persistence adapter contract and the file/in-memory backends.
//!
//! A backend is a dumb key-value store of serialized collections: it never
//! validates records. Typed decoding lives in [`load_collection`] and
//! [`encode_collection`].

use crate::core::error::PersistenceError;
use crate::core::schemas;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The two collections the journal persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Beans,
    BrewRecords,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Beans => schemas::BEANS_COLLECTION,
            Collection::BrewRecords => schemas::BREW_RECORDS_COLLECTION,
        }
    }
}

pub trait Storage {
    /// Previously saved text for `collection`, or `None` if never saved.
    fn load(&self, collection: &str) -> Result<Option<String>, PersistenceError>;

    /// Overwrites the whole collection.
    fn save(&mut self, collection: &str, payload: &str) -> Result<(), PersistenceError>;

    /// Writes several collections in order. Backends that can commit them
    /// atomically override this.
    fn save_batch(&mut self, writes: &[(&str, String)]) -> Result<(), PersistenceError> {
        for (collection, payload) in writes {
            self.save(collection, payload)?;
        }
        Ok(())
    }

    fn describe(&self) -> String;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn load(&self, collection: &str) -> Result<Option<String>, PersistenceError> {
        (**self).load(collection)
    }

    fn save(&mut self, collection: &str, payload: &str) -> Result<(), PersistenceError> {
        (**self).save(collection, payload)
    }

    fn save_batch(&mut self, writes: &[(&str, String)]) -> Result<(), PersistenceError> {
        (**self).save_batch(writes)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Decodes a stored collection. Extra fields on records are ignored;
/// malformed text fails as a whole.
pub fn load_collection<S, T>(
    storage: &S,
    collection: &str,
) -> Result<Option<Vec<T>>, PersistenceError>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    let Some(payload) = storage.load(collection)? else {
        return Ok(None);
    };
    serde_json::from_str(&payload)
        .map(Some)
        .map_err(|source| PersistenceError::Corrupt {
            collection: collection.to_string(),
            source,
        })
}

pub fn encode_collection<T: Serialize>(
    collection: &str,
    records: &[T],
) -> Result<String, PersistenceError> {
    serde_json::to_string(records).map_err(|source| PersistenceError::Encode {
        collection: collection.to_string(),
        source,
    })
}

/// Volatile backend, used by tests and as a scratch journal.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw text for a collection, as if an earlier session had saved it.
    pub fn with_entry(mut self, collection: &str, payload: impl Into<String>) -> Self {
        self.entries.insert(collection.to_string(), payload.into());
        self
    }

    pub fn raw(&self, collection: &str) -> Option<&str> {
        self.entries.get(collection).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, collection: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(collection).cloned())
    }

    fn save(&mut self, collection: &str, payload: &str) -> Result<(), PersistenceError> {
        self.entries
            .insert(collection.to_string(), payload.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Stand-in for a backend that failed to open. Every load and save fails with
/// the recorded reason, so the journal still opens empty and each mutation
/// reports that it was not saved.
#[derive(Debug, Clone)]
pub struct UnavailableStorage {
    backend: String,
    reason: String,
}

impl UnavailableStorage {
    pub fn new(backend: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            backend: backend.into(),
            reason: reason.to_string(),
        }
    }

    fn error(&self) -> PersistenceError {
        PersistenceError::Unavailable {
            backend: self.backend.clone(),
            reason: self.reason.clone(),
        }
    }
}

impl Storage for UnavailableStorage {
    fn load(&self, _collection: &str) -> Result<Option<String>, PersistenceError> {
        Err(self.error())
    }

    fn save(&mut self, _collection: &str, _payload: &str) -> Result<(), PersistenceError> {
        Err(self.error())
    }

    fn describe(&self) -> String {
        format!("unavailable:{}", self.backend)
    }
}

/// One `<collection>.json` file per collection under `root`.
#[derive(Debug, Clone)]
pub struct JsonDirStorage {
    root: PathBuf,
}

impl JsonDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", collection, schemas::JSON_FILE_EXTENSION))
    }
}

impl Storage for JsonDirStorage {
    fn load(&self, collection: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn save(&mut self, collection: &str, payload: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.root)?;
        let final_path = self.collection_path(collection);
        let tmp_path = self
            .root
            .join(format!(".{}.{}.tmp", collection, schemas::JSON_FILE_EXTENSION));
        fs::write(&tmp_path, payload)?;
        fs::rename(&tmp_path, &final_path)?;
        debug!(path = %final_path.display(), bytes = payload.len(), "collection written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.root.display())
    }
}
