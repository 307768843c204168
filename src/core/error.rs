use std::io;
use thiserror::Error;

/// Failures raised by a storage backend while loading or saving a collection.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("collection '{collection}' is not well-formed: {source}")]
    Corrupt {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode collection '{collection}': {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage {backend} is unavailable: {reason}")]
    Unavailable { backend: String, reason: String },
}

#[derive(Error, Debug)]
pub enum BrewlogError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Inconsistent journal state: {0}")]
    Inconsistency(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for BrewlogError {
    fn from(err: rusqlite::Error) -> Self {
        BrewlogError::Persistence(PersistenceError::Sqlite(err))
    }
}
