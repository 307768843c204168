//! SQLite backend: each collection is one row of a key-value table.

use crate::core::error::PersistenceError;
use crate::core::schemas;
use crate::core::storage::Storage;
use crate::core::time::format_timestamp;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn db_connect(db_path: &Path) -> Result<Connection, PersistenceError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
    Ok(conn)
}

pub fn journal_db_path(root: &Path) -> PathBuf {
    root.join(schemas::JOURNAL_DB_NAME)
}

pub struct SqliteStorage {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStorage {
    /// Opens (creating if needed) `journal.db` under `root`.
    pub fn open(root: &Path) -> Result<Self, PersistenceError> {
        fs::create_dir_all(root)?;
        let path = journal_db_path(root);
        let conn = db_connect(&path)?;
        conn.execute(schemas::JOURNAL_DB_SCHEMA_COLLECTIONS, [])?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for SqliteStorage {
    fn load(&self, collection: &str) -> Result<Option<String>, PersistenceError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM collections WHERE name = ?1",
                params![collection],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save(&mut self, collection: &str, payload: &str) -> Result<(), PersistenceError> {
        let now = format_timestamp(&Utc::now());
        self.conn.execute(
            schemas::JOURNAL_DB_UPSERT_COLLECTION,
            params![collection, payload, now],
        )?;
        debug!(collection, bytes = payload.len(), "collection written");
        Ok(())
    }

    /// All writes land in one transaction.
    fn save_batch(&mut self, writes: &[(&str, String)]) -> Result<(), PersistenceError> {
        let now = format_timestamp(&Utc::now());
        let tx = self.conn.transaction()?;
        for (collection, payload) in writes {
            tx.execute(
                schemas::JOURNAL_DB_UPSERT_COLLECTION,
                params![collection, payload, now],
            )?;
        }
        tx.commit()?;
        debug!(collections = writes.len(), "collection batch committed");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
