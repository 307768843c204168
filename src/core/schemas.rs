//! Storage names and schema definitions for the journal.
//!
//! The journal keeps two named collections. Every backend stores each
//! collection as one JSON array under its name:
//! 1. `coffeeBeans`: bean purchases.
//! 2. `brewRecords`: brew sessions, each referencing one bean.

pub const BEANS_COLLECTION: &str = "coffeeBeans";
pub const BREW_RECORDS_COLLECTION: &str = "brewRecords";

pub const CONFIG_FILE_NAME: &str = "brewlog.toml";

// --- SQLite backend ---
pub const JOURNAL_DB_NAME: &str = "journal.db";

pub const JOURNAL_DB_SCHEMA_COLLECTIONS: &str = "
    CREATE TABLE IF NOT EXISTS collections (
        name TEXT PRIMARY KEY,
        payload TEXT NOT NULL, -- JSON array of records
        updated_at TEXT NOT NULL
    )
";

pub const JOURNAL_DB_UPSERT_COLLECTION: &str = "
    INSERT INTO collections(name, payload, updated_at) VALUES(?1, ?2, ?3)
    ON CONFLICT(name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at
";

// --- JSON directory backend ---
pub const JSON_FILE_EXTENSION: &str = "json";
