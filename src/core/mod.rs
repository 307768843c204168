//! Core journal: records, storage backends, the journal itself and its
//! read-side helpers.
//!
//! Everything the front-end needs is reachable from here; nothing in this
//! module prints or parses command lines.

pub mod compare;
pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod journal;
pub mod logging;
pub mod model;
pub mod output;
pub mod query;
pub mod schemas;
pub mod storage;
pub mod store;
pub mod time;
