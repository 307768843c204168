//! brewlog: a local coffee brewing journal.
//!
//! Record coffee bean purchases and individual brew sessions, browse the
//! history per bean, and compare two sessions side by side.
//!
//! # Architecture
//!
//! - **Journal** ([`core::journal::Journal`]): sole owner of the bean and
//!   brew-record collections. Assigns ids and timestamps through injected
//!   strategies, rejects references to unknown beans, and deletes a bean's
//!   brew records together with the bean.
//! - **Storage** ([`core::storage::Storage`]): key-value persistence of the
//!   two collections. Every mutation writes through immediately. Backends:
//!   SQLite (`journal.db`), JSON files, and memory.
//! - **Queries** ([`core::query::JournalView`]): lookups, per-bean history and
//!   brew counts.
//! - **Comparison** ([`core::compare`]): flavor pairs for a radar chart plus a
//!   difference summary of two brew records.
//!
//! # Examples
//!
//! ```bash
//! brewlog bean add --origin Ethiopia --farm "Yirgacheffe Coop" --process Washed --roast-date 2024-01-10
//! brewlog brew add --bean <BEAN_ID> --dripper V60 --grinder C40 --water-temp 92 \
//!     --acidity 4 --sweetness 3 --body 2 --aroma 4 --aftertaste 3
//! brewlog compare --first <BREW_ID> --second <BREW_ID>
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: records, storage, journal, queries, comparison, config
//! - [`plugins`]: command groups of the `brewlog` binary

mod cli;
pub mod core;
pub mod plugins;

use crate::cli::{Cli, Command};
use crate::core::storage::Storage;
use crate::core::{config, error, journal::Journal, logging, store::Store, store::StoreKind};
use crate::plugins::{beans, brews, compare};

use clap::Parser;
use colored::Colorize;
use std::path::Path;
use tracing::info;

pub use crate::core::error::BrewlogError;

pub fn run() -> Result<(), error::BrewlogError> {
    let Cli {
        data_dir,
        config: config_path,
        storage,
        format,
        command,
    } = Cli::parse();

    if let Command::Schema = command {
        println!("{}", serde_json::to_string_pretty(&plugins::schema())?);
        return Ok(());
    }

    let config = config::load_config(config_path.as_deref())?;
    logging::init_tracing(&config.log_level);
    let mut journal = open_journal(data_dir.as_deref(), storage, &config)?;

    match command {
        Command::Bean(bean_cli) => beans::run_bean_cli(&mut journal, bean_cli, format),
        Command::Brew(brew_cli) => brews::run_brew_cli(&mut journal, brew_cli, format),
        Command::Compare(compare_cli) => {
            compare::run_compare_cli(&journal.view(), compare_cli, format)
        }
        Command::Schema => Ok(()),
    }
}

fn open_journal(
    data_dir: Option<&Path>,
    storage: Option<StoreKind>,
    config: &config::BrewlogConfig,
) -> Result<Journal<Box<dyn Storage>>, error::BrewlogError> {
    let env_home = std::env::var(config::HOME_ENV_VAR).ok();
    let root = config::resolve_data_dir(data_dir, env_home.as_deref(), config);
    let store = Store::new(storage.unwrap_or(config.storage), root);
    info!(root = %store.root.display(), kind = ?store.kind, "opening journal");

    let mut journal = store.open_journal()?;
    if let Some(err) = journal.take_load_warning() {
        eprintln!(
            "{} stored journal could not be read ({}); starting with an empty journal",
            "warning:".yellow().bold(),
            err
        );
    }
    Ok(journal)
}
