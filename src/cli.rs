//! CLI struct definitions for the brewlog command-line interface.
//!
//! All clap-derived top-level types live here; each command group's own
//! types live next to its dispatcher in `plugins/`.

use crate::core::output::OutputFormat;
use crate::core::store::StoreKind;
use crate::plugins::{beans, brews, compare};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "brewlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A local coffee brewing journal: record beans and brew sessions, then compare brews side by side."
)]
pub(crate) struct Cli {
    /// Data directory (overrides BREWLOG_HOME and the config file).
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Config file (defaults to <config dir>/brewlog/brewlog.toml).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Storage backend (overrides the config file).
    #[clap(long, global = true, value_enum)]
    pub storage: Option<StoreKind>,
    /// Output format.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Coffee bean purchases.
    Bean(beans::BeanCli),
    /// Brew sessions.
    Brew(brews::BrewCli),
    /// Side-by-side comparison of two brew records.
    Compare(compare::CompareCli),
    /// Print the machine-readable command schema.
    Schema,
}
