//! Command groups of the `brewlog` front-end.
//!
//! Each group owns its clap types, a `run_*` dispatcher that drives the
//! journal, and a `schema()` descriptor listing its commands.

pub mod beans;
pub mod brews;
pub mod compare;

use crate::core::error::BrewlogError;
use crate::core::journal::Outcome;
use crate::core::time::command_envelope;
use colored::Colorize;
use serde_json::Value as JsonValue;

/// Prints a JSON envelope for `cmd` on stdout.
pub(crate) fn emit_json(cmd: &str, payload: JsonValue) -> Result<(), BrewlogError> {
    let envelope = command_envelope(cmd, "ok", payload);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Durability fields merged into every mutation's JSON payload.
pub(crate) fn durability_json<T>(outcome: &Outcome<T>) -> JsonValue {
    serde_json::json!({
        "persisted": outcome.is_durable(),
        "warning": outcome.persist_error.as_ref().map(|e| e.to_string()),
    })
}

pub(crate) fn merge_json(mut base: JsonValue, extra: JsonValue) -> JsonValue {
    if let (Some(base_obj), Some(extra_obj)) = (base.as_object_mut(), extra.as_object()) {
        for (k, v) in extra_obj {
            base_obj.insert(k.clone(), v.clone());
        }
    }
    base
}

/// Tells the user a change may not survive a restart.
pub(crate) fn warn_if_not_durable<T>(outcome: &Outcome<T>) {
    if let Some(err) = &outcome.persist_error {
        eprintln!(
            "{} change kept in memory but not saved ({}); it may be lost on restart",
            "warning:".yellow().bold(),
            err
        );
    }
}

pub fn schema() -> JsonValue {
    serde_json::json!({
        "name": "brewlog",
        "version": env!("CARGO_PKG_VERSION"),
        "groups": [beans::schema(), brews::schema(), compare::schema()],
    })
}
