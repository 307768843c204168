use crate::core::error::BrewlogError;
use crate::core::journal::Journal;
use crate::core::model::{BeanDraft, BeanId, CoffeeBean};
use crate::core::output::{OutputFormat, compact_line, format_number};
use crate::core::storage::Storage;
use crate::core::time::format_timestamp;
use crate::plugins::{durability_json, emit_json, merge_json, warn_if_not_durable};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

const NOTES_PREVIEW_CHARS: usize = 60;

#[derive(Parser, Debug)]
#[clap(name = "bean", about = "Record and manage coffee bean purchases.")]
pub struct BeanCli {
    #[clap(subcommand)]
    pub command: BeanCommand,
}

#[derive(Subcommand, Debug)]
pub enum BeanCommand {
    /// Record a new bean purchase.
    Add {
        #[clap(long)]
        origin: String,
        #[clap(long)]
        farm: String,
        #[clap(long)]
        process: String,
        /// Roast date as YYYY-MM-DD.
        #[clap(long, value_parser = parse_roast_date)]
        roast_date: NaiveDate,
        /// Image file stored with the bean (base64 encoded).
        #[clap(long)]
        photo: Option<PathBuf>,
    },
    /// List beans with their brew counts.
    List,
    /// Show one bean and its brew history.
    Show {
        #[clap(long)]
        id: String,
    },
    /// Edit a bean; omitted fields keep their current value.
    Edit {
        #[clap(long)]
        id: String,
        #[clap(long)]
        origin: Option<String>,
        #[clap(long)]
        farm: Option<String>,
        #[clap(long)]
        process: Option<String>,
        #[clap(long, value_parser = parse_roast_date)]
        roast_date: Option<NaiveDate>,
        #[clap(long, conflicts_with = "clear_photo")]
        photo: Option<PathBuf>,
        /// Remove the stored photo.
        #[clap(long)]
        clear_photo: bool,
    },
    /// Delete a bean together with all of its brew records.
    Delete {
        #[clap(long)]
        id: String,
    },
}

pub fn parse_roast_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

/// Reads an image file into the base64 text stored on a bean.
pub fn encode_photo(path: &Path) -> Result<String, BrewlogError> {
    let bytes = fs::read(path)?;
    Ok(STANDARD.encode(bytes))
}

pub fn run_bean_cli<S: Storage>(
    journal: &mut Journal<S>,
    cli: BeanCli,
    format: OutputFormat,
) -> Result<(), BrewlogError> {
    match cli.command {
        BeanCommand::Add {
            origin,
            farm,
            process,
            roast_date,
            photo,
        } => {
            let mut draft = BeanDraft::new(origin, farm, process, roast_date);
            if let Some(path) = photo {
                draft = draft.with_photo(encode_photo(&path)?);
            }
            let outcome = journal.create_bean(draft);
            warn_if_not_durable(&outcome);
            match format {
                OutputFormat::Json => emit_json(
                    "bean.add",
                    merge_json(
                        serde_json::json!({ "id": outcome.value.id, "bean": outcome.value }),
                        durability_json(&outcome),
                    ),
                )?,
                OutputFormat::Text => {
                    println!("Added bean {}", outcome.value.id.to_string().bold());
                }
            }
        }
        BeanCommand::List => {
            let view = journal.view();
            let counts = view.brew_counts();
            match format {
                OutputFormat::Json => {
                    let beans: Vec<_> = view
                        .beans()
                        .iter()
                        .zip(&counts)
                        .map(|(bean, count)| {
                            serde_json::json!({ "bean": bean, "brewCount": count.count })
                        })
                        .collect();
                    emit_json(
                        "bean.list",
                        serde_json::json!({
                            "beans": beans,
                            "canCompare": view.can_compare(),
                        }),
                    )?
                }
                OutputFormat::Text => {
                    if view.beans().is_empty() {
                        println!("No beans recorded yet. Add one with `brewlog bean add`.");
                    }
                    for (bean, count) in view.beans().iter().zip(&counts) {
                        println!("{}  {}", bean.id.to_string().bold(), bean_line(bean));
                        println!("    {} brew record(s)", count.count);
                    }
                }
            }
        }
        BeanCommand::Show { id } => {
            let id = BeanId::new(id);
            let view = journal.view();
            let bean = view
                .find_bean(&id)
                .ok_or_else(|| BrewlogError::NotFound(format!("bean '{}'", id)))?;
            let records = view.brew_records_for_bean(&id);
            match format {
                OutputFormat::Json => emit_json(
                    "bean.show",
                    serde_json::json!({
                        "bean": bean,
                        "brewCount": records.len(),
                        "brewRecords": records,
                    }),
                )?,
                OutputFormat::Text => {
                    println!("{}  {}", bean.id.to_string().bold(), bean_line(bean));
                    println!("    added {}", format_timestamp(&bean.created_at));
                    if bean.photo.is_some() {
                        println!("    photo attached");
                    }
                    if records.is_empty() {
                        println!("    no brew records yet");
                    }
                    for record in records {
                        println!(
                            "  {}  {}  {} / {} @ {}, {}C, {}",
                            record.id,
                            format_timestamp(&record.brew_date),
                            record.dripper,
                            record.grinder,
                            record.grind_setting,
                            format_number(record.water_temp),
                            record.brew_time
                        );
                        if record.has_notes() {
                            println!("      {}", compact_line(&record.notes, NOTES_PREVIEW_CHARS));
                        }
                    }
                }
            }
        }
        BeanCommand::Edit {
            id,
            origin,
            farm,
            process,
            roast_date,
            photo,
            clear_photo,
        } => {
            let id = BeanId::new(id);
            let current = journal
                .view()
                .find_bean(&id)
                .ok_or_else(|| BrewlogError::NotFound(format!("bean '{}'", id)))?;
            let mut draft = current.draft();
            if let Some(origin) = origin {
                draft.origin = origin;
            }
            if let Some(farm) = farm {
                draft.farm = farm;
            }
            if let Some(process) = process {
                draft.process = process;
            }
            if let Some(roast_date) = roast_date {
                draft.roast_date = roast_date;
            }
            if let Some(path) = photo {
                draft.photo = Some(encode_photo(&path)?);
            }
            if clear_photo {
                draft.photo = None;
            }

            let outcome = journal.update_bean(&id, draft)?;
            warn_if_not_durable(&outcome);
            match format {
                OutputFormat::Json => emit_json(
                    "bean.edit",
                    merge_json(
                        serde_json::json!({ "bean": outcome.value }),
                        durability_json(&outcome),
                    ),
                )?,
                OutputFormat::Text => println!("Updated bean {}", outcome.value.id),
            }
        }
        BeanCommand::Delete { id } => {
            let id = BeanId::new(id);
            let outcome = journal.delete_bean(&id);
            warn_if_not_durable(&outcome);
            let removal = &outcome.value;
            match format {
                OutputFormat::Json => emit_json(
                    "bean.delete",
                    merge_json(
                        serde_json::json!({
                            "id": id,
                            "deleted": removal.bean.is_some(),
                            "brewRecordsDeleted": removal.brew_records.len(),
                        }),
                        durability_json(&outcome),
                    ),
                )?,
                OutputFormat::Text => match &removal.bean {
                    Some(bean) => println!(
                        "Deleted bean {} ({}) and {} brew record(s)",
                        bean.id,
                        bean.origin,
                        removal.brew_records.len()
                    ),
                    None => println!("No bean {}; nothing deleted", id),
                },
            }
        }
    }
    Ok(())
}

fn bean_line(bean: &CoffeeBean) -> String {
    format!(
        "{} / {} ({}), roasted {}",
        bean.origin, bean.farm, bean.process, bean.roast_date
    )
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "bean",
        "version": "0.1.0",
        "description": "Coffee bean purchases; deleting a bean deletes its brew records",
        "commands": [
            { "name": "add", "parameters": ["origin", "farm", "process", "roast_date", "photo"] },
            { "name": "list" },
            { "name": "show", "parameters": ["id"] },
            { "name": "edit", "parameters": ["id", "origin", "farm", "process", "roast_date", "photo", "clear_photo"] },
            { "name": "delete", "parameters": ["id"] }
        ],
        "storage": ["coffeeBeans"]
    })
}
