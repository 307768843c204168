use crate::core::error::BrewlogError;
use crate::core::journal::Journal;
use crate::core::model::{BeanId, BrewId, BrewRecord, BrewRecordDraft, FULL_MARK, FlavorProfile, in_flavor_range};
use crate::core::output::{OutputFormat, compact_line, format_number};
use crate::core::storage::Storage;
use crate::core::time::format_timestamp;
use crate::plugins::{durability_json, emit_json, merge_json, warn_if_not_durable};
use clap::{Parser, Subcommand};
use colored::Colorize;

const NOTES_PREVIEW_CHARS: usize = 60;

#[derive(Parser, Debug)]
#[clap(name = "brew", about = "Record and browse brew sessions.")]
pub struct BrewCli {
    #[clap(subcommand)]
    pub command: BrewCommand,
}

#[derive(Subcommand, Debug)]
pub enum BrewCommand {
    /// Record a brew session against an existing bean.
    Add {
        /// Bean the session used.
        #[clap(long)]
        bean: String,
        #[clap(long)]
        dripper: String,
        #[clap(long)]
        grinder: String,
        #[clap(long, default_value = "")]
        grind_setting: String,
        /// Water temperature in degrees Celsius.
        #[clap(long, allow_negative_numbers = true)]
        water_temp: f64,
        /// Free-form duration, e.g. 2:30.
        #[clap(long, default_value = "")]
        brew_time: String,
        #[clap(long, value_parser = parse_flavor_score)]
        acidity: f64,
        #[clap(long, value_parser = parse_flavor_score)]
        sweetness: f64,
        #[clap(long, value_parser = parse_flavor_score)]
        body: f64,
        #[clap(long, value_parser = parse_flavor_score)]
        aroma: f64,
        #[clap(long, value_parser = parse_flavor_score)]
        aftertaste: f64,
        #[clap(long, default_value = "")]
        notes: String,
    },
    /// List brew records, optionally for one bean.
    List {
        #[clap(long)]
        bean: Option<String>,
    },
    /// Show one brew record with its flavor chart axes.
    Show {
        #[clap(long)]
        id: String,
    },
    /// Delete a brew record.
    Delete {
        #[clap(long)]
        id: String,
    },
}

/// Flavor scores are numbers in `[0, 5]`.
pub fn parse_flavor_score(value: &str) -> Result<f64, String> {
    let score: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !in_flavor_range(score) {
        return Err(format!("score must be between 0 and {}, got {}", FULL_MARK, value));
    }
    Ok(score)
}

pub fn run_brew_cli<S: Storage>(
    journal: &mut Journal<S>,
    cli: BrewCli,
    format: OutputFormat,
) -> Result<(), BrewlogError> {
    match cli.command {
        BrewCommand::Add {
            bean,
            dripper,
            grinder,
            grind_setting,
            water_temp,
            brew_time,
            acidity,
            sweetness,
            body,
            aroma,
            aftertaste,
            notes,
        } => {
            let draft = BrewRecordDraft {
                dripper,
                grinder,
                grind_setting,
                water_temp,
                brew_time,
                flavor_profile: FlavorProfile::new(acidity, sweetness, body, aroma, aftertaste)?,
                notes,
            };
            let outcome = journal.create_brew_record(&BeanId::new(bean), draft)?;
            warn_if_not_durable(&outcome);
            match format {
                OutputFormat::Json => emit_json(
                    "brew.add",
                    merge_json(
                        serde_json::json!({ "id": outcome.value.id, "brewRecord": outcome.value }),
                        durability_json(&outcome),
                    ),
                )?,
                OutputFormat::Text => {
                    println!("Added brew record {}", outcome.value.id.to_string().bold())
                }
            }
        }
        BrewCommand::List { bean } => {
            let view = journal.view();
            let records: Vec<&BrewRecord> = match &bean {
                Some(bean) => view.brew_records_for_bean(&BeanId::new(bean.as_str())),
                None => view.brew_records().iter().collect(),
            };
            match format {
                OutputFormat::Json => emit_json(
                    "brew.list",
                    serde_json::json!({
                        "brewRecords": records,
                        "canCompare": view.can_compare(),
                    }),
                )?,
                OutputFormat::Text => {
                    if records.is_empty() {
                        println!("No brew records.");
                    }
                    for record in records {
                        let origin = view
                            .find_bean(&record.coffee_bean_id)
                            .map_or("?", |b| b.origin.as_str());
                        println!(
                            "{}  {}  {}  {} / {}, {}C",
                            record.id.to_string().bold(),
                            format_timestamp(&record.brew_date),
                            origin,
                            record.dripper,
                            record.grinder,
                            format_number(record.water_temp)
                        );
                        if record.has_notes() {
                            println!("    {}", compact_line(&record.notes, NOTES_PREVIEW_CHARS));
                        }
                    }
                }
            }
        }
        BrewCommand::Show { id } => {
            let id = BrewId::new(id);
            let view = journal.view();
            let record = view
                .find_brew_record(&id)
                .ok_or_else(|| BrewlogError::NotFound(format!("brew record '{}'", id)))?;
            let bean = view.find_bean(&record.coffee_bean_id);
            let axes = record.flavor_profile.axes();
            match format {
                OutputFormat::Json => emit_json(
                    "brew.show",
                    serde_json::json!({
                        "brewRecord": record,
                        "bean": bean,
                        "flavorAxes": axes,
                    }),
                )?,
                OutputFormat::Text => {
                    println!("{}  {}", record.id.to_string().bold(), format_timestamp(&record.brew_date));
                    if let Some(bean) = bean {
                        println!("  bean:     {} / {}", bean.origin, bean.farm);
                    }
                    println!("  dripper:  {}", record.dripper);
                    println!("  grinder:  {} @ {}", record.grinder, record.grind_setting);
                    println!("  water:    {}C", format_number(record.water_temp));
                    println!("  time:     {}", record.brew_time);
                    for axis in axes {
                        println!(
                            "  {:<11} {}/{}",
                            axis.attribute.label(),
                            format_number(axis.value),
                            format_number(axis.full_mark)
                        );
                    }
                    if record.has_notes() {
                        println!("  notes:    {}", record.notes);
                    }
                }
            }
        }
        BrewCommand::Delete { id } => {
            let id = BrewId::new(id);
            let outcome = journal.delete_brew_record(&id);
            warn_if_not_durable(&outcome);
            match format {
                OutputFormat::Json => emit_json(
                    "brew.delete",
                    merge_json(
                        serde_json::json!({ "id": id, "deleted": outcome.value.is_some() }),
                        durability_json(&outcome),
                    ),
                )?,
                OutputFormat::Text => match &outcome.value {
                    Some(record) => println!("Deleted brew record {}", record.id),
                    None => println!("No brew record {}; nothing deleted", id),
                },
            }
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "brew",
        "version": "0.1.0",
        "description": "Brew sessions with equipment, parameters and a five-attribute flavor profile",
        "commands": [
            {
                "name": "add",
                "parameters": [
                    "bean", "dripper", "grinder", "grind_setting", "water_temp", "brew_time",
                    "acidity", "sweetness", "body", "aroma", "aftertaste", "notes"
                ]
            },
            { "name": "list", "parameters": ["bean"] },
            { "name": "show", "parameters": ["id"] },
            { "name": "delete", "parameters": ["id"] }
        ],
        "storage": ["brewRecords"]
    })
}
