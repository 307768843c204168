use crate::core::compare::{Comparison, ComparisonSide, compare};
use crate::core::error::BrewlogError;
use crate::core::model::BrewId;
use crate::core::output::{OutputFormat, format_number};
use crate::core::query::{JournalView, MIN_RECORDS_FOR_COMPARISON};
use crate::core::time::format_timestamp;
use crate::plugins::emit_json;
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug)]
#[clap(
    name = "compare",
    about = "Compare two brew records side by side. Without ids, lists the records available for comparison."
)]
pub struct CompareCli {
    /// First brew record id.
    #[clap(long, requires = "second")]
    pub first: Option<String>,
    /// Second brew record id.
    #[clap(long, requires = "first")]
    pub second: Option<String>,
}

pub fn run_compare_cli(
    view: &JournalView<'_>,
    cli: CompareCli,
    format: OutputFormat,
) -> Result<(), BrewlogError> {
    let (Some(first), Some(second)) = (cli.first, cli.second) else {
        return print_candidates(view, format);
    };
    let comparison = compare(view, &BrewId::new(first), &BrewId::new(second))?;
    match format {
        OutputFormat::Json => emit_json(
            "compare",
            serde_json::json!({ "comparison": comparison }),
        )?,
        OutputFormat::Text => print_comparison(&comparison),
    }
    Ok(())
}

fn print_candidates(view: &JournalView<'_>, format: OutputFormat) -> Result<(), BrewlogError> {
    let labels = view.selection_labels();
    match format {
        OutputFormat::Json => emit_json(
            "compare",
            serde_json::json!({
                "canCompare": view.can_compare(),
                "candidates": labels,
            }),
        )?,
        OutputFormat::Text => {
            if !view.can_compare() {
                println!(
                    "Comparison needs at least {} brew records; {} recorded so far.",
                    MIN_RECORDS_FOR_COMPARISON,
                    view.brew_records().len()
                );
                return Ok(());
            }
            println!("Pick two records with --first and --second:");
            for candidate in labels {
                println!("  {}  {}", candidate.id.to_string().bold(), candidate.label);
            }
        }
    }
    Ok(())
}

fn side_title(side: &ComparisonSide) -> String {
    format!(
        "{} / {} ({})",
        side.origin,
        side.farm,
        format_timestamp(&side.record.brew_date)
    )
}

fn same_or_different(same: bool) -> colored::ColoredString {
    if same { "same".green() } else { "different".yellow() }
}

fn print_comparison(comparison: &Comparison) {
    let first = &comparison.first;
    let second = &comparison.second;
    println!("{} {}", "first: ".bold(), side_title(first));
    println!("{} {}", "second:".bold(), side_title(second));
    println!();

    println!("{:<12} {:>6} {:>6}", "flavor", "first", "second");
    for pair in &comparison.flavor {
        println!(
            "{:<12} {:>6} {:>6}",
            pair.attribute.label(),
            format_number(pair.first),
            format_number(pair.second)
        );
    }
    println!();

    println!("{:<12} {:<20} {:<20}", "", "first", "second");
    for (label, a, b) in [
        ("dripper", &first.record.dripper, &second.record.dripper),
        ("grinder", &first.record.grinder, &second.record.grinder),
        ("grind", &first.record.grind_setting, &second.record.grind_setting),
        ("brew time", &first.record.brew_time, &second.record.brew_time),
    ] {
        println!("{:<12} {:<20} {:<20}", label, a, b);
    }
    println!(
        "{:<12} {:<20} {:<20}",
        "water",
        format!("{}C", format_number(first.record.water_temp)),
        format!("{}C", format_number(second.record.water_temp))
    );
    println!();

    let diff = &comparison.diff;
    let water = if diff.water_temp.identical {
        "identical".green()
    } else {
        format!("differs by {}C", format_number(diff.water_temp.delta)).yellow()
    };
    println!("water temp:  {}", water);
    println!("dripper:     {}", same_or_different(diff.same_dripper));
    println!("grinder:     {}", same_or_different(diff.same_grinder));
    let bean = if diff.same_bean {
        "same bean".green()
    } else {
        "different bean".yellow()
    };
    println!("bean:        {}", bean);

    for (title, side) in [("first", first), ("second", second)] {
        if side.record.has_notes() {
            println!("{} notes: {}", title, side.record.notes);
        }
    }
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "compare",
        "version": "0.1.0",
        "description": "Side-by-side comparison of two brew records (flavor pairs and difference summary)",
        "commands": [
            { "name": "compare", "parameters": ["first", "second"] }
        ],
        "storage": []
    })
}
