//! Side-by-side comparison of two brew records.
//!
//! Pure: the result depends only on the view it is computed from.

use crate::core::error::BrewlogError;
use crate::core::model::{BrewId, BrewRecord, FULL_MARK, FlavorAttribute, in_flavor_range};
use crate::core::query::JournalView;
use serde::Serialize;

/// Both records' scores on one radar axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorPair {
    pub attribute: FlavorAttribute,
    pub first: f64,
    pub second: f64,
    pub full_mark: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaterTempDiff {
    /// Absolute difference in degrees Celsius.
    pub delta: f64,
    pub identical: bool,
}

impl WaterTempDiff {
    pub fn between(a: f64, b: f64) -> Self {
        let delta = (a - b).abs();
        Self {
            delta,
            identical: delta == 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferenceSummary {
    pub water_temp: WaterTempDiff,
    pub same_dripper: bool,
    pub same_grinder: bool,
    pub same_bean: bool,
}

/// One compared record with its bean's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSide {
    pub record: BrewRecord,
    pub origin: String,
    pub farm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: ComparisonSide,
    pub second: ComparisonSide,
    pub flavor: Vec<FlavorPair>,
    pub diff: DifferenceSummary,
}

pub fn difference_summary(a: &BrewRecord, b: &BrewRecord) -> DifferenceSummary {
    DifferenceSummary {
        water_temp: WaterTempDiff::between(a.water_temp, b.water_temp),
        same_dripper: a.dripper == b.dripper,
        same_grinder: a.grinder == b.grinder,
        same_bean: a.coffee_bean_id == b.coffee_bean_id,
    }
}

pub fn flavor_pairs(a: &BrewRecord, b: &BrewRecord) -> Vec<FlavorPair> {
    FlavorAttribute::ALL
        .iter()
        .map(|&attribute| FlavorPair {
            attribute,
            first: a.flavor_profile.get(attribute),
            second: b.flavor_profile.get(attribute),
            full_mark: FULL_MARK,
        })
        .collect()
}

/// Compares two distinct, existing brew records.
///
/// Fails with `InvalidSelection` when either id is unknown or both ids are
/// the same, and with `Inconsistency` when stored data breaks the flavor
/// range or the bean reference.
pub fn compare(
    view: &JournalView<'_>,
    first: &BrewId,
    second: &BrewId,
) -> Result<Comparison, BrewlogError> {
    if first == second {
        return Err(BrewlogError::InvalidSelection(format!(
            "cannot compare brew record '{}' with itself",
            first
        )));
    }
    let a = view.find_brew_record(first).ok_or_else(|| {
        BrewlogError::InvalidSelection(format!("brew record '{}' does not exist", first))
    })?;
    let b = view.find_brew_record(second).ok_or_else(|| {
        BrewlogError::InvalidSelection(format!("brew record '{}' does not exist", second))
    })?;

    let first_side = side(view, a)?;
    let second_side = side(view, b)?;

    Ok(Comparison {
        flavor: flavor_pairs(a, b),
        diff: difference_summary(a, b),
        first: first_side,
        second: second_side,
    })
}

fn side(view: &JournalView<'_>, record: &BrewRecord) -> Result<ComparisonSide, BrewlogError> {
    for attribute in FlavorAttribute::ALL {
        let value = record.flavor_profile.get(attribute);
        if !in_flavor_range(value) {
            return Err(BrewlogError::Inconsistency(format!(
                "brew record '{}' has {} {} outside 0..={}",
                record.id, attribute, value, FULL_MARK
            )));
        }
    }
    let bean = view.find_bean(&record.coffee_bean_id).ok_or_else(|| {
        BrewlogError::Inconsistency(format!(
            "brew record '{}' references missing bean '{}'",
            record.id, record.coffee_bean_id
        ))
    })?;
    Ok(ComparisonSide {
        record: record.clone(),
        origin: bean.origin.clone(),
        farm: bean.farm.clone(),
    })
}
