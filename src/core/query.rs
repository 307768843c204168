//! Read-only derivations over the journal's current state.

use crate::core::model::{BeanId, BrewId, BrewRecord, CoffeeBean};
use crate::core::time::format_timestamp;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Comparison needs at least this many brew records in the whole journal.
pub const MIN_RECORDS_FOR_COMPARISON: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewCount {
    pub bean_id: BeanId,
    pub count: usize,
}

/// A brew record as offered in a comparison picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionLabel {
    pub id: BrewId,
    pub label: String,
}

#[derive(Debug, Clone, Copy)]
pub struct JournalView<'a> {
    beans: &'a [CoffeeBean],
    brew_records: &'a [BrewRecord],
}

impl<'a> JournalView<'a> {
    pub fn new(beans: &'a [CoffeeBean], brew_records: &'a [BrewRecord]) -> Self {
        Self {
            beans,
            brew_records,
        }
    }

    pub fn beans(&self) -> &'a [CoffeeBean] {
        self.beans
    }

    pub fn brew_records(&self) -> &'a [BrewRecord] {
        self.brew_records
    }

    pub fn find_bean(&self, id: &BeanId) -> Option<&'a CoffeeBean> {
        self.beans.iter().find(|b| b.id == *id)
    }

    pub fn find_brew_record(&self, id: &BrewId) -> Option<&'a BrewRecord> {
        self.brew_records.iter().find(|r| r.id == *id)
    }

    /// Records for one bean, in insertion order.
    pub fn brew_records_for_bean(&self, bean_id: &BeanId) -> Vec<&'a BrewRecord> {
        self.brew_records
            .iter()
            .filter(|r| r.coffee_bean_id == *bean_id)
            .collect()
    }

    pub fn brew_count_for_bean(&self, bean_id: &BeanId) -> usize {
        self.brew_records
            .iter()
            .filter(|r| r.coffee_bean_id == *bean_id)
            .count()
    }

    /// Brew count for every bean, in bean order.
    pub fn brew_counts(&self) -> Vec<BrewCount> {
        let mut tally: FxHashMap<&BeanId, usize> = FxHashMap::default();
        for record in self.brew_records {
            *tally.entry(&record.coffee_bean_id).or_insert(0) += 1;
        }
        self.beans
            .iter()
            .map(|bean| BrewCount {
                bean_id: bean.id.clone(),
                count: tally.get(&bean.id).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn can_compare(&self) -> bool {
        self.brew_records.len() >= MIN_RECORDS_FOR_COMPARISON
    }

    /// `"<origin> - <farm> (<brewDate>)"` for every record, in insertion order.
    pub fn selection_labels(&self) -> Vec<SelectionLabel> {
        self.brew_records
            .iter()
            .map(|record| {
                let bean = self.find_bean(&record.coffee_bean_id);
                let label = format!(
                    "{} - {} ({})",
                    bean.map_or("?", |b| b.origin.as_str()),
                    bean.map_or("?", |b| b.farm.as_str()),
                    format_timestamp(&record.brew_date)
                );
                SelectionLabel {
                    id: record.id.clone(),
                    label,
                }
            })
            .collect()
    }
}
