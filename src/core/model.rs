//! Journal records: coffee beans, brew records and the flavor profile they embed.
//!
//! Field names serialize in camelCase so collections written by earlier
//! journal versions load unchanged.

use crate::core::error::BrewlogError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest score any flavor attribute may carry.
pub const FULL_MARK: f64 = 5.0;

macro_rules! impl_string_id {
    ($t:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

impl_string_id!(BeanId);
impl_string_id!(BrewId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeBean {
    pub id: BeanId,
    pub origin: String,
    pub farm: String,
    pub process: String,
    pub roast_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    /// Base64 image payload; never inspected by the journal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl CoffeeBean {
    /// Editable copy of the mutable fields, for building an update.
    pub fn draft(&self) -> BeanDraft {
        BeanDraft {
            origin: self.origin.clone(),
            farm: self.farm.clone(),
            process: self.process.clone(),
            roast_date: self.roast_date,
            photo: self.photo.clone(),
        }
    }
}

/// Caller-supplied bean fields; identity and creation time are assigned by the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanDraft {
    pub origin: String,
    pub farm: String,
    pub process: String,
    pub roast_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl BeanDraft {
    pub fn new(
        origin: impl Into<String>,
        farm: impl Into<String>,
        process: impl Into<String>,
        roast_date: NaiveDate,
    ) -> Self {
        Self {
            origin: origin.into(),
            farm: farm.into(),
            process: process.into(),
            roast_date,
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub(crate) fn into_bean(self, id: BeanId, created_at: DateTime<Utc>) -> CoffeeBean {
        CoffeeBean {
            id,
            origin: self.origin,
            farm: self.farm,
            process: self.process,
            roast_date: self.roast_date,
            created_at,
            photo: self.photo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlavorAttribute {
    Acidity,
    Sweetness,
    Body,
    Aroma,
    Aftertaste,
}

impl FlavorAttribute {
    /// Radar chart axis order.
    pub const ALL: [FlavorAttribute; 5] = [
        FlavorAttribute::Acidity,
        FlavorAttribute::Sweetness,
        FlavorAttribute::Body,
        FlavorAttribute::Aroma,
        FlavorAttribute::Aftertaste,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlavorAttribute::Acidity => "acidity",
            FlavorAttribute::Sweetness => "sweetness",
            FlavorAttribute::Body => "body",
            FlavorAttribute::Aroma => "aroma",
            FlavorAttribute::Aftertaste => "aftertaste",
        }
    }
}

impl fmt::Display for FlavorAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One labelled axis of a single-record flavor chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorAxis {
    pub attribute: FlavorAttribute,
    pub value: f64,
    pub full_mark: f64,
}

/// Five tasted attributes, each scored in `[0, FULL_MARK]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlavorProfile {
    pub acidity: f64,
    pub sweetness: f64,
    pub body: f64,
    pub aroma: f64,
    pub aftertaste: f64,
}

impl FlavorProfile {
    /// Builds a profile, rejecting scores outside `[0, 5]`.
    pub fn new(
        acidity: f64,
        sweetness: f64,
        body: f64,
        aroma: f64,
        aftertaste: f64,
    ) -> Result<Self, BrewlogError> {
        let profile = Self {
            acidity,
            sweetness,
            body,
            aroma,
            aftertaste,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn get(&self, attribute: FlavorAttribute) -> f64 {
        match attribute {
            FlavorAttribute::Acidity => self.acidity,
            FlavorAttribute::Sweetness => self.sweetness,
            FlavorAttribute::Body => self.body,
            FlavorAttribute::Aroma => self.aroma,
            FlavorAttribute::Aftertaste => self.aftertaste,
        }
    }

    pub fn validate(&self) -> Result<(), BrewlogError> {
        for attribute in FlavorAttribute::ALL {
            let value = self.get(attribute);
            if !in_flavor_range(value) {
                return Err(BrewlogError::ValidationError(format!(
                    "{} must be between 0 and {}, got {}",
                    attribute, FULL_MARK, value
                )));
            }
        }
        Ok(())
    }

    pub fn axes(&self) -> Vec<FlavorAxis> {
        FlavorAttribute::ALL
            .iter()
            .map(|&attribute| FlavorAxis {
                attribute,
                value: self.get(attribute),
                full_mark: FULL_MARK,
            })
            .collect()
    }
}

pub fn in_flavor_range(value: f64) -> bool {
    value.is_finite() && (0.0..=FULL_MARK).contains(&value)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewRecord {
    pub id: BrewId,
    pub coffee_bean_id: BeanId,
    pub dripper: String,
    pub grinder: String,
    pub grind_setting: String,
    /// Degrees Celsius.
    pub water_temp: f64,
    pub brew_time: String,
    pub flavor_profile: FlavorProfile,
    #[serde(default)]
    pub notes: String,
    pub brew_date: DateTime<Utc>,
}

impl BrewRecord {
    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }
}

/// Caller-supplied brew fields. The bean reference is passed separately to
/// `Journal::create_brew_record`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrewRecordDraft {
    pub dripper: String,
    pub grinder: String,
    pub grind_setting: String,
    pub water_temp: f64,
    pub brew_time: String,
    pub flavor_profile: FlavorProfile,
    #[serde(default)]
    pub notes: String,
}

impl BrewRecordDraft {
    pub fn validate(&self) -> Result<(), BrewlogError> {
        if !self.water_temp.is_finite() {
            return Err(BrewlogError::ValidationError(format!(
                "water temperature must be a finite number, got {}",
                self.water_temp
            )));
        }
        self.flavor_profile.validate()
    }

    pub(crate) fn into_record(
        self,
        id: BrewId,
        coffee_bean_id: BeanId,
        brew_date: DateTime<Utc>,
    ) -> BrewRecord {
        BrewRecord {
            id,
            coffee_bean_id,
            dripper: self.dripper,
            grinder: self.grinder,
            grind_setting: self.grind_setting,
            water_temp: self.water_temp,
            brew_time: self.brew_time,
            flavor_profile: self.flavor_profile,
            notes: self.notes,
            brew_date,
        }
    }
}
