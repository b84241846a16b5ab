//! # Batch Stages and Required Fields
//!
//! A batch moves through a fixed sequence of stages. Each stage collects new
//! measurements, and the fields required at a stage are everything required
//! before it plus its own:
//!
//! ```text
//! INIT                    recipe
//! MASHING                 + name, brewing_day, grain_temperature, sparging_temperature
//! BOIL                    + gravity_before_boil
//! PRIMARY_FERMENTATION    + initial_gravity, wort_volume, boil_loss,
//!                           primary_fermentation_temperature, primary_fermentation_start_day
//! SECONDARY_FERMENTATION  (nothing new, secondary fermentation is optional)
//! PACKAGING               + end_gravity, beer_volume, packaging_date,
//!                           carbonation_type, carbonation_level
//! FINISHED                (nothing new)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use brew_core::calculations::stage::{validate, BatchField, BatchStage};
//!
//! let provided: BTreeSet<BatchField> = [
//!     BatchField::Recipe,
//!     BatchField::Name,
//!     BatchField::BrewingDay,
//!     BatchField::GrainTemperature,
//!     BatchField::SpargingTemperature,
//! ]
//! .into_iter()
//! .collect();
//!
//! let err = validate(BatchStage::Boil, &provided).unwrap_err();
//! assert_eq!(err.to_string(), "Missing required fields for stage BOIL: gravity_before_boil");
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{BrewError, BrewResult};

/// Ordered brewing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStage {
    #[default]
    Init,
    Mashing,
    Boil,
    PrimaryFermentation,
    SecondaryFermentation,
    Packaging,
    Finished,
}

impl BatchStage {
    /// All stages in order
    pub const ALL: [BatchStage; 7] = [
        BatchStage::Init,
        BatchStage::Mashing,
        BatchStage::Boil,
        BatchStage::PrimaryFermentation,
        BatchStage::SecondaryFermentation,
        BatchStage::Packaging,
        BatchStage::Finished,
    ];

    /// Position in the stage sequence
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Following stage, `None` at `Finished`
    pub fn next(&self) -> Option<BatchStage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Preceding stage, `None` at `Init`
    pub fn previous(&self) -> Option<BatchStage> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStage::Init => "INIT",
            BatchStage::Mashing => "MASHING",
            BatchStage::Boil => "BOIL",
            BatchStage::PrimaryFermentation => "PRIMARY_FERMENTATION",
            BatchStage::SecondaryFermentation => "SECONDARY_FERMENTATION",
            BatchStage::Packaging => "PACKAGING",
            BatchStage::Finished => "FINISHED",
        }
    }

    /// Fields first collected at this stage
    pub fn own_fields(&self) -> &'static [BatchField] {
        match self {
            BatchStage::Init => &[BatchField::Recipe],
            BatchStage::Mashing => &[
                BatchField::Name,
                BatchField::BrewingDay,
                BatchField::GrainTemperature,
                BatchField::SpargingTemperature,
            ],
            BatchStage::Boil => &[BatchField::GravityBeforeBoil],
            BatchStage::PrimaryFermentation => &[
                BatchField::InitialGravity,
                BatchField::WortVolume,
                BatchField::BoilLoss,
                BatchField::PrimaryFermentationTemperature,
                BatchField::PrimaryFermentationStartDay,
            ],
            BatchStage::SecondaryFermentation => &[],
            BatchStage::Packaging => &[
                BatchField::EndGravity,
                BatchField::BeerVolume,
                BatchField::PackagingDate,
                BatchField::CarbonationType,
                BatchField::CarbonationLevel,
            ],
            BatchStage::Finished => &[],
        }
    }
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchStage {
    type Err = BrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BatchStage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BrewError::invalid_input("stage", s, "Unknown batch stage"))
    }
}

/// Every batch field a stage can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchField {
    Recipe,
    Name,
    BrewingDay,
    GrainTemperature,
    SpargingTemperature,
    GravityBeforeBoil,
    InitialGravity,
    WortVolume,
    BoilLoss,
    PrimaryFermentationTemperature,
    PrimaryFermentationStartDay,
    SecondaryFermentationTemperature,
    SecondaryFermentationStartDay,
    EndGravity,
    BeerVolume,
    PackagingDate,
    CarbonationType,
    CarbonationLevel,
}

impl BatchField {
    pub const ALL: [BatchField; 18] = [
        BatchField::Recipe,
        BatchField::Name,
        BatchField::BrewingDay,
        BatchField::GrainTemperature,
        BatchField::SpargingTemperature,
        BatchField::GravityBeforeBoil,
        BatchField::InitialGravity,
        BatchField::WortVolume,
        BatchField::BoilLoss,
        BatchField::PrimaryFermentationTemperature,
        BatchField::PrimaryFermentationStartDay,
        BatchField::SecondaryFermentationTemperature,
        BatchField::SecondaryFermentationStartDay,
        BatchField::EndGravity,
        BatchField::BeerVolume,
        BatchField::PackagingDate,
        BatchField::CarbonationType,
        BatchField::CarbonationLevel,
    ];

    /// Field name as used by forms and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchField::Recipe => "recipe",
            BatchField::Name => "name",
            BatchField::BrewingDay => "brewing_day",
            BatchField::GrainTemperature => "grain_temperature",
            BatchField::SpargingTemperature => "sparging_temperature",
            BatchField::GravityBeforeBoil => "gravity_before_boil",
            BatchField::InitialGravity => "initial_gravity",
            BatchField::WortVolume => "wort_volume",
            BatchField::BoilLoss => "boil_loss",
            BatchField::PrimaryFermentationTemperature => "primary_fermentation_temperature",
            BatchField::PrimaryFermentationStartDay => "primary_fermentation_start_day",
            BatchField::SecondaryFermentationTemperature => "secondary_fermentation_temperature",
            BatchField::SecondaryFermentationStartDay => "secondary_fermentation_start_day",
            BatchField::EndGravity => "end_gravity",
            BatchField::BeerVolume => "beer_volume",
            BatchField::PackagingDate => "packaging_date",
            BatchField::CarbonationType => "carbonation_type",
            BatchField::CarbonationLevel => "carbonation_level",
        }
    }
}

impl fmt::Display for BatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchField {
    type Err = BrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BatchField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| BrewError::invalid_input("field", s, "Unknown batch field"))
    }
}

/// Cumulative required fields, indexed by stage
static REQUIRED_FIELDS: Lazy<Vec<Vec<BatchField>>> = Lazy::new(|| {
    let mut table = Vec::with_capacity(BatchStage::ALL.len());
    let mut cumulative: Vec<BatchField> = Vec::new();
    for stage in BatchStage::ALL {
        cumulative.extend_from_slice(stage.own_fields());
        table.push(cumulative.clone());
    }
    table
});

/// Fields that must be present for a batch at `stage`, in collection order.
pub fn required_fields(stage: BatchStage) -> &'static [BatchField] {
    &REQUIRED_FIELDS[stage.index()]
}

/// Required fields for `stage` that are absent from `provided`.
pub fn missing_fields(stage: BatchStage, provided: &BTreeSet<BatchField>) -> Vec<BatchField> {
    required_fields(stage)
        .iter()
        .copied()
        .filter(|field| !provided.contains(field))
        .collect()
}

/// Check `provided` covers every field `stage` requires.
///
/// Fails with [`BrewError::MissingRequiredFields`] listing every missing
/// field, not just the first.
pub fn validate(stage: BatchStage, provided: &BTreeSet<BatchField>) -> BrewResult<()> {
    let missing = missing_fields(stage, provided);
    if missing.is_empty() {
        return Ok(());
    }
    Err(BrewError::missing_fields(
        stage.as_str(),
        missing.iter().map(|f| f.as_str()),
    ))
}
