//! Hop additions.
//!
//! Only additions that spend time in boiling wort isomerize alpha acids, so
//! only `Boil` and `FirstWort` uses count toward IBU. First wort hops sit in
//! the kettle for the whole boil and take the recipe boil time.

use serde::{Deserialize, Serialize};

use crate::errors::{BrewError, BrewResult};
use crate::units::{Quantity, Unit, UnitFamily};

use super::{check_non_negative, check_percent};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Where in the process a hop addition is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HopUse {
    Mash,
    FirstWort,
    Boil,
    Aroma,
    Whirlpool,
    DryHop,
}

impl HopUse {
    /// Additions that contribute isomerized bitterness
    pub fn contributes_bitterness(&self) -> bool {
        matches!(self, HopUse::Boil | HopUse::FirstWort)
    }
}

/// Unit of the addition's `time` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HopTimeUnit {
    #[default]
    Minutes,
    Days,
}

/// A hop line of a recipe.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Cascade",
///   "use": "BOIL",
///   "alpha_acids": 5.5,
///   "amount": { "magnitude": 30.0, "unit": "g" },
///   "time": 60.0,
///   "time_unit": "MINUTES"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub name: String,

    #[serde(rename = "use")]
    pub usage: HopUse,

    /// Alpha acids (%)
    pub alpha_acids: f64,

    /// Weight
    pub amount: Quantity,

    /// Contact time, minutes for kettle additions, days for dry hops
    pub time: f64,

    #[serde(default)]
    pub time_unit: HopTimeUnit,
}

impl Hop {
    /// Boil addition, amount in grams and time in minutes
    pub fn boil(name: impl Into<String>, amount_g: f64, alpha_acids: f64, minutes: f64) -> Self {
        Hop {
            name: name.into(),
            usage: HopUse::Boil,
            alpha_acids,
            amount: Quantity::grams(amount_g),
            time: minutes,
            time_unit: HopTimeUnit::Minutes,
        }
    }

    /// Dry hop addition, amount in grams and time in days
    pub fn dry_hop(name: impl Into<String>, amount_g: f64, alpha_acids: f64, days: f64) -> Self {
        Hop {
            name: name.into(),
            usage: HopUse::DryHop,
            alpha_acids,
            amount: Quantity::grams(amount_g),
            time: days,
            time_unit: HopTimeUnit::Days,
        }
    }

    pub fn contributes_bitterness(&self) -> bool {
        self.usage.contributes_bitterness()
    }

    pub fn amount_g(&self) -> BrewResult<f64> {
        self.amount.value_in(Unit::Gram)
    }

    /// Contact time in minutes
    pub fn time_minutes(&self) -> f64 {
        match self.time_unit {
            HopTimeUnit::Minutes => self.time,
            HopTimeUnit::Days => self.time * MINUTES_PER_DAY,
        }
    }

    /// Minutes of boil the addition sees, or `None` when it does not
    /// contribute bitterness.
    pub fn boil_minutes(&self, recipe_boil_time: u32) -> Option<f64> {
        match self.usage {
            HopUse::Boil => Some(self.time_minutes()),
            HopUse::FirstWort => Some(f64::from(recipe_boil_time)),
            _ => None,
        }
    }

    /// Validate field ranges and unit families.
    pub fn validate(&self) -> BrewResult<()> {
        if self.amount.family() != UnitFamily::Mass {
            return Err(BrewError::unit_family_mismatch(self.amount.unit.name(), "g"));
        }
        check_percent("alpha_acids", self.alpha_acids)?;
        check_non_negative("amount", self.amount.magnitude)?;
        check_non_negative("time", self.time)?;
        Ok(())
    }
}
