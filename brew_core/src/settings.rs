//! # Brewery Settings
//!
//! Display preferences stored with a brewery. Calculations always run in
//! base units; settings only decide how quantities are shown.
//!
//! ## Example
//!
//! ```rust
//! use brew_core::settings::BrewSettings;
//! use brew_core::units::{Quantity, Unit};
//!
//! let mut settings = BrewSettings::default();
//! settings.display.gravity = Unit::SpecificGravity;
//!
//! let og = Quantity::plato(12.0);
//! assert_eq!(settings.display(&og).unwrap(), "1.048 SG");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BrewError, BrewResult};
use crate::units::{Quantity, Unit, UnitFamily};

/// Preferred display unit for each quantity family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayUnits {
    pub volume: Unit,
    pub mass: Unit,
    /// Hop additions are small enough to want their own unit
    pub hop_mass: Unit,
    pub temperature: Unit,
    pub gravity: Unit,
    pub color: Unit,
}

impl Default for DisplayUnits {
    fn default() -> Self {
        DisplayUnits {
            volume: Unit::Liter,
            mass: Unit::Kilogram,
            hop_mass: Unit::Gram,
            temperature: Unit::Celsius,
            gravity: Unit::Plato,
            color: Unit::Ebc,
        }
    }
}

impl DisplayUnits {
    /// US customary preset
    pub fn us_customary() -> Self {
        DisplayUnits {
            volume: Unit::UsGallon,
            mass: Unit::Pound,
            hop_mass: Unit::Ounce,
            temperature: Unit::Fahrenheit,
            gravity: Unit::SpecificGravity,
            color: Unit::Srm,
        }
    }
}

/// Brewery-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrewSettings {
    pub display: DisplayUnits,

    /// Mash efficiency given to new recipes (%)
    pub default_mash_efficiency: f64,

    /// Boil time given to new recipes (minutes)
    pub default_boil_time: u32,
}

impl Default for BrewSettings {
    fn default() -> Self {
        BrewSettings {
            display: DisplayUnits::default(),
            default_mash_efficiency: 75.0,
            default_boil_time: 60,
        }
    }
}

impl BrewSettings {
    /// Parse settings from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> BrewResult<Self> {
        let settings: BrewSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Every display unit must belong to the family it is configured for.
    pub fn validate(&self) -> BrewResult<()> {
        let checks = [
            ("volume", self.display.volume, UnitFamily::Volume),
            ("mass", self.display.mass, UnitFamily::Mass),
            ("hop_mass", self.display.hop_mass, UnitFamily::Mass),
            ("temperature", self.display.temperature, UnitFamily::Temperature),
            ("gravity", self.display.gravity, UnitFamily::Gravity),
            ("color", self.display.color, UnitFamily::Color),
        ];
        for (field, unit, family) in checks {
            if unit.family() != family {
                return Err(BrewError::invalid_input(
                    format!("display.{field}"),
                    unit.name(),
                    format!("Expected a {} unit", family.display_name()),
                ));
            }
        }
        if !(0.0..=100.0).contains(&self.default_mash_efficiency) {
            return Err(BrewError::invalid_input(
                "default_mash_efficiency",
                self.default_mash_efficiency.to_string(),
                "Percentage must be between 0 and 100",
            ));
        }
        Ok(())
    }

    /// Display unit for a family (mass maps to `mass`, not `hop_mass`)
    pub fn unit_for(&self, family: UnitFamily) -> Unit {
        match family {
            UnitFamily::Volume => self.display.volume,
            UnitFamily::Mass => self.display.mass,
            UnitFamily::Temperature => self.display.temperature,
            UnitFamily::Gravity => self.display.gravity,
            UnitFamily::Color => self.display.color,
        }
    }

    /// Convert to the preferred unit, rounded for display
    pub fn to_display(&self, quantity: &Quantity) -> BrewResult<Quantity> {
        Ok(quantity.convert(self.unit_for(quantity.family()))?.rounded())
    }

    /// Format a quantity in the preferred unit
    pub fn display(&self, quantity: &Quantity) -> BrewResult<String> {
        Ok(quantity.convert(self.unit_for(quantity.family()))?.to_string())
    }

    /// Format a hop weight in the hop display unit
    pub fn display_hop_mass(&self, quantity: &Quantity) -> BrewResult<String> {
        Ok(quantity.convert(self.display.hop_mass)?.to_string())
    }
}
