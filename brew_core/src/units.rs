//! # Units and Quantities
//!
//! A [`Quantity`] is a magnitude tagged with a named [`Unit`]. Every unit
//! belongs to exactly one [`UnitFamily`], and conversion or arithmetic across
//! families is rejected with [`BrewError::UnitFamilyMismatch`].
//!
//! ## Conversion Tables
//!
//! | Family      | Base      | Kind                                   |
//! |-------------|-----------|----------------------------------------|
//! | Volume      | liter     | linear factor                          |
//! | Mass        | kilogram  | linear factor                          |
//! | Temperature | Celsius   | affine                                 |
//! | Gravity     | Plato     | polynomial (Plato ↔ SG, not symmetric) |
//! | Color       | SRM       | linear (EBC = SRM × 1.968503937)       |
//!
//! The two gravity formulas are published approximations of each other, not
//! exact inverses. Converting SG → Plato → SG drifts by up to ~1e-2 °P over
//! the brewing range; that drift is expected.
//!
//! ## Example
//!
//! ```rust
//! use brew_core::units::{Quantity, Unit};
//!
//! let wort = Quantity::liters(20.0);
//! let in_gallons = wort.convert(Unit::UsGallon).unwrap();
//! assert!((in_gallons.magnitude - 5.2834).abs() < 1e-3);
//!
//! let total = wort.try_add(&Quantity::new(500.0, Unit::Milliliter)).unwrap();
//! assert_eq!(total.unit, Unit::Liter);
//! assert!((total.magnitude - 20.5).abs() < 1e-9);
//!
//! // Mass and volume never mix
//! assert!(wort.try_add(&Quantity::kilograms(1.0)).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{BrewError, BrewResult};

// ============================================================================
// Families
// ============================================================================

/// Physical dimension a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitFamily {
    Volume,
    Mass,
    Temperature,
    Gravity,
    Color,
}

impl UnitFamily {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitFamily::Volume => "volume",
            UnitFamily::Mass => "mass",
            UnitFamily::Temperature => "temperature",
            UnitFamily::Gravity => "gravity",
            UnitFamily::Color => "color",
        }
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Units
// ============================================================================

/// Liters per US gallon
pub const LITERS_PER_US_GALLON: f64 = 3.785411784;

/// EBC units per SRM unit
pub const EBC_PER_SRM: f64 = 1.968503937;

/// Named unit. Serializes as its canonical name (`"l"`, `"kg"`, `"plato"`, ...)
/// and deserializes from any alias in the alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    // Volume
    Liter,
    Milliliter,
    Hectoliter,
    UsGallon,
    UsQuart,
    UsPint,
    UsFluidOunce,
    ImperialGallon,
    // Mass
    Kilogram,
    Gram,
    Milligram,
    Pound,
    Ounce,
    // Temperature
    Celsius,
    Fahrenheit,
    Kelvin,
    // Gravity
    Plato,
    SpecificGravity,
    // Color
    Ebc,
    Srm,
}

impl Unit {
    /// Every supported unit
    pub const ALL: &'static [Unit] = &[
        Unit::Liter,
        Unit::Milliliter,
        Unit::Hectoliter,
        Unit::UsGallon,
        Unit::UsQuart,
        Unit::UsPint,
        Unit::UsFluidOunce,
        Unit::ImperialGallon,
        Unit::Kilogram,
        Unit::Gram,
        Unit::Milligram,
        Unit::Pound,
        Unit::Ounce,
        Unit::Celsius,
        Unit::Fahrenheit,
        Unit::Kelvin,
        Unit::Plato,
        Unit::SpecificGravity,
        Unit::Ebc,
        Unit::Srm,
    ];

    /// Family this unit belongs to
    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Liter
            | Unit::Milliliter
            | Unit::Hectoliter
            | Unit::UsGallon
            | Unit::UsQuart
            | Unit::UsPint
            | Unit::UsFluidOunce
            | Unit::ImperialGallon => UnitFamily::Volume,
            Unit::Kilogram | Unit::Gram | Unit::Milligram | Unit::Pound | Unit::Ounce => UnitFamily::Mass,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => UnitFamily::Temperature,
            Unit::Plato | Unit::SpecificGravity => UnitFamily::Gravity,
            Unit::Ebc | Unit::Srm => UnitFamily::Color,
        }
    }

    /// Canonical name used in JSON
    pub fn name(&self) -> &'static str {
        match self {
            Unit::Liter => "l",
            Unit::Milliliter => "ml",
            Unit::Hectoliter => "hl",
            Unit::UsGallon => "gal",
            Unit::UsQuart => "qt",
            Unit::UsPint => "pt",
            Unit::UsFluidOunce => "fl_oz",
            Unit::ImperialGallon => "imp_gal",
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Milligram => "mg",
            Unit::Pound => "lb",
            Unit::Ounce => "oz",
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
            Unit::Kelvin => "kelvin",
            Unit::Plato => "plato",
            Unit::SpecificGravity => "sg",
            Unit::Ebc => "ebc",
            Unit::Srm => "srm",
        }
    }

    /// Symbol used when displaying a value
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Liter => "l",
            Unit::Milliliter => "ml",
            Unit::Hectoliter => "hl",
            Unit::UsGallon => "gal",
            Unit::UsQuart => "qt",
            Unit::UsPint => "pt",
            Unit::UsFluidOunce => "fl oz",
            Unit::ImperialGallon => "imp gal",
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Milligram => "mg",
            Unit::Pound => "lb",
            Unit::Ounce => "oz",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kelvin => "K",
            Unit::Plato => "°P",
            Unit::SpecificGravity => "SG",
            Unit::Ebc => "EBC",
            Unit::Srm => "SRM",
        }
    }

    /// Decimal places shown when a value in this unit is displayed or rounded
    pub fn display_precision(&self) -> usize {
        match self {
            Unit::SpecificGravity => 3,
            Unit::Milliliter | Unit::Milligram | Unit::Gram => 0,
            Unit::Plato | Unit::Ebc | Unit::Srm => 1,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => 1,
            _ => 2,
        }
    }

    /// Linear factor to the family base unit, for linear families only
    fn linear_factor(&self) -> Option<f64> {
        let factor = match self {
            Unit::Liter => 1.0,
            Unit::Milliliter => 0.001,
            Unit::Hectoliter => 100.0,
            Unit::UsGallon => LITERS_PER_US_GALLON,
            Unit::UsQuart => LITERS_PER_US_GALLON / 4.0,
            Unit::UsPint => LITERS_PER_US_GALLON / 8.0,
            Unit::UsFluidOunce => LITERS_PER_US_GALLON / 128.0,
            Unit::ImperialGallon => 4.54609,
            Unit::Kilogram => 1.0,
            Unit::Gram => 0.001,
            Unit::Milligram => 0.000001,
            Unit::Pound => 0.45359237,
            Unit::Ounce => 0.45359237 / 16.0,
            Unit::Srm => 1.0,
            Unit::Ebc => 1.0 / EBC_PER_SRM,
            _ => return None,
        };
        Some(factor)
    }

    /// Express `magnitude` (in this unit) in the family base unit
    fn to_base(&self, magnitude: f64) -> f64 {
        if let Some(factor) = self.linear_factor() {
            return magnitude * factor;
        }
        match self {
            Unit::Fahrenheit => (magnitude - 32.0) * 5.0 / 9.0,
            Unit::Kelvin => magnitude - 273.15,
            Unit::SpecificGravity => sg_to_plato(magnitude),
            // Celsius and Plato are bases
            _ => magnitude,
        }
    }

    /// Express a base-unit `magnitude` in this unit
    fn from_base(&self, magnitude: f64) -> f64 {
        if let Some(factor) = self.linear_factor() {
            return magnitude / factor;
        }
        match self {
            Unit::Fahrenheit => magnitude * 9.0 / 5.0 + 32.0,
            Unit::Kelvin => magnitude + 273.15,
            Unit::SpecificGravity => plato_to_sg(magnitude),
            _ => magnitude,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unit name and alias lookup, keyed lowercase
static UNIT_ALIASES: Lazy<HashMap<&'static str, Unit>> = Lazy::new(|| {
    let aliases: &[(&str, Unit)] = &[
        ("liter", Unit::Liter),
        ("litre", Unit::Liter),
        ("liters", Unit::Liter),
        ("litres", Unit::Liter),
        ("milliliter", Unit::Milliliter),
        ("millilitre", Unit::Milliliter),
        ("hectoliter", Unit::Hectoliter),
        ("hectolitre", Unit::Hectoliter),
        ("us_gallon", Unit::UsGallon),
        ("gallon", Unit::UsGallon),
        ("gallons", Unit::UsGallon),
        ("quart", Unit::UsQuart),
        ("pint", Unit::UsPint),
        ("fl oz", Unit::UsFluidOunce),
        ("imperial_gallon", Unit::ImperialGallon),
        ("kilogram", Unit::Kilogram),
        ("kilograms", Unit::Kilogram),
        ("gram", Unit::Gram),
        ("grams", Unit::Gram),
        ("milligram", Unit::Milligram),
        ("pound", Unit::Pound),
        ("pounds", Unit::Pound),
        ("lbs", Unit::Pound),
        ("ounce", Unit::Ounce),
        ("ounces", Unit::Ounce),
        ("c", Unit::Celsius),
        ("°c", Unit::Celsius),
        ("f", Unit::Fahrenheit),
        ("°f", Unit::Fahrenheit),
        ("k", Unit::Kelvin),
        ("°p", Unit::Plato),
        ("p", Unit::Plato),
        ("degrees_plato", Unit::Plato),
        ("specific_gravity", Unit::SpecificGravity),
    ];

    let mut map: HashMap<&'static str, Unit> = Unit::ALL.iter().map(|u| (u.name(), *u)).collect();
    map.extend(aliases.iter().copied());
    map
});

impl FromStr for Unit {
    type Err = BrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        UNIT_ALIASES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| BrewError::unknown_unit(s))
    }
}

impl TryFrom<String> for Unit {
    type Error = BrewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.name().to_string()
    }
}

// ============================================================================
// Gravity scale conversions
// ============================================================================

/// Convert degrees Plato to specific gravity.
///
/// `SG = P / (258.6 - (P / 258.2) × 227.1) + 1`
pub fn plato_to_sg(plato: f64) -> f64 {
    plato / (258.6 - (plato / 258.2) * 227.1) + 1.0
}

/// Convert specific gravity to degrees Plato.
///
/// `P = ((182.4601 × SG - 775.6821) × SG + 1262.7794) × SG - 669.5622`
///
/// Not the exact inverse of [`plato_to_sg`]; both are kept as published.
pub fn sg_to_plato(sg: f64) -> f64 {
    ((182.4601 * sg - 775.6821) * sg + 1262.7794) * sg - 669.5622
}

// ============================================================================
// Quantity
// ============================================================================

/// A magnitude in a named unit.
///
/// ## JSON Example
///
/// ```json
/// { "magnitude": 23.0, "unit": "l" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub magnitude: f64,
    pub unit: Unit,
}

macro_rules! quantity_constructors {
    ($($name:ident => $unit:expr),* $(,)?) => {
        impl Quantity {
            $(
                #[doc = concat!("Quantity in `", stringify!($unit), "`")]
                pub fn $name(magnitude: f64) -> Self {
                    Self::new(magnitude, $unit)
                }
            )*
        }
    };
}

quantity_constructors! {
    liters => Unit::Liter,
    kilograms => Unit::Kilogram,
    grams => Unit::Gram,
    celsius => Unit::Celsius,
    plato => Unit::Plato,
    sg => Unit::SpecificGravity,
    srm => Unit::Srm,
    ebc => Unit::Ebc,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: Unit) -> Self {
        Quantity { magnitude, unit }
    }

    /// Zero in the given unit
    pub fn zero(unit: Unit) -> Self {
        Quantity::new(0.0, unit)
    }

    pub fn family(&self) -> UnitFamily {
        self.unit.family()
    }

    /// Convert to another unit of the same family.
    ///
    /// Converting to the unit the quantity is already in returns it untouched,
    /// so gravity values never pick up Plato ↔ SG drift for free.
    pub fn convert(&self, target: Unit) -> BrewResult<Quantity> {
        if target.family() != self.family() {
            return Err(BrewError::unit_family_mismatch(self.unit.name(), target.name()));
        }
        if target == self.unit {
            return Ok(*self);
        }
        let base = self.unit.to_base(self.magnitude);
        Ok(Quantity::new(target.from_base(base), target))
    }

    /// Magnitude expressed in `unit`
    pub fn value_in(&self, unit: Unit) -> BrewResult<f64> {
        Ok(self.convert(unit)?.magnitude)
    }

    /// Sum with another quantity of the same family; the result keeps this
    /// quantity's unit.
    pub fn try_add(&self, other: &Quantity) -> BrewResult<Quantity> {
        let rhs = other.convert(self.unit)?;
        Ok(Quantity::new(self.magnitude + rhs.magnitude, self.unit))
    }

    /// Difference with another quantity of the same family
    pub fn try_sub(&self, other: &Quantity) -> BrewResult<Quantity> {
        let rhs = other.convert(self.unit)?;
        Ok(Quantity::new(self.magnitude - rhs.magnitude, self.unit))
    }

    /// Round the magnitude to the unit's display precision
    pub fn rounded(&self) -> Quantity {
        let scale = 10f64.powi(self.unit.display_precision() as i32);
        Quantity::new((self.magnitude * scale).round() / scale, self.unit)
    }
}

impl Mul<f64> for Quantity {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Quantity::new(self.magnitude * rhs, self.unit)
    }
}

impl Div<f64> for Quantity {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Quantity::new(self.magnitude / rhs, self.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.unit.display_precision(),
            self.magnitude,
            self.unit.symbol()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_liters_to_gallons() {
        let q = Quantity::liters(LITERS_PER_US_GALLON * 5.0);
        let gal = q.convert(Unit::UsGallon).unwrap();
        assert_relative_eq!(gal.magnitude, 5.0, epsilon = 1e-12);
        assert_eq!(gal.unit, Unit::UsGallon);
    }

    #[test]
    fn test_temperature_affine() {
        let boiling = Quantity::celsius(100.0);
        assert_relative_eq!(boiling.value_in(Unit::Fahrenheit).unwrap(), 212.0, epsilon = 1e-9);
        assert_relative_eq!(boiling.value_in(Unit::Kelvin).unwrap(), 373.15, epsilon = 1e-9);

        let mash = Quantity::new(152.0, Unit::Fahrenheit);
        assert_relative_eq!(mash.value_in(Unit::Celsius).unwrap(), 66.6667, epsilon = 1e-4);
    }

    #[test]
    fn test_ebc_to_srm() {
        let color = Quantity::ebc(20.0);
        assert_relative_eq!(color.value_in(Unit::Srm).unwrap(), 20.0 / 1.968503937, epsilon = 1e-12);
        assert_relative_eq!(Quantity::srm(10.0).value_in(Unit::Ebc).unwrap(), 19.68503937, epsilon = 1e-9);
    }

    #[test]
    fn test_gravity_formulas_verbatim() {
        // 12 °P ≈ 1.048 SG
        assert_relative_eq!(plato_to_sg(12.0), 1.048378, epsilon = 1e-6);
        assert_relative_eq!(sg_to_plato(1.050), 12.387028, epsilon = 1e-6);
        assert_relative_eq!(plato_to_sg(0.0), 1.0);
        // Pure water does not map exactly to 0 °P; the cubic is kept as published
        assert_relative_eq!(sg_to_plato(1.0), -0.0048, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip_linear_families() {
        for family_units in [
            &Unit::ALL[0..8],
            &Unit::ALL[8..13],
            &Unit::ALL[13..16],
            &Unit::ALL[18..20],
        ] {
            for &u1 in family_units {
                for &u2 in family_units {
                    let q = Quantity::new(17.25, u1);
                    let back = q.convert(u2).unwrap().convert(u1).unwrap();
                    assert_relative_eq!(back.magnitude, q.magnitude, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_gravity_is_approximate() {
        let mut plato = 0.0;
        while plato <= 25.0 {
            let q = Quantity::plato(plato);
            let back = q.convert(Unit::SpecificGravity).unwrap().convert(Unit::Plato).unwrap();
            assert!((back.magnitude - plato).abs() < 1e-2, "drift too large at {plato} °P");
            plato += 0.5;
        }
    }

    #[test]
    fn test_family_mismatch() {
        let err = Quantity::kilograms(1.0).convert(Unit::Liter).unwrap_err();
        assert_eq!(err.error_code(), "UNIT_FAMILY_MISMATCH");
        assert!(Quantity::plato(12.0).try_add(&Quantity::srm(4.0)).is_err());
    }

    #[test]
    fn test_add_keeps_left_unit() {
        let a = Quantity::kilograms(1.0);
        let b = Quantity::grams(250.0);
        let sum = a.try_add(&b).unwrap();
        assert_eq!(sum.unit, Unit::Kilogram);
        assert_relative_eq!(sum.magnitude, 1.25);

        let sum = b.try_add(&a).unwrap();
        assert_eq!(sum.unit, Unit::Gram);
        assert_relative_eq!(sum.magnitude, 1250.0);

        assert_relative_eq!(a.try_sub(&b).unwrap().magnitude, 0.75);
    }

    #[test]
    fn test_scalar_arithmetic() {
        let v = Quantity::liters(20.0);
        assert_eq!((v * 1.1).unit, Unit::Liter);
        assert_relative_eq!((v * 1.1).magnitude, 22.0);
        assert_relative_eq!((v / 4.0).magnitude, 5.0);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("L".parse::<Unit>().unwrap(), Unit::Liter);
        assert_eq!("litres".parse::<Unit>().unwrap(), Unit::Liter);
        assert_eq!("°P".parse::<Unit>().unwrap(), Unit::Plato);
        assert_eq!("SG".parse::<Unit>().unwrap(), Unit::SpecificGravity);
        assert_eq!("lbs".parse::<Unit>().unwrap(), Unit::Pound);
        assert!("furlong".parse::<Unit>().is_err());
    }

    #[test]
    fn test_display_and_rounding() {
        assert_eq!(Quantity::liters(23.0).to_string(), "23.00 l");
        assert_eq!(Quantity::sg(1.05063).to_string(), "1.051 SG");
        assert_eq!(Quantity::plato(12.536).to_string(), "12.5 °P");
        assert_relative_eq!(Quantity::sg(1.05063).rounded().magnitude, 1.051);
    }

    #[test]
    fn test_serialization() {
        let q = Quantity::liters(23.0);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, r#"{"magnitude":23.0,"unit":"l"}"#);

        let parsed: Quantity = serde_json::from_str(r#"{"magnitude":5.0,"unit":"gallons"}"#).unwrap();
        assert_eq!(parsed.unit, Unit::UsGallon);

        assert!(serde_json::from_str::<Quantity>(r#"{"magnitude":5.0,"unit":"cubits"}"#).is_err());
    }
}
