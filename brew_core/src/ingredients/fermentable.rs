//! Fermentable ingredients (malts, extracts, sugars, adjuncts).

use serde::{Deserialize, Serialize};

use crate::equations::grain_sugar;
use crate::errors::{BrewError, BrewResult};
use crate::units::{Quantity, Unit, UnitFamily};

use super::{check_non_negative, check_percent};

/// Kind of fermentable. Only `Grain` is subject to mash efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FermentableType {
    Grain,
    Adjunct,
    Extract,
    DryExtract,
    Sugar,
    Fruit,
}

/// Point in the process the fermentable is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FermentableUse {
    #[default]
    Mashing,
    Boil,
    Fermentation,
}

/// A fermentable line of a recipe.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Pale Ale Malt",
///   "type": "GRAIN",
///   "color": { "magnitude": 6.0, "unit": "ebc" },
///   "extraction": 80.0,
///   "amount": { "magnitude": 5.0, "unit": "kg" },
///   "use": "MASHING"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fermentable {
    pub name: String,

    #[serde(rename = "type")]
    pub fermentable_type: FermentableType,

    /// Color (EBC or SRM)
    pub color: Quantity,

    /// Extract yield (%)
    pub extraction: f64,

    /// Weight
    pub amount: Quantity,

    #[serde(rename = "use", default)]
    pub usage: FermentableUse,
}

impl Fermentable {
    /// Mashed grain with amount in kg and color in SRM
    pub fn grain(name: impl Into<String>, amount_kg: f64, extraction: f64, color_srm: f64) -> Self {
        Fermentable {
            name: name.into(),
            fermentable_type: FermentableType::Grain,
            color: Quantity::srm(color_srm),
            extraction,
            amount: Quantity::kilograms(amount_kg),
            usage: FermentableUse::Mashing,
        }
    }

    /// Non-grain fermentable added to the boil
    pub fn other(
        name: impl Into<String>,
        fermentable_type: FermentableType,
        amount_kg: f64,
        extraction: f64,
        color_srm: f64,
    ) -> Self {
        Fermentable {
            name: name.into(),
            fermentable_type,
            color: Quantity::srm(color_srm),
            extraction,
            amount: Quantity::kilograms(amount_kg),
            usage: FermentableUse::Boil,
        }
    }

    pub fn is_grain(&self) -> bool {
        self.fermentable_type == FermentableType::Grain
    }

    pub fn amount_kg(&self) -> BrewResult<f64> {
        self.amount.value_in(Unit::Kilogram)
    }

    pub fn color_srm(&self) -> BrewResult<f64> {
        self.color.value_in(Unit::Srm)
    }

    /// Extractable sugar (kg)
    pub fn sugar_kg(&self) -> BrewResult<f64> {
        Ok(grain_sugar(self.amount_kg()?, self.extraction))
    }

    /// Validate field ranges and unit families.
    pub fn validate(&self) -> BrewResult<()> {
        if self.amount.family() != UnitFamily::Mass {
            return Err(BrewError::unit_family_mismatch(self.amount.unit.name(), "kg"));
        }
        if self.color.family() != UnitFamily::Color {
            return Err(BrewError::unit_family_mismatch(self.color.unit.name(), "srm"));
        }
        check_percent("extraction", self.extraction)?;
        check_non_negative("amount", self.amount.magnitude)?;
        check_non_negative("color", self.color.magnitude)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sugar_from_grams() {
        let mut malt = Fermentable::grain("Munich", 0.0, 80.0, 9.0);
        malt.amount = Quantity::grams(2500.0);
        assert!((malt.sugar_kg().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_in_ebc() {
        let mut malt = Fermentable::grain("Crystal", 0.3, 75.0, 0.0);
        malt.color = Quantity::ebc(120.0);
        assert!((malt.color_srm().unwrap() - 60.96).abs() < 1e-2);
    }

    #[test]
    fn test_validate_rejects_volume_amount() {
        let mut malt = Fermentable::grain("Pale", 5.0, 80.0, 3.0);
        malt.amount = Quantity::liters(5.0);
        assert_eq!(malt.validate().unwrap_err().error_code(), "UNIT_FAMILY_MISMATCH");
    }

    #[test]
    fn test_validate_extraction_range() {
        let malt = Fermentable::grain("Pale", 5.0, 104.0, 3.0);
        assert_eq!(malt.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "name": "Cane sugar",
            "type": "SUGAR",
            "color": { "magnitude": 0.0, "unit": "ebc" },
            "extraction": 100.0,
            "amount": { "magnitude": 500.0, "unit": "g" }
        }"#;
        let sugar: Fermentable = serde_json::from_str(json).unwrap();
        assert!(!sugar.is_grain());
        assert_eq!(sugar.usage, FermentableUse::Mashing);
        assert!((sugar.sugar_kg().unwrap() - 0.5).abs() < 1e-12);
    }
}
