//! # Alcohol and Nutrition Formulas
//!
//! Alcohol content, apparent attenuation, real extract and calories from the
//! original and final specific gravities.
//!
//! The formulas have poles (`OG = 1.775` for ABV, `OG = 1` for attenuation).
//! Inputs at or past a pole return [`BrewError::InvalidGravityRange`] instead
//! of an infinite or NaN value.

use crate::errors::{BrewError, BrewResult};
use crate::units::sg_to_plato;

/// Milliliters in a 12 US fl oz serving
const TWELVE_OUNCES_ML: f64 = 354.8823;

/// Final step of the calorie chain
const CALORIE_SCALE: f64 = 5.0;

fn ensure_finite(formula: &str, gravity: f64) -> BrewResult<()> {
    if !gravity.is_finite() {
        return Err(BrewError::invalid_gravity(formula, gravity, "gravity must be a finite number"));
    }
    Ok(())
}

/// Alcohol by volume (%).
///
/// # Formula
/// `ABV = 76.08 × (OG - FG) / (1.775 - OG) × (FG / 0.794)`
pub fn abv(og_sg: f64, fg_sg: f64) -> BrewResult<f64> {
    ensure_finite("abv", og_sg)?;
    ensure_finite("abv", fg_sg)?;
    if og_sg >= 1.775 {
        return Err(BrewError::invalid_gravity(
            "abv",
            og_sg,
            "original gravity must be below 1.775",
        ));
    }
    Ok(76.08 * (og_sg - fg_sg) / (1.775 - og_sg) * (fg_sg / 0.794))
}

/// Apparent attenuation (%).
///
/// `AA = 100 × (OG - FG) / (OG - 1)`
pub fn attenuation(og_sg: f64, fg_sg: f64) -> BrewResult<f64> {
    ensure_finite("attenuation", og_sg)?;
    ensure_finite("attenuation", fg_sg)?;
    if og_sg <= 1.0 {
        return Err(BrewError::invalid_gravity(
            "attenuation",
            og_sg,
            "original gravity must be above 1.000",
        ));
    }
    Ok(100.0 * (og_sg - fg_sg) / (og_sg - 1.0))
}

/// Alcohol by weight (%): `ABW = 0.79 × ABV / FG`
pub fn alcohol_by_weight(og_sg: f64, fg_sg: f64) -> BrewResult<f64> {
    if fg_sg <= 0.0 {
        return Err(BrewError::invalid_gravity(
            "alcohol_by_weight",
            fg_sg,
            "final gravity must be positive",
        ));
    }
    Ok(0.79 * abv(og_sg, fg_sg)? / fg_sg)
}

/// Real extract (°P): `RE = 0.1808 × OE + 0.8192 × AE`
pub fn real_extract(og_sg: f64, fg_sg: f64) -> f64 {
    0.1808 * sg_to_plato(og_sg) + 0.8192 * sg_to_plato(fg_sg)
}

/// Calories in a 12 oz serving.
///
/// `kcal = (6.9 × ABW + 4.0 × (RE - 0.1)) × FG × 3.55`
pub fn calories_per_12oz(og_sg: f64, fg_sg: f64) -> BrewResult<f64> {
    let abw = alcohol_by_weight(og_sg, fg_sg)?;
    let re = real_extract(og_sg, fg_sg);
    Ok((6.9 * abw + 4.0 * (re - 0.1)) * fg_sg * 3.55)
}

/// Calories rescaled from the 12 oz figure.
///
/// `kcal = kcal_12oz / 354.8823 × 100 × 5`
///
/// The full chain is kept as published, including the final × 5.
pub fn calories_per_100ml(og_sg: f64, fg_sg: f64) -> BrewResult<f64> {
    Ok(calories_per_12oz(og_sg, fg_sg)? / TWELVE_OUNCES_ML * 100.0 * CALORIE_SCALE)
}
