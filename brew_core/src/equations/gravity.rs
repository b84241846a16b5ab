//! # Gravity Formulas
//!
//! Sugar extraction and the wort gravity it produces.
//!
//! ## Notation
//!
//! - `S` = Sugar pool, in kilograms of extract multiplied by an efficiency
//!   percentage (so 4 kg at 75% is `S = 300`)
//! - `V` = Wort volume in liters
//! - `P` = Gravity in degrees Plato
//!
//! The pool form keeps the efficiency as a plain percentage: `S / 100` is the
//! dissolved extract in kg and `S / 145` the liters it displaces.

/// Density of dissolved extract used for displacement, scaled by 100 (kg/l)
const EXTRACT_DISPLACEMENT: f64 = 145.0;

/// Extract yield of a fermentable.
///
/// # Formula
/// `sugar = amount × extraction / 100`
///
/// # Arguments
/// * `amount_kg` - Fermentable weight (kg)
/// * `extraction_pct` - Laboratory extract yield (0-100)
///
/// # Returns
/// Extractable sugar (kg)
#[inline]
pub fn grain_sugar(amount_kg: f64, extraction_pct: f64) -> f64 {
    amount_kg * extraction_pct / 100.0
}

/// Gravity produced by one sugar pool dissolved to `volume_l`.
///
/// # Formula
/// `P = S / (V - S/145 + S/100)`
#[inline]
pub fn sugar_pool_plato(scaled_sugars: f64, volume_l: f64) -> f64 {
    scaled_sugars / (volume_l - scaled_sugars / EXTRACT_DISPLACEMENT + scaled_sugars / 100.0)
}

/// Wort gravity from the grain pool and the non-grain pool.
///
/// The grain pool must already be multiplied by the mash efficiency
/// percentage; the non-grain pool (extracts, sugars) by 100, since it
/// dissolves completely. The two pools are evaluated separately and their
/// Plato values summed.
///
/// # Arguments
/// * `grain_sugars_scaled` - Grain sugars (kg) × mash efficiency (%)
/// * `other_sugars_scaled` - Non-grain sugars (kg) × 100
/// * `volume_l` - Wort volume (l), must be positive
///
/// # Returns
/// Gravity in degrees Plato
pub fn gravity_contribution(grain_sugars_scaled: f64, other_sugars_scaled: f64, volume_l: f64) -> f64 {
    sugar_pool_plato(grain_sugars_scaled, volume_l) + sugar_pool_plato(other_sugars_scaled, volume_l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_grain_sugar() {
        assert_abs_diff_eq!(grain_sugar(5.0, 80.0), 4.0);
        assert_abs_diff_eq!(grain_sugar(0.0, 80.0), 0.0);
    }

    #[test]
    fn test_gravity_contribution_reference() {
        // 4 kg grain sugar at 75% efficiency into 23 l
        let plato = gravity_contribution(4.0 * 75.0, 0.0, 23.0);
        assert_abs_diff_eq!(plato, 12.536, epsilon = 1e-2);
    }

    #[test]
    fn test_empty_pools_are_zero() {
        assert_eq!(gravity_contribution(0.0, 0.0, 20.0), 0.0);
    }

    #[test]
    fn test_pools_are_summed_separately() {
        let grain = sugar_pool_plato(300.0, 23.0);
        let other = sugar_pool_plato(50.0, 23.0);
        assert_abs_diff_eq!(gravity_contribution(300.0, 50.0, 23.0), grain + other, epsilon = 1e-12);
    }
}
