//! # Bitterness Formulas
//!
//! Tinseth hop utilization and IBU estimation.
//!
//! ## Notation
//!
//! - `G` = Wort specific gravity during the boil
//! - `t` = Boil time of the addition (minutes)
//! - `α` = Alpha acid content (%)
//! - `W` = Hop weight (g)
//! - `V` = Wort volume (l)

/// Tinseth bigness factor: `1.65 × 0.000125^(G - 1)`
#[inline]
pub fn tinseth_bigness(og_sg: f64) -> f64 {
    1.65 * 0.000125_f64.powf(og_sg - 1.0)
}

/// Tinseth boil time factor: `(1 - e^(-0.04 t)) / 4.15`
#[inline]
pub fn tinseth_time_factor(time_min: f64) -> f64 {
    (1.0 - (-0.04 * time_min).exp()) / 4.15
}

/// Decimal alpha acid utilization (bigness × time factor)
#[inline]
pub fn tinseth_utilization(og_sg: f64, time_min: f64) -> f64 {
    tinseth_bigness(og_sg) * tinseth_time_factor(time_min)
}

/// IBU contributed by one hop addition (Tinseth).
///
/// # Formula
/// `IBU = U(G, t) × (α / 100 × W × 1000) / V`
///
/// # Arguments
/// * `og_sg` - Wort gravity (SG)
/// * `time_min` - Boil time (min)
/// * `alpha_pct` - Alpha acids (%)
/// * `weight_g` - Hop weight (g)
/// * `volume_l` - Wort volume (l)
///
/// # Returns
/// Bitterness in IBU (mg/l of isomerized alpha acid)
pub fn tinseth_ibu(og_sg: f64, time_min: f64, alpha_pct: f64, weight_g: f64, volume_l: f64) -> f64 {
    let alpha_mg_per_l = alpha_pct / 100.0 * weight_g * 1000.0 / volume_l;
    alpha_mg_per_l * tinseth_utilization(og_sg, time_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bigness_factor() {
        assert_abs_diff_eq!(tinseth_bigness(1.0), 1.65);
        assert_abs_diff_eq!(tinseth_bigness(1.050), 1.05276, epsilon = 1e-4);
    }

    #[test]
    fn test_time_factor() {
        assert_eq!(tinseth_time_factor(0.0), 0.0);
        assert_abs_diff_eq!(tinseth_time_factor(60.0), 0.21910, epsilon = 1e-4);
    }

    #[test]
    fn test_tinseth_ibu() {
        // 30 g of 5% AA boiled 60 min in 23 l of 1.050 wort
        let ibu = tinseth_ibu(1.050, 60.0, 5.0, 30.0, 23.0);
        assert_abs_diff_eq!(ibu, 15.043, epsilon = 1e-2);
    }

    #[test]
    fn test_higher_gravity_lowers_utilization() {
        assert!(tinseth_utilization(1.080, 60.0) < tinseth_utilization(1.040, 60.0));
    }
}
