//! # Color Formulas
//!
//! Malt color units and the Morey equation.

/// Convert SRM to degrees Lovibond.
///
/// `°L = (SRM + 0.76) / 1.3546`
#[inline]
pub fn srm_to_lovibond(color_srm: f64) -> f64 {
    (color_srm + 0.76) / 1.3546
}

/// Malt color units contributed by one fermentable.
///
/// # Formula
/// `MCU = (°L × W × 2.205) / (V × 0.264)`
///
/// Weight and volume are converted to pounds and US gallons inline.
///
/// # Arguments
/// * `color_srm` - Fermentable color (SRM)
/// * `weight_kg` - Fermentable weight (kg)
/// * `volume_l` - Wort volume (l)
#[inline]
pub fn mcu(color_srm: f64, weight_kg: f64, volume_l: f64) -> f64 {
    let lovibond = srm_to_lovibond(color_srm);
    (lovibond * weight_kg * 2.205) / (volume_l * 0.264)
}

/// Beer color from summed malt color units (Morey).
///
/// `SRM = 1.4922 × MCU^0.6859`
#[inline]
pub fn morey_color(mcu: f64) -> f64 {
    1.4922 * mcu.powf(0.6859)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lovibond() {
        assert_abs_diff_eq!(srm_to_lovibond(3.3), 2.99719, epsilon = 1e-4);
    }

    #[test]
    fn test_mcu() {
        // 5 kg of 3.3 SRM pale malt in 23 l
        let value = mcu(3.3, 5.0, 23.0);
        assert_abs_diff_eq!(value, 5.4420, epsilon = 1e-3);
    }

    #[test]
    fn test_morey() {
        assert_eq!(morey_color(0.0), 0.0);
        assert_abs_diff_eq!(morey_color(10.0), 7.2398, epsilon = 1e-3);
    }
}
