//! # Ingredients
//!
//! Fermentables, hops and yeasts as supplied by the catalog layer. The
//! calculator only reads them; every derived number is a pure function of
//! the current field values.
//!
//! ## Example
//!
//! ```rust
//! use brew_core::ingredients::{Fermentable, Hop, Yeast};
//!
//! let malt = Fermentable::grain("Pilsner", 5.0, 80.0, 1.8);
//! let bittering = Hop::boil("Magnum", 25.0, 12.5, 60.0);
//! let yeast = Yeast::new("US-05", 81.0);
//!
//! assert!(malt.is_grain());
//! assert!(bittering.contributes_bitterness());
//! assert_eq!(yeast.attenuation, 81.0);
//! ```

pub mod fermentable;
pub mod hop;
pub mod yeast;

pub use fermentable::{Fermentable, FermentableType, FermentableUse};
pub use hop::{Hop, HopTimeUnit, HopUse};
pub use yeast::{Yeast, DEFAULT_YEAST_ATTENUATION};

use crate::errors::{BrewError, BrewResult};

/// Check a percentage field lies in 0..=100
pub(crate) fn check_percent(field: &str, value: f64) -> BrewResult<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(BrewError::invalid_input(
            field,
            value.to_string(),
            "Percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

/// Check a value is not negative (and is a number)
pub(crate) fn check_non_negative(field: &str, value: f64) -> BrewResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(BrewError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_percent() {
        assert!(check_percent("extraction", 0.0).is_ok());
        assert!(check_percent("extraction", 100.0).is_ok());
        assert!(check_percent("extraction", 100.1).is_err());
        assert!(check_percent("extraction", -1.0).is_err());
        assert!(check_percent("extraction", f64::NAN).is_err());
    }

    #[test]
    fn test_check_non_negative() {
        assert!(check_non_negative("amount", 0.0).is_ok());
        assert!(check_non_negative("amount", -0.5).is_err());
    }
}
