//! Yeast strains.

use serde::{Deserialize, Serialize};

/// Attenuation assumed when a strain has none on record (%)
pub const DEFAULT_YEAST_ATTENUATION: f64 = 75.0;

fn default_attenuation() -> f64 {
    DEFAULT_YEAST_ATTENUATION
}

/// A yeast line of a recipe.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Safale US-05", "attenuation": 81.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yeast {
    pub name: String,

    /// Expected apparent attenuation (%)
    #[serde(default = "default_attenuation")]
    pub attenuation: f64,
}

impl Yeast {
    pub fn new(name: impl Into<String>, attenuation: f64) -> Self {
        Yeast {
            name: name.into(),
            attenuation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attenuation() {
        let yeast: Yeast = serde_json::from_str(r#"{ "name": "House strain" }"#).unwrap();
        assert_eq!(yeast.attenuation, DEFAULT_YEAST_ATTENUATION);
    }
}
