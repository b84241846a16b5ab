//! # Equation Registry
//!
//! Central registry of every brewing formula the engine applies. Each
//! equation carries its plain-text formula, variables, literature reference
//! and the function implementing it, so a brewer can audit any number the
//! calculator produces.
//!
//! ## Usage
//!
//! ```rust
//! use brew_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::TinsethIbu);
//!
//! let meta = Equation::TinsethIbu.metadata();
//! assert_eq!(meta.source_function, "tinseth_ibu");
//! assert_eq!(tracker.unique_equations(), vec![Equation::TinsethIbu]);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Published source of an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// Glenn Tinseth, hop utilization model
    Tinseth,
    /// Daniel Morey, approximating beer color
    Morey,
    /// Michael L. Hall, "Brew by the Numbers", Zymurgy (1995)
    Hall,
    /// Balling extract relations
    Balling,
    /// ASBC Methods of Analysis
    Asbc,
    /// Mass balance, no specific publication
    MassBalance,
}

impl Reference {
    /// Format the reference for display
    pub fn citation(&self) -> &'static str {
        match self {
            Reference::Tinseth => "Tinseth, G. - Hop utilization and IBU estimation",
            Reference::Morey => "Morey, D. - Approximating Beer Color",
            Reference::Hall => "Hall, M. L. - Brew by the Numbers, Zymurgy (1995)",
            Reference::Balling => "Balling - Original and real extract relations",
            Reference::Asbc => "ASBC Methods of Analysis",
            Reference::MassBalance => "Mass balance",
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

/// Grouping used in the generated reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    Gravity,
    Color,
    Bitterness,
    Alcohol,
    Nutrition,
}

impl EquationCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Gravity => "Gravity",
            EquationCategory::Color => "Color",
            EquationCategory::Bitterness => "Bitterness",
            EquationCategory::Alcohol => "Alcohol",
            EquationCategory::Nutrition => "Nutrition",
        }
    }

    /// Sort order in the generated document (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::Gravity => 1,
            EquationCategory::Color => 2,
            EquationCategory::Bitterness => 3,
            EquationCategory::Alcohol => 4,
            EquationCategory::Nutrition => 5,
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

/// Complete metadata for one equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub formula_plain: &'static str,
    pub reference: Reference,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    pub source_function: &'static str,
}

/// Every formula used by the recipe calculator and the batch tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    GrainSugar,
    GravityContribution,
    PlatoToSg,
    SgToPlato,
    MaltColorUnits,
    MoreyColor,
    TinsethIbu,
    BitternessRatio,
    Abv,
    Attenuation,
    AlcoholByWeight,
    RealExtract,
    Calories,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::GrainSugar => EquationMetadata {
                name: "Fermentable Sugar Yield",
                description: "Extractable sugar of one fermentable from its laboratory yield",
                formula_plain: "sugar = amount * extraction / 100",
                reference: Reference::MassBalance,
                variables: vec![
                    Variable::new("amount", "Fermentable weight", "kg"),
                    Variable::new("extraction", "Extract yield", "%"),
                ],
                assumptions: vec!["Extraction is the dry-basis fine-grind yield"],
                category: EquationCategory::Gravity,
                source_module: "equations/gravity.rs",
                source_function: "grain_sugar",
            },

            Equation::GravityContribution => EquationMetadata {
                name: "Wort Gravity from Sugar Pools",
                description: "Plato gravity of grain and non-grain sugar pools dissolved in wort",
                formula_plain: "P = S / (V - S/145 + S/100), summed over the grain and non-grain pools",
                reference: Reference::MassBalance,
                variables: vec![
                    Variable::new("S", "Sugar pool × efficiency", "kg·%"),
                    Variable::new("V", "Wort volume", "l"),
                    Variable::new("P", "Gravity", "°P"),
                ],
                assumptions: vec![
                    "Grain pool scaled by mash efficiency",
                    "Non-grain pool scaled by 100 (fully soluble)",
                ],
                category: EquationCategory::Gravity,
                source_module: "equations/gravity.rs",
                source_function: "gravity_contribution",
            },

            Equation::PlatoToSg => EquationMetadata {
                name: "Plato to Specific Gravity",
                description: "Converts degrees Plato to specific gravity",
                formula_plain: "SG = P / (258.6 - (P / 258.2) * 227.1) + 1",
                reference: Reference::Asbc,
                variables: vec![Variable::new("P", "Gravity", "°P")],
                assumptions: vec!["Not the exact inverse of the SG to Plato polynomial"],
                category: EquationCategory::Gravity,
                source_module: "units.rs",
                source_function: "plato_to_sg",
            },

            Equation::SgToPlato => EquationMetadata {
                name: "Specific Gravity to Plato",
                description: "Converts specific gravity to degrees Plato",
                formula_plain: "P = ((182.4601 * SG - 775.6821) * SG + 1262.7794) * SG - 669.5622",
                reference: Reference::Asbc,
                variables: vec![Variable::new("SG", "Specific gravity", "-")],
                assumptions: vec!["Not the exact inverse of the Plato to SG formula"],
                category: EquationCategory::Gravity,
                source_module: "units.rs",
                source_function: "sg_to_plato",
            },

            Equation::MaltColorUnits => EquationMetadata {
                name: "Malt Color Units",
                description: "Color contribution of one fermentable before the Morey correction",
                formula_plain: "MCU = ((SRM + 0.76) / 1.3546 * W * 2.205) / (V * 0.264)",
                reference: Reference::Morey,
                variables: vec![
                    Variable::new("SRM", "Fermentable color", "SRM"),
                    Variable::new("W", "Fermentable weight", "kg"),
                    Variable::new("V", "Wort volume", "l"),
                ],
                assumptions: vec!["Color converted to Lovibond before weighting"],
                category: EquationCategory::Color,
                source_module: "equations/color.rs",
                source_function: "mcu",
            },

            Equation::MoreyColor => EquationMetadata {
                name: "Morey Equation",
                description: "Beer color from the summed malt color units",
                formula_plain: "SRM = 1.4922 * MCU^0.6859",
                reference: Reference::Morey,
                variables: vec![Variable::new("MCU", "Summed malt color units", "-")],
                assumptions: vec!["Valid below roughly 50 SRM"],
                category: EquationCategory::Color,
                source_module: "equations/color.rs",
                source_function: "morey_color",
            },

            Equation::TinsethIbu => EquationMetadata {
                name: "Tinseth IBU",
                description: "Bitterness contributed by one boil addition",
                formula_plain: "IBU = 1.65 * 0.000125^(G - 1) * (1 - e^(-0.04 t)) / 4.15 * (a / 100 * W * 1000) / V",
                reference: Reference::Tinseth,
                variables: vec![
                    Variable::new("G", "Wort gravity", "SG"),
                    Variable::new("t", "Boil time", "min"),
                    Variable::new("a", "Alpha acids", "%"),
                    Variable::new("W", "Hop weight", "g"),
                    Variable::new("V", "Wort volume", "l"),
                ],
                assumptions: vec!["Only boil and first wort additions contribute"],
                category: EquationCategory::Bitterness,
                source_module: "equations/bitterness.rs",
                source_function: "tinseth_ibu",
            },

            Equation::BitternessRatio => EquationMetadata {
                name: "Bitterness Ratio",
                description: "IBU per gravity point (BU:GU)",
                formula_plain: "BU:GU = IBU / ((SG - 1) * 1000)",
                reference: Reference::MassBalance,
                variables: vec![
                    Variable::new("IBU", "Bitterness", "IBU"),
                    Variable::new("SG", "Original gravity", "SG"),
                ],
                assumptions: vec!["Undefined for SG = 1.000"],
                category: EquationCategory::Bitterness,
                source_module: "calculations/recipe.rs",
                source_function: "bitterness_ratio",
            },

            Equation::Abv => EquationMetadata {
                name: "Alcohol by Volume",
                description: "Alcohol content from original and final gravity",
                formula_plain: "ABV = 76.08 * (OG - FG) / (1.775 - OG) * (FG / 0.794)",
                reference: Reference::Hall,
                variables: vec![
                    Variable::new("OG", "Original gravity", "SG"),
                    Variable::new("FG", "Final gravity", "SG"),
                ],
                assumptions: vec!["OG below 1.775"],
                category: EquationCategory::Alcohol,
                source_module: "equations/alcohol.rs",
                source_function: "abv",
            },

            Equation::Attenuation => EquationMetadata {
                name: "Apparent Attenuation",
                description: "Share of original extract apparently fermented",
                formula_plain: "AA = 100 * (OG - FG) / (OG - 1)",
                reference: Reference::Balling,
                variables: vec![
                    Variable::new("OG", "Original gravity", "SG"),
                    Variable::new("FG", "Final gravity", "SG"),
                ],
                assumptions: vec!["OG above 1.000"],
                category: EquationCategory::Alcohol,
                source_module: "equations/alcohol.rs",
                source_function: "attenuation",
            },

            Equation::AlcoholByWeight => EquationMetadata {
                name: "Alcohol by Weight",
                description: "Alcohol content by mass",
                formula_plain: "ABW = 0.79 * ABV / FG",
                reference: Reference::Asbc,
                variables: vec![
                    Variable::new("ABV", "Alcohol by volume", "%"),
                    Variable::new("FG", "Final gravity", "SG"),
                ],
                assumptions: vec![],
                category: EquationCategory::Alcohol,
                source_module: "equations/alcohol.rs",
                source_function: "alcohol_by_weight",
            },

            Equation::RealExtract => EquationMetadata {
                name: "Real Extract",
                description: "Extract remaining in the finished beer, corrected for alcohol",
                formula_plain: "RE = 0.1808 * OE + 0.8192 * AE",
                reference: Reference::Balling,
                variables: vec![
                    Variable::new("OE", "Original extract", "°P"),
                    Variable::new("AE", "Apparent extract", "°P"),
                ],
                assumptions: vec![],
                category: EquationCategory::Nutrition,
                source_module: "equations/alcohol.rs",
                source_function: "real_extract",
            },

            Equation::Calories => EquationMetadata {
                name: "Calories",
                description: "Energy content per 12 oz, rescaled to 100 ml, then scaled by 5",
                formula_plain: "kcal = (6.9 * ABW + 4.0 * (RE - 0.1)) * FG * 3.55 / 354.8823 * 100 * 5",
                reference: Reference::Asbc,
                variables: vec![
                    Variable::new("ABW", "Alcohol by weight", "%"),
                    Variable::new("RE", "Real extract", "°P"),
                    Variable::new("FG", "Final gravity", "SG"),
                ],
                assumptions: vec!["The final factor of 5 is part of the published chain"],
                category: EquationCategory::Nutrition,
                source_module: "equations/alcohol.rs",
                source_function: "calories_per_100ml",
            },
        }
    }

    /// All equations in a category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .copied()
            .filter(|eq| eq.metadata().category == category)
            .collect()
    }

    /// All categories in document order
    pub fn all_categories() -> Vec<EquationCategory> {
        let mut categories = vec![
            EquationCategory::Gravity,
            EquationCategory::Color,
            EquationCategory::Bitterness,
            EquationCategory::Alcohol,
            EquationCategory::Nutrition,
        ];
        categories.sort_by_key(|c| c.sort_order());
        categories
    }
}

/// Every registered equation
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::GrainSugar,
    Equation::GravityContribution,
    Equation::PlatoToSg,
    Equation::SgToPlato,
    Equation::MaltColorUnits,
    Equation::MoreyColor,
    Equation::TinsethIbu,
    Equation::BitternessRatio,
    Equation::Abv,
    Equation::Attenuation,
    Equation::AlcoholByWeight,
    Equation::RealExtract,
    Equation::Calories,
];

// ============================================================================
// Usage Tracking
// ============================================================================

/// Collector for the equations a calculation applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    applied: Vec<Equation>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation) {
        self.applied.push(equation);
    }

    /// Unique equations used, in first-use order
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.applied.iter().copied().filter(|e| seen.insert(*e)).collect()
    }
}

// ============================================================================
// Markdown Generation
// ============================================================================

/// Generate the equations reference document.
///
/// ```rust
/// use brew_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Brewlog Equations Reference"));
/// assert!(markdown.contains("Tinseth IBU"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(16_000);

    output.push_str(
        r#"# Brewlog Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

Every formula the recipe calculator and batch tracker apply, with its
reference and the function implementing it.

---

"#,
    );

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_equation_has_a_category_home() {
        let total: usize = Equation::all_categories()
            .into_iter()
            .map(|c| Equation::in_category(c).len())
            .sum();
        assert_eq!(total, ALL_EQUATIONS.len());
    }

    #[test]
    fn test_tracker_deduplicates() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::Abv);
        tracker.record(Equation::Abv);
        tracker.record(Equation::MoreyColor);
        assert_eq!(tracker.unique_equations(), vec![Equation::Abv, Equation::MoreyColor]);
    }

    #[test]
    fn test_markdown_lists_all_categories() {
        let markdown = generate_equations_markdown();
        for category in Equation::all_categories() {
            assert!(markdown.contains(&format!("## {}", category.display_name())));
        }
        assert!(markdown.contains("**Total Equations:** 13"));
    }
}
