//! # Recipe Calculation
//!
//! Derives every expected number of a recipe (volumes, gravities, color,
//! bitterness, alcohol) from its ingredient lists and batch parameters.
//!
//! ## Volume Basis
//!
//! ```text
//! expected beer volume
//!   + boil loss + trub loss + dry hopping loss  = initial volume (post-boil)
//! initial volume × (1 + evaporation rate)       = boil volume (pre-boil)
//! expected beer volume + trub + dry hop loss    = primary volume
//! expected beer volume + dry hop loss           = secondary volume
//! ```
//!
//! Pre-boil gravity dissolves the sugars in the boil volume; original gravity
//! uses the initial volume. Primary and secondary volumes are built from the
//! beer volume, not from the initial volume.
//!
//! ## Example
//!
//! ```rust
//! use brew_core::calculations::recipe::{calculate, Recipe};
//! use brew_core::ingredients::{Fermentable, Hop, Yeast};
//!
//! let mut recipe = Recipe::new("Pale Ale", 20.0);
//! recipe.boil_loss = 10.0;
//! recipe.trub_loss = 5.0;
//! recipe.evaporation_rate = 10.0;
//! recipe.fermentables.push(Fermentable::grain("Pale Malt", 5.0, 80.0, 3.0));
//! recipe.hops.push(Hop::boil("Cascade", 30.0, 5.5, 60.0));
//! recipe.yeasts.push(Yeast::new("US-05", 80.0));
//!
//! assert!((recipe.initial_volume().magnitude - 23.0).abs() < 1e-9);
//!
//! let report = calculate(&recipe).unwrap();
//! println!("OG: {}", report.gravity.as_ref().unwrap());
//! println!("ABV: {:.1}%", report.abv.as_ref().unwrap());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::equations::{self, Equation, EquationTracker};
use crate::errors::{BrewError, BrewResult};
use crate::ingredients::{check_percent, Fermentable, Hop, Yeast, DEFAULT_YEAST_ATTENUATION};
use crate::units::{Quantity, Unit, UnitFamily};

/// A beer recipe: batch parameters plus ingredient lists.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Pale Ale",
///   "expected_beer_volume": { "magnitude": 20.0, "unit": "l" },
///   "boil_time": 60,
///   "evaporation_rate": 10.0,
///   "boil_loss": 10.0,
///   "trub_loss": 5.0,
///   "dry_hopping_loss": 0.0,
///   "mash_efficiency": 75.0,
///   "fermentables": [],
///   "hops": [],
///   "yeasts": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,

    /// Beer volume packaged at the end
    pub expected_beer_volume: Quantity,

    /// Boil duration (minutes)
    pub boil_time: u32,

    /// Evaporation during the boil (% of initial volume)
    pub evaporation_rate: f64,

    /// Kettle losses (% of beer volume)
    pub boil_loss: f64,

    /// Losses to trub in primary (% of beer volume)
    pub trub_loss: f64,

    /// Losses absorbed by dry hops (% of beer volume)
    pub dry_hopping_loss: f64,

    /// Share of grain sugar extracted in the mash (%)
    pub mash_efficiency: f64,

    #[serde(default)]
    pub fermentables: Vec<Fermentable>,

    #[serde(default)]
    pub hops: Vec<Hop>,

    #[serde(default)]
    pub yeasts: Vec<Yeast>,
}

/// Volumes lost along the way, each a share of the expected beer volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossVolumes {
    pub boil: Quantity,
    pub trub: Quantity,
    pub dry_hop: Quantity,
}

impl LossVolumes {
    /// Sum of the three losses (all share one unit)
    pub fn total(&self) -> Quantity {
        Quantity::new(
            self.boil.magnitude + self.trub.magnitude + self.dry_hop.magnitude,
            self.boil.unit,
        )
    }
}

/// Bitterness of one qualifying hop addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopBitterness {
    pub name: String,
    pub boil_minutes: f64,
    pub ibu: f64,
}

impl Recipe {
    /// New recipe with common defaults (60 min boil, 75% efficiency, no
    /// losses) and `expected_beer_volume_l` liters of beer.
    pub fn new(name: impl Into<String>, expected_beer_volume_l: f64) -> Self {
        Recipe {
            name: name.into(),
            expected_beer_volume: Quantity::liters(expected_beer_volume_l),
            boil_time: 60,
            evaporation_rate: 0.0,
            boil_loss: 0.0,
            trub_loss: 0.0,
            dry_hopping_loss: 0.0,
            mash_efficiency: 75.0,
            fermentables: Vec::new(),
            hops: Vec::new(),
            yeasts: Vec::new(),
        }
    }

    /// Validate the construction contract: a positive volume, percentages in
    /// 0..=100 and well-formed ingredient lines.
    ///
    /// Yeast attenuation is not checked here; [`Recipe::max_attenuation`]
    /// ignores out-of-range strains.
    pub fn validate(&self) -> BrewResult<()> {
        if self.expected_beer_volume.family() != UnitFamily::Volume {
            return Err(BrewError::unit_family_mismatch(
                self.expected_beer_volume.unit.name(),
                Unit::Liter.name(),
            ));
        }
        let volume = self.expected_beer_volume.magnitude;
        if volume.is_nan() || volume <= 0.0 {
            return Err(BrewError::invalid_input(
                "expected_beer_volume",
                volume.to_string(),
                "Volume must be positive",
            ));
        }
        check_percent("evaporation_rate", self.evaporation_rate)?;
        check_percent("boil_loss", self.boil_loss)?;
        check_percent("trub_loss", self.trub_loss)?;
        check_percent("dry_hopping_loss", self.dry_hopping_loss)?;
        check_percent("mash_efficiency", self.mash_efficiency)?;

        for fermentable in &self.fermentables {
            fermentable.validate()?;
        }
        for hop in &self.hops {
            hop.validate()?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Volumes
    // ------------------------------------------------------------------

    fn share_of_beer_volume(&self, pct: f64) -> Quantity {
        self.expected_beer_volume * (pct / 100.0)
    }

    pub fn loss_volumes(&self) -> LossVolumes {
        LossVolumes {
            boil: self.share_of_beer_volume(self.boil_loss),
            trub: self.share_of_beer_volume(self.trub_loss),
            dry_hop: self.share_of_beer_volume(self.dry_hopping_loss),
        }
    }

    /// Post-boil volume: beer volume plus every loss
    pub fn initial_volume(&self) -> Quantity {
        let losses = self.loss_volumes().total();
        Quantity::new(
            self.expected_beer_volume.magnitude + losses.magnitude,
            self.expected_beer_volume.unit,
        )
    }

    /// Pre-boil volume: initial volume plus evaporation
    pub fn boil_volume(&self) -> Quantity {
        self.initial_volume() * (1.0 + self.evaporation_rate / 100.0)
    }

    /// Volume entering the primary fermenter
    pub fn primary_volume(&self) -> Quantity {
        let losses = self.loss_volumes();
        Quantity::new(
            self.expected_beer_volume.magnitude + losses.trub.magnitude + losses.dry_hop.magnitude,
            self.expected_beer_volume.unit,
        )
    }

    /// Volume entering the secondary fermenter
    pub fn secondary_volume(&self) -> Quantity {
        let losses = self.loss_volumes();
        Quantity::new(
            self.expected_beer_volume.magnitude + losses.dry_hop.magnitude,
            self.expected_beer_volume.unit,
        )
    }

    // ------------------------------------------------------------------
    // Sugars and gravity
    // ------------------------------------------------------------------

    fn sum_sugars<'a>(fermentables: impl Iterator<Item = &'a Fermentable>) -> BrewResult<Quantity> {
        let mut total = 0.0;
        for fermentable in fermentables {
            total += fermentable.sugar_kg()?;
        }
        Ok(Quantity::kilograms(total))
    }

    /// Extractable sugar of all grain fermentables
    pub fn grain_sugars(&self) -> BrewResult<Quantity> {
        Self::sum_sugars(self.fermentables.iter().filter(|f| f.is_grain()))
    }

    /// Extractable sugar of all non-grain fermentables
    pub fn other_sugars(&self) -> BrewResult<Quantity> {
        Self::sum_sugars(self.fermentables.iter().filter(|f| !f.is_grain()))
    }

    /// Gravity of the recipe's sugars dissolved in `volume_l`, with the grain
    /// pool at `efficiency_pct`.
    pub fn gravity_at(&self, volume_l: f64, efficiency_pct: f64) -> BrewResult<Quantity> {
        let grain = self.grain_sugars()?.magnitude * efficiency_pct;
        let other = self.other_sugars()?.magnitude * 100.0;
        Ok(Quantity::plato(equations::gravity_contribution(grain, other, volume_l)))
    }

    /// Gravity before the boil, over the boil volume
    pub fn preboil_gravity(&self) -> BrewResult<Quantity> {
        self.gravity_at(self.boil_volume().value_in(Unit::Liter)?, self.mash_efficiency)
    }

    /// Original gravity, over the initial volume
    pub fn gravity(&self) -> BrewResult<Quantity> {
        self.gravity_at(self.initial_volume().value_in(Unit::Liter)?, self.mash_efficiency)
    }

    /// Lowest attenuation among the yeasts (%).
    ///
    /// Strains outside 0..=100 are ignored; with no usable strain the
    /// default of 75% applies.
    pub fn max_attenuation(&self) -> f64 {
        let lowest = self
            .yeasts
            .iter()
            .map(|y| y.attenuation)
            .filter(|a| (0.0..=100.0).contains(a))
            .reduce(f64::min);

        match lowest {
            Some(attenuation) => attenuation,
            None => {
                if !self.yeasts.is_empty() {
                    warn!(recipe = %self.name, "no yeast with a usable attenuation, assuming default");
                }
                DEFAULT_YEAST_ATTENUATION
            }
        }
    }

    /// Expected final gravity
    pub fn final_gravity(&self) -> BrewResult<Quantity> {
        let og = self.gravity()?;
        Ok(og * (1.0 - self.max_attenuation() / 100.0))
    }

    fn original_and_final_sg(&self) -> BrewResult<(f64, f64)> {
        let og = self.gravity()?.value_in(Unit::SpecificGravity)?;
        let fg = self.final_gravity()?.value_in(Unit::SpecificGravity)?;
        Ok((og, fg))
    }

    // ------------------------------------------------------------------
    // Alcohol
    // ------------------------------------------------------------------

    /// Expected alcohol by volume (%)
    pub fn abv(&self) -> BrewResult<f64> {
        let (og, fg) = self.original_and_final_sg()?;
        equations::abv(og, fg)
    }

    /// Expected apparent attenuation (%)
    pub fn attenuation(&self) -> BrewResult<f64> {
        let (og, fg) = self.original_and_final_sg()?;
        equations::attenuation(og, fg)
    }

    /// Expected calories ([`equations::calories_per_100ml`])
    pub fn calories(&self) -> BrewResult<f64> {
        let (og, fg) = self.original_and_final_sg()?;
        equations::calories_per_100ml(og, fg)
    }

    // ------------------------------------------------------------------
    // Bitterness
    // ------------------------------------------------------------------

    /// Tinseth IBU of each qualifying hop addition for a wort of `og_sg`
    /// and `volume_l`. Additions with no weight, alpha acids or boil time
    /// are left out.
    pub fn ibu_breakdown_for(&self, og_sg: f64, volume_l: f64) -> BrewResult<Vec<HopBitterness>> {
        let mut additions = Vec::new();
        for hop in &self.hops {
            let Some(minutes) = hop.boil_minutes(self.boil_time) else {
                continue;
            };
            let weight_g = hop.amount_g()?;
            if weight_g <= 0.0 || hop.alpha_acids <= 0.0 || minutes <= 0.0 {
                debug!(hop = %hop.name, "hop addition skipped for bitterness");
                continue;
            }
            additions.push(HopBitterness {
                name: hop.name.clone(),
                boil_minutes: minutes,
                ibu: equations::tinseth_ibu(og_sg, minutes, hop.alpha_acids, weight_g, volume_l),
            });
        }
        Ok(additions)
    }

    /// Total Tinseth IBU for a wort of `og_sg` and `volume_l`
    pub fn ibu_for(&self, og_sg: f64, volume_l: f64) -> BrewResult<f64> {
        Ok(self.ibu_breakdown_for(og_sg, volume_l)?.iter().map(|h| h.ibu).sum())
    }

    /// Expected bitterness per hop addition
    pub fn hop_ibu_breakdown(&self) -> BrewResult<Vec<HopBitterness>> {
        let og = self.gravity()?.value_in(Unit::SpecificGravity)?;
        self.ibu_breakdown_for(og, self.initial_volume().value_in(Unit::Liter)?)
    }

    /// Expected bitterness (IBU)
    pub fn ibu(&self) -> BrewResult<f64> {
        Ok(self.hop_ibu_breakdown()?.iter().map(|h| h.ibu).sum())
    }

    /// IBU per gravity point
    pub fn bitterness_ratio(&self) -> BrewResult<f64> {
        let og = self.gravity()?.value_in(Unit::SpecificGravity)?;
        if og == 1.0 {
            return Err(BrewError::invalid_gravity(
                "bitterness_ratio",
                og,
                "original gravity must differ from 1.000",
            ));
        }
        Ok(self.ibu()? / ((og - 1.0) * 1000.0))
    }

    // ------------------------------------------------------------------
    // Color
    // ------------------------------------------------------------------

    /// Expected beer color (Morey), over the initial volume
    pub fn color(&self) -> BrewResult<Quantity> {
        let volume_l = self.initial_volume().value_in(Unit::Liter)?;
        let mut total_mcu = 0.0;
        for fermentable in &self.fermentables {
            let weight_kg = fermentable.amount_kg()?;
            let color_srm = fermentable.color_srm()?;
            if weight_kg <= 0.0 {
                continue;
            }
            total_mcu += equations::mcu(color_srm, weight_kg, volume_l);
        }
        Ok(Quantity::srm(equations::morey_color(total_mcu)))
    }
}

/// Every expected value of a recipe. Each derived field carries its own
/// result so one failing formula leaves the others intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeReport {
    pub name: String,
    pub losses: LossVolumes,
    pub initial_volume: Quantity,
    pub boil_volume: Quantity,
    pub primary_volume: Quantity,
    pub secondary_volume: Quantity,
    pub grain_sugars: BrewResult<Quantity>,
    pub other_sugars: BrewResult<Quantity>,
    pub preboil_gravity: BrewResult<Quantity>,
    pub gravity: BrewResult<Quantity>,
    pub final_gravity: BrewResult<Quantity>,
    /// Lowest yeast attenuation (%)
    pub max_attenuation: f64,
    pub color: BrewResult<Quantity>,
    pub ibu: BrewResult<f64>,
    pub hop_bitterness: BrewResult<Vec<HopBitterness>>,
    pub bitterness_ratio: BrewResult<f64>,
    pub abv: BrewResult<f64>,
    pub attenuation: BrewResult<f64>,
    /// Calories ([`equations::calories_per_100ml`])
    pub calories: BrewResult<f64>,
    /// Equations applied, in first-use order
    pub equations_used: Vec<Equation>,
}

impl RecipeReport {
    /// Names and errors of every field that failed to compute
    pub fn failed_fields(&self) -> Vec<(&'static str, &BrewError)> {
        let checks: [(&'static str, Option<&BrewError>); 12] = [
            ("grain_sugars", self.grain_sugars.as_ref().err()),
            ("other_sugars", self.other_sugars.as_ref().err()),
            ("preboil_gravity", self.preboil_gravity.as_ref().err()),
            ("gravity", self.gravity.as_ref().err()),
            ("final_gravity", self.final_gravity.as_ref().err()),
            ("color", self.color.as_ref().err()),
            ("ibu", self.ibu.as_ref().err()),
            ("hop_bitterness", self.hop_bitterness.as_ref().err()),
            ("bitterness_ratio", self.bitterness_ratio.as_ref().err()),
            ("abv", self.abv.as_ref().err()),
            ("attenuation", self.attenuation.as_ref().err()),
            ("calories", self.calories.as_ref().err()),
        ];
        checks
            .into_iter()
            .filter_map(|(name, err)| err.map(|e| (name, e)))
            .collect()
    }
}

fn equations_applied(recipe: &Recipe) -> Vec<Equation> {
    let mut tracker = EquationTracker::new();
    tracker.record(Equation::GrainSugar);
    tracker.record(Equation::GravityContribution);
    tracker.record(Equation::PlatoToSg);
    if !recipe.fermentables.is_empty() {
        tracker.record(Equation::MaltColorUnits);
        tracker.record(Equation::MoreyColor);
    }
    if recipe.hops.iter().any(|h| h.contributes_bitterness()) {
        tracker.record(Equation::TinsethIbu);
    }
    tracker.record(Equation::BitternessRatio);
    tracker.record(Equation::Abv);
    tracker.record(Equation::Attenuation);
    tracker.record(Equation::AlcoholByWeight);
    tracker.record(Equation::SgToPlato);
    tracker.record(Equation::RealExtract);
    tracker.record(Equation::Calories);
    tracker.unique_equations()
}

/// Validate a recipe and compute every expected value.
///
/// # Returns
///
/// * `Ok(RecipeReport)` - Derived values, each with its own result
/// * `Err(BrewError)` - If the recipe breaks the construction contract
pub fn calculate(recipe: &Recipe) -> BrewResult<RecipeReport> {
    recipe.validate()?;
    debug!(
        recipe = %recipe.name,
        fermentables = recipe.fermentables.len(),
        hops = recipe.hops.len(),
        "calculating recipe report"
    );

    let report = RecipeReport {
        name: recipe.name.clone(),
        losses: recipe.loss_volumes(),
        initial_volume: recipe.initial_volume(),
        boil_volume: recipe.boil_volume(),
        primary_volume: recipe.primary_volume(),
        secondary_volume: recipe.secondary_volume(),
        grain_sugars: recipe.grain_sugars(),
        other_sugars: recipe.other_sugars(),
        preboil_gravity: recipe.preboil_gravity(),
        gravity: recipe.gravity(),
        final_gravity: recipe.final_gravity(),
        max_attenuation: recipe.max_attenuation(),
        color: recipe.color(),
        ibu: recipe.ibu(),
        hop_bitterness: recipe.hop_ibu_breakdown(),
        bitterness_ratio: recipe.bitterness_ratio(),
        abv: recipe.abv(),
        attenuation: recipe.attenuation(),
        calories: recipe.calories(),
        equations_used: equations_applied(recipe),
    };

    for (field, err) in report.failed_fields() {
        warn!(recipe = %recipe.name, field, error = %err, "derived field unavailable");
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredients::{FermentableType, HopUse};
    use approx::assert_abs_diff_eq;

    fn test_recipe() -> Recipe {
        let mut recipe = Recipe::new("Test Pale Ale", 20.0);
        recipe.boil_loss = 10.0;
        recipe.trub_loss = 5.0;
        recipe.dry_hopping_loss = 0.0;
        recipe.evaporation_rate = 10.0;
        recipe.mash_efficiency = 75.0;
        recipe.fermentables.push(Fermentable::grain("Pale Malt", 5.0, 80.0, 3.0));
        recipe.hops.push(Hop::boil("Magnum", 20.0, 12.0, 60.0));
        recipe.hops.push(Hop::boil("Cascade", 30.0, 5.5, 10.0));
        recipe.hops.push(Hop::dry_hop("Citra", 50.0, 12.0, 4.0));
        recipe.yeasts.push(Yeast::new("US-05", 80.0));
        recipe
    }

    #[test]
    fn test_volumes() {
        let recipe = test_recipe();
        let losses = recipe.loss_volumes();
        assert_abs_diff_eq!(losses.boil.magnitude, 2.0);
        assert_abs_diff_eq!(losses.trub.magnitude, 1.0);
        assert_abs_diff_eq!(losses.dry_hop.magnitude, 0.0);
        assert_abs_diff_eq!(recipe.initial_volume().magnitude, 23.0, epsilon = 1e-12);
        assert_abs_diff_eq!(recipe.boil_volume().magnitude, 25.3, epsilon = 1e-12);
        assert_abs_diff_eq!(recipe.primary_volume().magnitude, 21.0, epsilon = 1e-12);
        assert_abs_diff_eq!(recipe.secondary_volume().magnitude, 20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_volumes_keep_recipe_unit() {
        let mut recipe = test_recipe();
        recipe.expected_beer_volume = Quantity::new(5.0, Unit::UsGallon);
        assert_eq!(recipe.initial_volume().unit, Unit::UsGallon);
        assert_abs_diff_eq!(recipe.initial_volume().magnitude, 5.75, epsilon = 1e-12);
    }

    #[test]
    fn test_sugar_partition() {
        let mut recipe = test_recipe();
        recipe
            .fermentables
            .push(Fermentable::other("Dextrose", FermentableType::Sugar, 0.5, 100.0, 0.0));
        assert_abs_diff_eq!(recipe.grain_sugars().unwrap().magnitude, 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(recipe.other_sugars().unwrap().magnitude, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_gravity_reference_fixture() {
        let recipe = test_recipe();
        // 300 / (23 - 300/145 + 300/100)
        let og = recipe.gravity().unwrap();
        assert_eq!(og.unit, Unit::Plato);
        assert_abs_diff_eq!(og.magnitude, 12.536, epsilon = 1e-2);
    }

    #[test]
    fn test_preboil_gravity_uses_boil_volume() {
        let recipe = test_recipe();
        let preboil = recipe.preboil_gravity().unwrap().magnitude;
        let expected = 300.0 / (25.3 - 300.0 / 145.0 + 300.0 / 100.0);
        assert_abs_diff_eq!(preboil, expected, epsilon = 1e-9);
        assert!(preboil < recipe.gravity().unwrap().magnitude);
    }

    #[test]
    fn test_empty_recipe_degenerates_to_zero() {
        let recipe = Recipe::new("Water", 20.0);
        assert_eq!(recipe.gravity().unwrap().magnitude, 0.0);
        assert_eq!(recipe.color().unwrap().magnitude, 0.0);
        assert_eq!(recipe.ibu().unwrap(), 0.0);
        assert_eq!(recipe.max_attenuation(), DEFAULT_YEAST_ATTENUATION);
    }

    #[test]
    fn test_max_attenuation_takes_lowest_usable() {
        let mut recipe = test_recipe();
        recipe.yeasts.push(Yeast::new("Belgian", 72.0));
        recipe.yeasts.push(Yeast::new("Bad data", 180.0));
        assert_eq!(recipe.max_attenuation(), 72.0);

        recipe.yeasts = vec![Yeast::new("Bad data", 180.0)];
        assert_eq!(recipe.max_attenuation(), DEFAULT_YEAST_ATTENUATION);
    }

    #[test]
    fn test_final_gravity() {
        let recipe = test_recipe();
        let og = recipe.gravity().unwrap().magnitude;
        assert_abs_diff_eq!(recipe.final_gravity().unwrap().magnitude, og * 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_ibu_ignores_dry_hops_and_zero_time() {
        let mut recipe = test_recipe();
        let with_dry_hop = recipe.ibu().unwrap();
        recipe.hops.retain(|h| h.usage != HopUse::DryHop);
        assert_abs_diff_eq!(recipe.ibu().unwrap(), with_dry_hop, epsilon = 1e-12);

        recipe.hops.push(Hop::boil("Flameout", 60.0, 10.0, 0.0));
        assert_abs_diff_eq!(recipe.ibu().unwrap(), with_dry_hop, epsilon = 1e-12);
        assert_eq!(recipe.hop_ibu_breakdown().unwrap().len(), 2);
    }

    #[test]
    fn test_ibu_matches_tinseth_sum() {
        let recipe = test_recipe();
        let og = recipe.gravity().unwrap().value_in(Unit::SpecificGravity).unwrap();
        let expected = equations::tinseth_ibu(og, 60.0, 12.0, 20.0, 23.0)
            + equations::tinseth_ibu(og, 10.0, 5.5, 30.0, 23.0);
        assert_abs_diff_eq!(recipe.ibu().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_bitterness_ratio_identity() {
        let recipe = test_recipe();
        let og = recipe.gravity().unwrap().value_in(Unit::SpecificGravity).unwrap();
        assert_eq!(
            recipe.bitterness_ratio().unwrap(),
            recipe.ibu().unwrap() / ((og - 1.0) * 1000.0)
        );
    }

    #[test]
    fn test_bitterness_ratio_without_sugar() {
        let recipe = Recipe::new("Hop water", 20.0);
        // 0 °P is exactly SG 1.000
        let err = recipe.bitterness_ratio().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GRAVITY_RANGE");
    }

    #[test]
    fn test_abv_in_expected_range() {
        let recipe = test_recipe();
        let abv = recipe.abv().unwrap();
        assert!(abv > 4.5 && abv < 6.0, "abv = {abv}");
        let attenuation = recipe.attenuation().unwrap();
        assert!(attenuation > 75.0 && attenuation < 85.0, "attenuation = {attenuation}");
        assert!(recipe.calories().unwrap() > 0.0);
    }

    #[test]
    fn test_color() {
        let recipe = test_recipe();
        let expected = equations::morey_color(equations::mcu(3.0, 5.0, 23.0));
        assert_abs_diff_eq!(recipe.color().unwrap().magnitude, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_color_counts_colorless_sugar() {
        let mut recipe = test_recipe();
        let base = recipe.color().unwrap().magnitude;
        recipe
            .fermentables
            .push(Fermentable::other("Dextrose", FermentableType::Sugar, 1.0, 100.0, 0.0));

        // 0 SRM is still 0.56 °L in the MCU step
        let expected = equations::morey_color(equations::mcu(3.0, 5.0, 23.0) + equations::mcu(0.0, 1.0, 23.0));
        let color = recipe.color().unwrap().magnitude;
        assert_abs_diff_eq!(color, expected, epsilon = 1e-12);
        assert!(color > base);

        recipe.fermentables.push(Fermentable::grain("Black Malt", 0.0, 70.0, 500.0));
        assert_abs_diff_eq!(recipe.color().unwrap().magnitude, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_validate() {
        let mut recipe = test_recipe();
        assert!(recipe.validate().is_ok());

        recipe.trub_loss = 120.0;
        assert_eq!(recipe.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let mut recipe = test_recipe();
        recipe.expected_beer_volume = Quantity::liters(0.0);
        assert!(recipe.validate().is_err());

        let mut recipe = test_recipe();
        recipe.expected_beer_volume = Quantity::kilograms(20.0);
        assert_eq!(recipe.validate().unwrap_err().error_code(), "UNIT_FAMILY_MISMATCH");
    }

    #[test]
    fn test_report_isolates_failing_fields() {
        let mut recipe = test_recipe();
        // Enough sugar to push OG past the ABV pole
        recipe.fermentables = vec![Fermentable::other("Syrup", FermentableType::Sugar, 400.0, 100.0, 0.0)];
        let report = calculate(&recipe).unwrap();

        assert!(report.gravity.is_ok());
        assert!(report.abv.is_err());
        assert!(report.color.is_ok());
        assert!(report.failed_fields().iter().any(|(name, _)| *name == "abv"));
    }

    #[test]
    fn test_report_serialization() {
        let report = calculate(&test_recipe()).unwrap();
        assert!(report.failed_fields().is_empty());
        assert!(report.equations_used.contains(&Equation::TinsethIbu));

        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("Test Pale Ale"));
        assert!(json.contains("\"Ok\""));
    }

    #[test]
    fn test_recipe_json_roundtrip() {
        let recipe = test_recipe();
        let json = serde_json::to_string(&recipe).unwrap();
        let roundtrip: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(recipe, roundtrip);
    }
}
