//! # Brewery Data Structures
//!
//! The `Brewery` struct is the root container for a brewer's recipes and
//! batches. Breweries serialize to `.brew` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Brewery
//! ├── meta: BreweryMetadata (schema version, name, timestamps)
//! ├── settings: BrewSettings (display units, recipe defaults)
//! ├── recipes: HashMap<Uuid, Recipe>
//! └── batches: HashMap<Uuid, Batch>
//! ```
//!
//! ## Batch Numbers
//!
//! Each owner numbers batches 1, 2, 3, ... in registration order. The next
//! number is the owner's current maximum plus one, so numbers deleted from
//! the top are reused. Two writers registering at the same time must be
//! serialized by the caller (see [`crate::file_io::FileLock`]).
//!
//! ## Example
//!
//! ```rust
//! use brew_core::brewery::Brewery;
//! use brew_core::calculations::{Batch, Recipe};
//! use uuid::Uuid;
//!
//! let mut brewery = Brewery::new("Garage Brewing");
//! let owner = Uuid::new_v4();
//!
//! let first = brewery.register_batch(Batch::new(owner, Recipe::new("Stout", 20.0)));
//! let second = brewery.register_batch(Batch::new(owner, Recipe::new("Stout", 20.0)));
//!
//! assert_eq!(brewery.batches[&first].batch_number, Some(1));
//! assert_eq!(brewery.batches[&second].batch_number, Some(2));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculations::{Batch, Recipe};
use crate::settings::BrewSettings;

/// Current schema version for .brew files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root brewery container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brewery {
    pub meta: BreweryMetadata,

    #[serde(default)]
    pub settings: BrewSettings,

    /// Recipes, keyed by UUID
    #[serde(default)]
    pub recipes: HashMap<Uuid, Recipe>,

    /// Batches, keyed by their own id
    #[serde(default)]
    pub batches: HashMap<Uuid, Batch>,
}

/// Brewery metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreweryMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Brewery {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Brewery {
            meta: BreweryMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: now,
                modified: now,
            },
            settings: BrewSettings::default(),
            recipes: HashMap::new(),
            batches: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    // ------------------------------------------------------------------
    // Recipes
    // ------------------------------------------------------------------

    /// Add a recipe, returning its new UUID
    pub fn add_recipe(&mut self, recipe: Recipe) -> Uuid {
        let id = Uuid::new_v4();
        self.recipes.insert(id, recipe);
        self.touch();
        id
    }

    /// Start a recipe using the brewery's defaults
    pub fn new_recipe(&self, name: impl Into<String>, expected_beer_volume_l: f64) -> Recipe {
        let mut recipe = Recipe::new(name, expected_beer_volume_l);
        recipe.mash_efficiency = self.settings.default_mash_efficiency;
        recipe.boil_time = self.settings.default_boil_time;
        recipe
    }

    pub fn get_recipe(&self, id: &Uuid) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn remove_recipe(&mut self, id: &Uuid) -> Option<Recipe> {
        let recipe = self.recipes.remove(id);
        if recipe.is_some() {
            self.touch();
        }
        recipe
    }

    // ------------------------------------------------------------------
    // Batches
    // ------------------------------------------------------------------

    /// Number the next batch of `owner` would get. Does not reserve it.
    pub fn next_batch_number(&self, owner: &Uuid) -> u32 {
        self.batches
            .values()
            .filter(|batch| batch.owner == *owner)
            .filter_map(|batch| batch.batch_number)
            .max()
            .map_or(1, |highest| highest + 1)
    }

    /// Store a batch, stamping it with its owner's next batch number.
    ///
    /// Returns the batch id.
    pub fn register_batch(&mut self, mut batch: Batch) -> Uuid {
        let number = self.next_batch_number(&batch.owner);
        batch.batch_number = Some(number);
        let id = batch.id;
        info!(batch = %id, owner = %batch.owner, number, recipe = %batch.recipe.name, "batch registered");
        self.batches.insert(id, batch);
        self.touch();
        id
    }

    pub fn get_batch(&self, id: &Uuid) -> Option<&Batch> {
        self.batches.get(id)
    }

    /// Mutable access; marks the brewery as modified.
    pub fn get_batch_mut(&mut self, id: &Uuid) -> Option<&mut Batch> {
        if self.batches.contains_key(id) {
            self.meta.modified = Utc::now();
            self.batches.get_mut(id)
        } else {
            None
        }
    }

    pub fn remove_batch(&mut self, id: &Uuid) -> Option<Batch> {
        let batch = self.batches.remove(id);
        if batch.is_some() {
            self.touch();
        }
        batch
    }

    /// Batches of one owner, ordered by batch number
    pub fn batches_for(&self, owner: &Uuid) -> Vec<&Batch> {
        let mut batches: Vec<&Batch> = self.batches.values().filter(|b| b.owner == *owner).collect();
        batches.sort_by_key(|b| b.batch_number);
        batches
    }
}

impl Default for Brewery {
    fn default() -> Self {
        Brewery::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::BatchStage;

    fn batch_for(owner: Uuid) -> Batch {
        Batch::new(owner, Recipe::new("House Pale", 20.0))
    }

    #[test]
    fn test_brewery_creation() {
        let brewery = Brewery::new("Garage Brewing");
        assert_eq!(brewery.meta.name, "Garage Brewing");
        assert_eq!(brewery.meta.version, SCHEMA_VERSION);
        assert!(brewery.batches.is_empty());
    }

    #[test]
    fn test_next_batch_number_is_a_pure_read() {
        let mut brewery = Brewery::new("Test");
        let owner = Uuid::new_v4();
        assert_eq!(brewery.next_batch_number(&owner), 1);
        assert_eq!(brewery.next_batch_number(&owner), 1);

        brewery.register_batch(batch_for(owner));
        assert_eq!(brewery.next_batch_number(&owner), 2);
    }

    #[test]
    fn test_batch_numbers_are_per_owner() {
        let mut brewery = Brewery::new("Test");
        let ana = Uuid::new_v4();
        let ben = Uuid::new_v4();

        brewery.register_batch(batch_for(ana));
        brewery.register_batch(batch_for(ana));
        let bens = brewery.register_batch(batch_for(ben));

        assert_eq!(brewery.batches[&bens].batch_number, Some(1));
        assert_eq!(brewery.next_batch_number(&ana), 3);

        let numbers: Vec<_> = brewery.batches_for(&ana).iter().map(|b| b.batch_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_number_follows_highest_not_count() {
        let mut brewery = Brewery::new("Test");
        let owner = Uuid::new_v4();
        let first = brewery.register_batch(batch_for(owner));
        brewery.register_batch(batch_for(owner));

        brewery.remove_batch(&first);
        assert_eq!(brewery.next_batch_number(&owner), 3);
    }

    #[test]
    fn test_new_recipe_uses_settings() {
        let mut brewery = Brewery::new("Test");
        brewery.settings.default_mash_efficiency = 68.0;
        brewery.settings.default_boil_time = 90;

        let recipe = brewery.new_recipe("Weizen", 19.0);
        assert_eq!(recipe.mash_efficiency, 68.0);
        assert_eq!(recipe.boil_time, 90);

        let id = brewery.add_recipe(recipe);
        assert!(brewery.get_recipe(&id).is_some());
        assert!(brewery.remove_recipe(&id).is_some());
        assert!(brewery.get_recipe(&id).is_none());
    }

    #[test]
    fn test_batch_mutation_through_brewery() {
        let mut brewery = Brewery::new("Test");
        let id = brewery.register_batch(batch_for(Uuid::new_v4()));

        let batch = brewery.get_batch_mut(&id).unwrap();
        batch.advance().unwrap();
        assert_eq!(brewery.get_batch(&id).unwrap().stage(), BatchStage::Mashing);
    }

    #[test]
    fn test_brewery_serialization() {
        let mut brewery = Brewery::new("Garage Brewing");
        brewery.register_batch(batch_for(Uuid::new_v4()));
        let json = serde_json::to_string_pretty(&brewery).unwrap();
        assert!(json.contains("Garage Brewing"));

        let roundtrip: Brewery = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.batches.len(), 1);
        assert_eq!(roundtrip.settings, brewery.settings);
    }
}
