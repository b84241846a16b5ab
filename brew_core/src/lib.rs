//! # brew_core - Beer Recipe Calculation Engine
//!
//! `brew_core` derives the expected numbers of a beer recipe (volumes,
//! gravity, color, bitterness, alcohol, calories) and tracks a batch of that
//! recipe through the brew day, stage by stage, comparing what was measured
//! with what was planned.
//!
//! ## Design Philosophy
//!
//! - **Pure calculations**: derived values are recomputed from the current
//!   fields on every call, nothing is cached
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Unit-safe**: quantities carry their unit and convert on demand
//!
//! ## Quick Start
//!
//! ```rust
//! use brew_core::calculations::{calculate, Recipe};
//! use brew_core::ingredients::{Fermentable, Hop, Yeast};
//!
//! let mut recipe = Recipe::new("Session IPA", 20.0);
//! recipe.boil_loss = 10.0;
//! recipe.fermentables.push(Fermentable::grain("Pale Malt", 4.0, 80.0, 3.0));
//! recipe.hops.push(Hop::boil("Simcoe", 20.0, 13.0, 60.0));
//! recipe.yeasts.push(Yeast::new("US-05", 80.0));
//!
//! let report = calculate(&recipe).unwrap();
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! assert!(json.contains("Session IPA"));
//! ```
//!
//! ## Modules
//!
//! - [`units`] - Quantities, units and gravity scales
//! - [`equations`] - Brewing formulas and the equation registry
//! - [`ingredients`] - Fermentables, hops and yeasts
//! - [`calculations`] - Recipe calculation and batch stage tracking
//! - [`brewery`] - Recipe and batch container, batch numbering
//! - [`settings`] - Display units and recipe defaults
//! - [`file_io`] - Atomic saves and file locking
//! - [`errors`] - Structured error types

pub mod brewery;
pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod ingredients;
pub mod settings;
pub mod units;

pub use brewery::{Brewery, BreweryMetadata};
pub use calculations::{Batch, BatchField, BatchStage, Recipe, RecipeReport};
pub use errors::{BrewError, BrewResult};
pub use file_io::{load_brewery, save_brewery, FileLock};
pub use settings::BrewSettings;
pub use units::{Quantity, Unit, UnitFamily};
