//! # Brewing Calculations
//!
//! Expected values come from a [`Recipe`]; measured values live on a
//! [`Batch`] as it moves through the brew day.
//!
//! - [`recipe`] - Recipe volumes, gravity, color, bitterness and alcohol
//! - [`stage`] - Batch stages and the fields each one requires
//! - [`batch`] - Batch state machine and measured metrics
//!
//! All types serialize to JSON. Derived fields in reports carry their own
//! `Result`, so a formula that fails leaves the rest of the report usable.

pub mod batch;
pub mod recipe;
pub mod stage;

pub use batch::{Batch, BatchMeasurements, BatchReport, CarbonationType, Comparison};
pub use recipe::{calculate, HopBitterness, LossVolumes, Recipe, RecipeReport};
pub use stage::{BatchField, BatchStage};
