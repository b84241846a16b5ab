//! # Brewing Equations
//!
//! Every empirical brewing formula used by the calculator lives here as a
//! pure function over plain `f64` values. Recipes feed them expected values,
//! batches feed them measured values; neither duplicates the math.
//!
//! ## Modules
//!
//! - [`gravity`] - Sugar yield and wort gravity
//! - [`color`] - Malt color units and the Morey equation
//! - [`bitterness`] - Tinseth utilization and IBU
//! - [`alcohol`] - ABV, attenuation, real extract and calories
//! - [`registry`] - Equation metadata and usage tracking
//!
//! ## Units Convention
//!
//! Functions take the units named in their argument suffix (`_kg`, `_g`,
//! `_l`, `_sg`, `_pct`, `_min`). Gravity-scale conversions live in
//! [`crate::units`].

pub mod alcohol;
pub mod bitterness;
pub mod color;
pub mod gravity;
pub mod registry;

pub use alcohol::{
    abv,
    alcohol_by_weight,
    attenuation,
    calories_per_100ml,
    calories_per_12oz,
    real_extract,
};

pub use bitterness::{tinseth_bigness, tinseth_ibu, tinseth_time_factor, tinseth_utilization};

pub use color::{mcu, morey_color, srm_to_lovibond};

pub use gravity::{grain_sugar, gravity_contribution, sugar_pool_plato};

pub use registry::{
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    Reference,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};

pub use crate::units::{plato_to_sg, sg_to_plato};
