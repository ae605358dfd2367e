//! Sub-models of the Furrow field simulation.
//!
//! Each model owns the state for one physical process and exposes an
//! `update` that takes the quantities it reads as parameters, so models can
//! be driven in isolation by tests:
//!
//! | Model | State | Reads |
//! |-------|-------|-------|
//! | [`TemperatureModel`] | none | day, hour |
//! | [`RainModel`] | level, remaining hours | day, drought |
//! | [`MoistureModel`] | moisture grid | rain, temperature, nutrients, crop |
//! | [`NutrientModel`] | nutrient grid | drought, temperature, moisture, crop, pest |
//! | [`PestModel`] | infestation grid, spread weights | nothing |
//! | [`CropModel`] | stage, species, health, timers | moisture, nutrients, temperature, pest |
//!
//! Randomness is always drawn from a caller-supplied generator; see
//! [`sampling`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod crop;
pub mod error;
pub mod moisture;
pub mod nutrients;
pub mod pest;
pub mod plant;
pub mod rain;
pub mod sampling;
pub mod stress;
pub mod temperature;

pub use crop::{CropModel, CropParams, CropTransitions};
pub use error::ParamError;
pub use moisture::{MoistureInputs, MoistureModel, MoistureParams, MoistureUpdate};
pub use nutrients::{NutrientInputs, NutrientModel, NutrientParams};
pub use pest::{PestModel, PestParams};
pub use plant::PlantTable;
pub use rain::{RainModel, RainParams};
pub use temperature::{TemperatureModel, TemperatureParams};
