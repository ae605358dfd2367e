//! Furrow: a discretized agricultural field simulation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Furrow sub-crates. For most users, adding `furrow` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use furrow::prelude::*;
//!
//! let mut field = Field::new(FieldConfig::with_size(8, 8)).unwrap();
//! field.plant_seed(3, 4, 0).unwrap();
//! field.apply_irrigation(3, 4, 12.0).unwrap();
//!
//! for _ in 0..48 {
//!     field.step();
//! }
//!
//! let soil = field.get_soil(3, 4).unwrap();
//! assert!((0.0..=100.0).contains(&soil.moisture));
//! let drone = field.get_drone(3, 4).unwrap();
//! assert!(drone.stage.is_planted() || drone.stage == CropStage::Empty);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `furrow-core` | Grids, crop and weather enums, errors, capability traits |
//! | [`space`] | `furrow-space` | Toroidal lattice and diffusion kernels |
//! | [`models`] | `furrow-models` | The six sub-models and their parameters |
//! | [`engine`] | `furrow-engine` | `Field`, configuration, shared handle, column helpers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and errors (`furrow-core`).
///
/// Contains [`types::Grid`], the domain enums, [`types::FieldError`], and the
/// capability traits [`types::FieldAccess`] and [`types::EventControl`].
pub use furrow_core as types;

/// Toroidal lattice (`furrow-space`).
///
/// [`space::Torus8`] precomputes 8-neighbourhoods and runs the diffusion
/// kernels.
pub use furrow_space as space;

/// Sub-models (`furrow-models`).
///
/// Each model can be driven on its own, e.g. [`models::RainModel`] or
/// [`models::MoistureModel`].
pub use furrow_models as models;

/// Field orchestrator (`furrow-engine`).
///
/// [`engine::Field`] for single-owner stepping, [`engine::SharedField`] for
/// access from several threads.
pub use furrow_engine as engine;

/// Common imports for typical Furrow usage.
///
/// ```rust
/// use furrow::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use furrow_core::{
        CropStage, DroneReading, EventControl, FieldAccess, Grid, GridShape, PlantType,
        RainLevel, Season, SoilReading,
    };

    // Errors
    pub use furrow_core::FieldError;
    pub use furrow_engine::ConfigError;

    // Engine
    pub use furrow_engine::sensing::{column_soil_average, fertilize_column, irrigate_column};
    pub use furrow_engine::{Field, FieldConfig, SharedField, StepMetrics};
}
