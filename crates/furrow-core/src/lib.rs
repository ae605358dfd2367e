//! Core types and traits for the Furrow field simulation.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! fundamental abstractions used throughout the Furrow workspace: cell
//! addressing, per-cell grids, crop and weather enumerations, error types,
//! and the capability traits through which the control layer talks to a
//! field.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod kind;
pub mod traits;

pub use error::FieldError;
pub use grid::{Grid, GridShape};
pub use kind::{CropStage, PlantType, RainLevel, Season};
pub use traits::{DroneReading, EventControl, FieldAccess, SoilReading};
