//! Spatial topology for Furrow fields.
//!
//! A field is a rectangular lattice whose edges wrap around, so every cell
//! has exactly eight neighbours. [`Torus8`] precomputes that neighbourhood
//! once and provides the kernels the soil and pest models run every tick:
//! neighbour means, one-step diffusion, and weighted neighbour sums.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod torus8;

pub use error::SpaceError;
pub use torus8::Torus8;
