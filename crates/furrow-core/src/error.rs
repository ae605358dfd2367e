//! Error types for field actuation and queries.
//!
//! The simulation math cannot fail on valid inputs, so every error here is
//! an input-validation failure at the boundary. A call that returns one of
//! these errors has not mutated any grid.

/// Errors from point queries and actuation calls on a field.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The addressed cell lies outside the grid.
    ///
    /// Direct addressing never wraps; only neighbour lookups during
    /// diffusion use toroidal topology.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested row.
        row: u32,
        /// Requested column.
        col: u32,
        /// Number of rows in the grid.
        rows: u32,
        /// Number of columns in the grid.
        cols: u32,
    },
    /// The plant type is not one of the tabulated species.
    #[error("plant type {0} is not in 0..{max}", max = crate::PlantType::COUNT)]
    InvalidPlantType(u8),
    /// A forced rain event was requested with an intensity outside `1..=3`.
    #[error("rain intensity {0} is not in 1..=3")]
    InvalidRainIntensity(u8),
    /// A quantity was negative, non-finite, or outside its allowed range.
    #[error("invalid {quantity}: {value}")]
    InvalidAmount {
        /// Which quantity was rejected (e.g. `"flow_rate"`).
        quantity: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl FieldError {
    /// Check that `value` is finite and non-negative.
    ///
    /// Returns the value unchanged so it can be used inline.
    pub fn non_negative(quantity: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidAmount { quantity, value })
        }
    }

    /// Check that `value` lies in the closed unit interval.
    pub fn unit_interval(quantity: &'static str, value: f64) -> Result<f64, Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(Self::InvalidAmount { quantity, value })
        }
    }
}
