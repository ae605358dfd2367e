//! Error types for lattice construction.

/// Errors arising from lattice construction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// Attempted to construct a lattice with zero cells.
    #[error("space must have at least one cell")]
    EmptySpace,
    /// A dimension exceeds the representable maximum.
    #[error("{name} = {value} exceeds maximum {max}")]
    DimensionTooLarge {
        /// Which dimension (`"rows"` or `"cols"`).
        name: &'static str,
        /// The requested value.
        value: u32,
        /// The maximum allowed value.
        max: u32,
    },
}
