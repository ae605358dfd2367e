//! Benchmark profiles and utilities for the Furrow field simulation.
//!
//! Provides pre-built [`FieldConfig`] profiles for benchmarking and examples:
//!
//! - [`reference_profile`]: 100x100 field (10K cells)
//! - [`stress_profile`]: 316x316 field (~100K cells)
//! - [`planted_field`]: a field sown wall to wall with an active outbreak
//! - [`scatter_grid`]: deterministic per-cell values from a seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use furrow_core::{FieldError, Grid, GridShape, PlantType};
use furrow_engine::{ConfigError, Field, FieldConfig};

/// Build a reference benchmark profile: 100x100 field, 1 h ticks.
pub fn reference_profile(seed: u64) -> FieldConfig {
    FieldConfig {
        seed,
        ..FieldConfig::with_size(100, 100)
    }
}

/// Build a stress benchmark profile: 316x316 field (~100K cells).
pub fn stress_profile(seed: u64) -> FieldConfig {
    FieldConfig {
        seed,
        ..FieldConfig::with_size(316, 316)
    }
}

/// Build a field from `config`, plant every cell (species cycling by
/// column), and start a pest outbreak, so every model has work to do.
pub fn planted_field(config: FieldConfig) -> Result<Field, PlantedFieldError> {
    let mut field = Field::new(config)?;
    let shape = field.shape();
    for row in 0..shape.rows() {
        for col in 0..shape.cols() {
            let species = (col as usize % PlantType::COUNT) as u8;
            field.plant_seed(row, col, species)?;
        }
    }
    field.apply_pest();
    Ok(field)
}

/// Failure building a [`planted_field`].
#[derive(Debug)]
pub enum PlantedFieldError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// Sowing failed.
    Field(FieldError),
}

impl From<ConfigError> for PlantedFieldError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<FieldError> for PlantedFieldError {
    fn from(e: FieldError) -> Self {
        Self::Field(e)
    }
}

/// Deterministic values in `[0, 100)` for every cell of `shape`, from a
/// simple hash of `seed` and the cell index.
pub fn scatter_grid(shape: GridShape, seed: u64) -> Grid<f64> {
    let cols = u64::from(shape.cols());
    Grid::from_fn(shape, |r, c| {
        let i = u64::from(r) * cols + u64::from(c);
        let h = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i.wrapping_mul(1442695040888963407));
        (h >> 11) as f64 / (1u64 << 53) as f64 * 100.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_validates() {
        reference_profile(42).validate().unwrap();
    }

    #[test]
    fn stress_profile_validates() {
        stress_profile(42).validate().unwrap();
    }

    #[test]
    fn planted_field_is_fully_sown() {
        let field = planted_field(FieldConfig::with_size(6, 7)).unwrap();
        assert_eq!(field.crop().planted_count(), 42);
        assert!(field.is_pest_active());
    }

    #[test]
    fn scatter_grid_is_deterministic_and_in_range() {
        let shape = GridShape::new(20, 30);
        let a = scatter_grid(shape, 7);
        assert_eq!(a, scatter_grid(shape, 7));
        assert!(a.iter().all(|v| (0.0..100.0).contains(v)));
    }
}
