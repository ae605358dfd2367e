//! Field configuration, validation, and error types.
//!
//! [`FieldConfig`] is the input for [`Field::new`](crate::Field::new). Every
//! block has defaults, and a partial JSON document overrides only what it
//! names:
//!
//! ```
//! use furrow_engine::FieldConfig;
//!
//! let cfg = FieldConfig::from_json_str(r#"{ "rows": 4, "cols": 6, "pest": { "p_spread": 0.2 } }"#)?;
//! assert_eq!((cfg.rows, cfg.cols), (4, 6));
//! assert_eq!(cfg.tick_hours, 1);
//! # Ok::<(), furrow_engine::ConfigError>(())
//! ```

use furrow_models::{
    CropParams, MoistureParams, NutrientParams, ParamError, PestParams, PlantTable, RainParams,
    TemperatureParams,
};
use furrow_space::SpaceError;
use serde::{Deserialize, Serialize};

use crate::field::DAYS_PER_YEAR;

/// Longest accepted tick: one simulated year.
pub const MAX_TICK_HOURS: u32 = 24 * DAYS_PER_YEAR;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a [`FieldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The grid cannot be built.
    #[error("space: {0}")]
    Space(#[from] SpaceError),
    /// A sub-model parameter is out of range.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// The JSON document could not be parsed.
    #[error("config parse: {0}")]
    Parse(#[from] serde_json::Error),
    /// `tick_hours` is zero.
    #[error("tick_hours must be at least 1")]
    ZeroTickHours,
    /// `tick_hours` is longer than a year.
    #[error("tick_hours {0} exceeds {max}", max = MAX_TICK_HOURS)]
    TickHoursTooLong(u32),
    /// `start_day` is outside `1..=365`.
    #[error("start_day {0} is not in 1..=365")]
    InvalidStartDay(u32),
    /// `start_hour` is outside `0..24`.
    #[error("start_hour {0} is not in 0..24")]
    InvalidStartHour(u32),
}

// ── FieldConfig ────────────────────────────────────────────────────

/// Everything needed to build a [`Field`](crate::Field).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Grid rows.
    pub rows: u32,
    /// Grid columns.
    pub cols: u32,
    /// Simulated hours per tick.
    pub tick_hours: u32,
    /// Seed of the field's random generator.
    pub seed: u64,
    /// Day-of-year the clock starts on.
    pub start_day: u32,
    /// Hour the clock starts on.
    pub start_hour: u32,
    /// Spread damping applied to a sprayed cell, in `[0, 1]`.
    pub pesticide_neighbor_effect: f64,
    /// Air temperature curve.
    pub temperature: TemperatureParams,
    /// Weather process.
    pub rain: RainParams,
    /// Soil water balance.
    pub moisture: MoistureParams,
    /// Soil nutrient balance.
    pub nutrients: NutrientParams,
    /// Pest spread.
    pub pest: PestParams,
    /// Per-species tables.
    pub plants: PlantTable,
    /// Crop health dynamics.
    pub crop: CropParams,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            tick_hours: 1,
            seed: 0,
            start_day: 183,
            start_hour: 10,
            pesticide_neighbor_effect: 0.75,
            temperature: TemperatureParams::default(),
            rain: RainParams::default(),
            moisture: MoistureParams::default(),
            nutrients: NutrientParams::default(),
            pest: PestParams::default(),
            plants: PlantTable::default(),
            crop: CropParams::default(),
        }
    }
}

impl FieldConfig {
    /// Default configuration for a `rows x cols` grid.
    pub fn with_size(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Parse a JSON document, filling unnamed fields with defaults, and
    /// validate the result.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Tick length as a float, hours.
    pub fn dt_hours(&self) -> f64 {
        f64::from(self.tick_hours)
    }

    /// Check structural invariants and every parameter block.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid dimensions.
        if self.rows == 0 || self.cols == 0 {
            return Err(SpaceError::EmptySpace.into());
        }
        // 2. Clock.
        if self.tick_hours == 0 {
            return Err(ConfigError::ZeroTickHours);
        }
        if self.tick_hours > MAX_TICK_HOURS {
            return Err(ConfigError::TickHoursTooLong(self.tick_hours));
        }
        if !(1..=365).contains(&self.start_day) {
            return Err(ConfigError::InvalidStartDay(self.start_day));
        }
        if self.start_hour >= 24 {
            return Err(ConfigError::InvalidStartHour(self.start_hour));
        }
        // 3. Pesticide damping.
        if !(0.0..=1.0).contains(&self.pesticide_neighbor_effect) {
            return Err(ParamError {
                name: "pesticide_neighbor_effect",
                value: self.pesticide_neighbor_effect,
                expected: "in [0, 1]",
            }
            .into());
        }
        // 4. Sub-model blocks.
        self.temperature.validate()?;
        self.rain.validate()?;
        self.moisture.validate()?;
        self.nutrients.validate()?;
        self.pest.validate()?;
        self.plants.validate()?;
        self.crop.validate()?;
        Ok(())
    }
}
