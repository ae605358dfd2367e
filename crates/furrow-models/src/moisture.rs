//! Soil moisture balance.
//!
//! Per cell and per tick, in percentage points:
//!
//! ```text
//! new = m + rain - evaporation - uptake + diffusion
//! rain        = mm(level) * dt * mm_to_pct * (1 + N(0, rain_noise))
//! evaporation = min(1, evap_coeff * max(0, T - threshold) * dt * mm_to_pct / 100) * m
//! uptake      = min(m, table(stage, species) * dt * temp_adj * mm_to_pct * stress(m))
//! diffusion   = diffusion_coef * (mean8(m) - m)
//! ```
//!
//! Moisture above field capacity is partly leached away, taking the same
//! fraction of the cell's nutrients with it. The result is clipped to
//! `[0, 100]`.

use furrow_core::{FieldError, Grid, GridShape, RainLevel};
use furrow_space::Torus8;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::crop::CropModel;
use crate::error::ParamError;
use crate::sampling;
use crate::stress;

/// Water balance parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoistureParams {
    /// Percentage points of moisture per mm of water.
    pub mm_to_pct: f64,
    /// Rainfall in mm/h for each [`RainLevel`].
    pub rain_mm_per_hour: [f64; 4],
    /// Relative standard deviation of per-cell rainfall.
    pub rain_noise: f64,
    /// Evaporation in mm/h per °C above the threshold, for saturated soil.
    pub evap_base_coeff: f64,
    /// Temperature below which nothing evaporates, °C.
    pub evap_temp_threshold: f64,
    /// Relative change of plant uptake per °C away from the reference.
    pub uptake_temp_slope: f64,
    /// Temperature at which plant uptake equals the table value, °C.
    pub uptake_temp_reference: f64,
    /// Relaxation toward the neighbour mean per tick.
    pub diffusion_coef: f64,
    /// Moisture above which water runs off, percent.
    pub field_capacity: f64,
    /// Fraction of the excess over field capacity drained per tick.
    pub leach_coeff: f64,
    /// Percentage points added at the target cell per litre/hour of irrigation.
    pub irrigation_pct_per_litre: f64,
    /// Initial moisture is drawn from triangular(low, mode, high).
    pub initial: [f64; 3],
}

impl Default for MoistureParams {
    fn default() -> Self {
        Self {
            mm_to_pct: 0.25,
            rain_mm_per_hour: [0.0, 1.0, 3.0, 5.0],
            rain_noise: 0.05,
            evap_base_coeff: 0.05,
            evap_temp_threshold: 5.0,
            uptake_temp_slope: 0.03,
            uptake_temp_reference: 20.0,
            diffusion_coef: 0.12,
            field_capacity: 90.0,
            leach_coeff: 0.2,
            irrigation_pct_per_litre: 0.25,
            initial: [75.0, 80.0, 85.0],
        }
    }
}

impl MoistureParams {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::finite_non_negative("moisture.mm_to_pct", self.mm_to_pct)?;
        for &mm in &self.rain_mm_per_hour {
            ParamError::finite_non_negative("moisture.rain_mm_per_hour", mm)?;
        }
        ParamError::finite_non_negative("moisture.rain_noise", self.rain_noise)?;
        ParamError::finite_non_negative("moisture.evap_base_coeff", self.evap_base_coeff)?;
        ParamError::finite("moisture.evap_temp_threshold", self.evap_temp_threshold)?;
        ParamError::finite_non_negative("moisture.uptake_temp_slope", self.uptake_temp_slope)?;
        ParamError::finite("moisture.uptake_temp_reference", self.uptake_temp_reference)?;
        ParamError::probability("moisture.diffusion_coef", self.diffusion_coef)?;
        ParamError::percent("moisture.field_capacity", self.field_capacity)?;
        ParamError::probability("moisture.leach_coeff", self.leach_coeff)?;
        ParamError::finite_non_negative(
            "moisture.irrigation_pct_per_litre",
            self.irrigation_pct_per_litre,
        )?;
        let [low, mode, high] = self.initial;
        ParamError::percent("moisture.initial", low)?;
        ParamError::percent("moisture.initial", high)?;
        ParamError::ordered("moisture.initial", low, mode)?;
        ParamError::ordered("moisture.initial", mode, high)?;
        Ok(())
    }
}

/// What the moisture balance reads besides its own grid.
#[derive(Clone, Copy, Debug)]
pub struct MoistureInputs<'a> {
    /// Current rain level.
    pub rain: RainLevel,
    /// Air temperature, °C.
    pub temperature: f64,
    /// Nutrient grid before leaching.
    pub nutrients: &'a Grid<f64>,
    /// Crop state (stage and species drive uptake).
    pub crop: &'a CropModel,
    /// Tick length, hours.
    pub dt_hours: f64,
}

/// Result of [`MoistureModel::update`].
#[derive(Clone, Debug, PartialEq)]
pub struct MoistureUpdate {
    /// Moisture after the tick.
    pub moisture: Grid<f64>,
    /// Nutrients after leaching losses.
    pub nutrients: Grid<f64>,
}

/// Soil moisture grid, percent.
#[derive(Clone, Debug, PartialEq)]
pub struct MoistureModel {
    levels: Grid<f64>,
    params: MoistureParams,
}

impl MoistureModel {
    /// A model starting from `levels`.
    pub fn new(levels: Grid<f64>, params: MoistureParams) -> Self {
        Self { levels, params }
    }

    /// A model whose initial levels are drawn from the configured
    /// triangular distribution.
    pub fn seeded<R: Rng + ?Sized>(shape: GridShape, params: MoistureParams, rng: &mut R) -> Self {
        let [low, mode, high] = params.initial;
        let levels = Grid::from_fn(shape, |_, _| sampling::triangular(rng, low, mode, high));
        Self { levels, params }
    }

    /// Moisture of every cell, percent.
    pub fn levels(&self) -> &Grid<f64> {
        &self.levels
    }

    /// The model parameters.
    pub fn params(&self) -> &MoistureParams {
        &self.params
    }

    /// Replace the moisture grid.
    ///
    /// # Panics
    ///
    /// Panics if `levels` has a different shape.
    pub fn set_levels(&mut self, levels: Grid<f64>) {
        assert_eq!(levels.shape(), self.levels.shape(), "moisture grid shape mismatch");
        self.levels = levels;
    }

    /// Compute the moisture and leached nutrient grids after one tick.
    ///
    /// Reads the current grid and leaves it unchanged.
    ///
    /// # Panics
    ///
    /// Panics if an input grid or `torus` does not match this model's shape.
    pub fn update<R: Rng + ?Sized>(
        &self,
        torus: &Torus8,
        inputs: &MoistureInputs<'_>,
        rng: &mut R,
    ) -> MoistureUpdate {
        let p = &self.params;
        let dt = inputs.dt_hours;
        let m = &self.levels;
        assert_eq!(inputs.nutrients.shape(), m.shape(), "nutrient grid shape mismatch");
        assert_eq!(inputs.crop.shape(), m.shape(), "crop grid shape mismatch");

        let rain_pct = p.rain_mm_per_hour[inputs.rain.index()] * dt * p.mm_to_pct;
        let evap_pct = p.evap_base_coeff
            * (inputs.temperature - p.evap_temp_threshold).max(0.0)
            * dt
            * p.mm_to_pct;
        let uptake_temp = (1.0 + p.uptake_temp_slope * (inputs.temperature - p.uptake_temp_reference)).max(0.0);

        let diffusion = torus.diffusion_delta(m, p.diffusion_coef);
        let stages = inputs.crop.stages();
        let plants = inputs.crop.plants();
        let table = inputs.crop.table();

        let mut moisture = m.clone();
        let mut nutrients = inputs.nutrients.clone();
        for i in 0..m.len() {
            let mi = m[i];

            let rain = if rain_pct > 0.0 {
                rain_pct * (1.0 + sampling::normal(rng, 0.0, p.rain_noise))
            } else {
                0.0
            };
            let evaporation = (evap_pct / 100.0).min(1.0) * mi;

            let uptake = match plants[i] {
                Some(plant) if stages[i].is_planted() => {
                    let base = table.uptake(stages[i], Some(plant)) * dt * uptake_temp * p.mm_to_pct;
                    let s = stress::moisture_stress(mi, table.ideal(plant), table.tolerance(plant));
                    (base * s).min(mi)
                }
                _ => 0.0,
            };

            let mut next = mi + rain - evaporation - uptake + diffusion[i];
            let excess = (next - p.field_capacity).max(0.0);
            if excess > 0.0 {
                let leached = excess * p.leach_coeff;
                next -= leached;
                let n = nutrients[i];
                nutrients[i] = (n - n * (leached / 100.0).min(1.0)).clamp(0.0, 100.0);
            }
            moisture[i] = next.clamp(0.0, 100.0);
        }

        MoistureUpdate {
            moisture,
            nutrients,
        }
    }

    /// Irrigate `(row, col)` at `flow_rate` litres per hour.
    ///
    /// Adds moisture at the cell, runs one diffusion pass over the whole
    /// perturbed grid, and clips. On error nothing is changed.
    pub fn apply_irrigation(
        &mut self,
        torus: &Torus8,
        row: u32,
        col: u32,
        flow_rate: f64,
    ) -> Result<(), FieldError> {
        let i = self.levels.shape().index(row, col)?;
        let flow_rate = FieldError::non_negative("flow_rate", flow_rate)?;
        let mut perturbed = self.levels.clone();
        perturbed[i] += flow_rate * self.params.irrigation_pct_per_litre;
        let mut next = torus.diffuse(&perturbed, self.params.diffusion_coef);
        next.clamp_all(0.0, 100.0);
        self.levels = next;
        Ok(())
    }
}
