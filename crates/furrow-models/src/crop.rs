//! Per-cell crop life cycle: growth through stages, health under stress,
//! rot after maturity, and death.
//!
//! # Tick order
//!
//! For every planted cell, with `s` the combined stress factor (product of
//! moisture, nutrient, and temperature stress):
//!
//! 1. Health changes by `regen(s) - (1 - s) * dt - pest_damage * dt`.
//! 2. Mature cells accumulate `dt / 24` days; past the species' rot delay
//!    they lose `rot_rate * dt / 24` health.
//! 3. Health is clipped to `[0, 100]`; a cell at 0 dies and resets.
//! 4. Surviving cells below maturity count down `dt * s` hours and advance
//!    a stage when the countdown reaches 0.

use furrow_core::{CropStage, FieldError, Grid, GridShape, PlantType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParamError;
use crate::plant::PlantTable;
use crate::stress;

/// Health dynamics parameters shared by all species.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParams {
    /// Lower edge of the stress-free temperature band, °C.
    pub optimal_temperature_low: f64,
    /// Upper edge of the stress-free temperature band, °C.
    pub optimal_temperature_high: f64,
    /// Distance outside the band at which temperature stress reaches 0.
    pub temperature_falloff: f64,
    /// Nutrient level at and above which there is no nutrient stress.
    pub nutrient_saturation: f64,
    /// Health lost per hour at full stress.
    pub stress_damage_per_hour: f64,
    /// Combined stress above which a plant regenerates.
    pub regen_threshold: f64,
    /// Health regained per hour with no stress.
    pub regen_per_hour: f64,
    /// Health lost per hour on an infested cell.
    pub pest_damage_per_hour: f64,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            optimal_temperature_low: 15.0,
            optimal_temperature_high: 30.0,
            temperature_falloff: 10.0,
            nutrient_saturation: 40.0,
            stress_damage_per_hour: 1.0,
            regen_threshold: 0.5,
            regen_per_hour: 2.0,
            pest_damage_per_hour: 2.0,
        }
    }
}

impl CropParams {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::ordered(
            "crop.optimal_temperature_low",
            self.optimal_temperature_low,
            self.optimal_temperature_high,
        )?;
        ParamError::positive("crop.temperature_falloff", self.temperature_falloff)?;
        ParamError::positive("crop.nutrient_saturation", self.nutrient_saturation)?;
        ParamError::finite_non_negative("crop.stress_damage_per_hour", self.stress_damage_per_hour)?;
        if !(0.0..1.0).contains(&self.regen_threshold) {
            return Err(ParamError {
                name: "crop.regen_threshold",
                value: self.regen_threshold,
                expected: "in [0, 1)",
            });
        }
        ParamError::finite_non_negative("crop.regen_per_hour", self.regen_per_hour)?;
        ParamError::finite_non_negative("crop.pest_damage_per_hour", self.pest_damage_per_hour)?;
        Ok(())
    }

    /// Temperature stress, uniform over the field.
    pub fn temperature_stress(&self, temperature: f64) -> f64 {
        stress::plateau(
            temperature,
            self.optimal_temperature_low,
            self.optimal_temperature_high,
            self.temperature_falloff,
        )
    }

    /// Nutrient stress for a nutrient level.
    pub fn nutrient_stress(&self, nutrients: f64) -> f64 {
        stress::ramp(nutrients, 0.0, self.nutrient_saturation)
    }

    /// Health regained per hour at combined stress `s`.
    pub fn regeneration(&self, s: f64) -> f64 {
        let span = 1.0 - self.regen_threshold;
        ((s - self.regen_threshold) / span).clamp(0.0, 1.0) * self.regen_per_hour
    }
}

/// Counts of life-cycle events produced by one [`CropModel::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CropTransitions {
    /// Cells that advanced one stage.
    pub advanced: usize,
    /// Cells that reached maturity (included in `advanced`).
    pub matured: usize,
    /// Planted cells whose health reached 0.
    pub died: usize,
}

/// Per-cell crop state, stored as parallel grids.
///
/// An empty cell always has no species and zero health, hours, and
/// days-mature.
#[derive(Clone, Debug, PartialEq)]
pub struct CropModel {
    stage: Grid<CropStage>,
    plant: Grid<Option<PlantType>>,
    health: Grid<f64>,
    hours_remaining: Grid<f64>,
    days_mature: Grid<f64>,
    table: PlantTable,
    params: CropParams,
}

impl CropModel {
    /// An empty field of the given shape.
    pub fn new(shape: GridShape, table: PlantTable, params: CropParams) -> Self {
        Self {
            stage: Grid::filled(shape, CropStage::Empty),
            plant: Grid::filled(shape, None),
            health: Grid::filled(shape, 0.0),
            hours_remaining: Grid::filled(shape, 0.0),
            days_mature: Grid::filled(shape, 0.0),
            table,
            params,
        }
    }

    /// Grid dimensions.
    pub fn shape(&self) -> GridShape {
        self.stage.shape()
    }

    /// Stage of every cell.
    pub fn stages(&self) -> &Grid<CropStage> {
        &self.stage
    }

    /// Species of every cell.
    pub fn plants(&self) -> &Grid<Option<PlantType>> {
        &self.plant
    }

    /// Health of every cell, percent.
    pub fn health(&self) -> &Grid<f64> {
        &self.health
    }

    /// Hours left before each cell's next stage transition.
    pub fn hours_remaining(&self) -> &Grid<f64> {
        &self.hours_remaining
    }

    /// Days each mature cell has spent at maturity.
    pub fn days_mature(&self) -> &Grid<f64> {
        &self.days_mature
    }

    /// Per-species parameter tables.
    pub fn table(&self) -> &PlantTable {
        &self.table
    }

    /// Health dynamics parameters.
    pub fn params(&self) -> &CropParams {
        &self.params
    }

    /// Number of planted cells.
    pub fn planted_count(&self) -> usize {
        self.stage.iter().filter(|s| s.is_planted()).count()
    }

    /// Sow `plant` at `(row, col)`, replacing whatever was there.
    pub fn plant_seed(&mut self, row: u32, col: u32, plant: PlantType) -> Result<(), FieldError> {
        let i = self.shape().index(row, col)?;
        self.stage[i] = CropStage::Seed;
        self.plant[i] = Some(plant);
        self.health[i] = 100.0;
        self.hours_remaining[i] = self
            .table
            .stage_duration(plant, CropStage::Seed)
            .unwrap_or(0.0);
        self.days_mature[i] = 0.0;
        Ok(())
    }

    /// Harvest `(row, col)`: return its health and reset it to empty.
    ///
    /// Harvesting an empty cell yields 0 and changes nothing.
    pub fn harvest(&mut self, row: u32, col: u32) -> Result<f64, FieldError> {
        let i = self.shape().index(row, col)?;
        let yield_basis = self.health[i];
        self.clear_cell(i);
        Ok(yield_basis)
    }

    fn clear_cell(&mut self, i: usize) {
        self.stage[i] = CropStage::Empty;
        self.plant[i] = None;
        self.health[i] = 0.0;
        self.hours_remaining[i] = 0.0;
        self.days_mature[i] = 0.0;
    }

    /// Moisture stress times nutrient stress of cell `i`; 1 for empty cells.
    fn soil_stress_at(&self, i: usize, moisture: f64, nutrients: f64) -> f64 {
        match self.plant[i] {
            Some(p) if self.stage[i].is_planted() => {
                stress::moisture_stress(moisture, self.table.ideal(p), self.table.tolerance(p))
                    * self.params.nutrient_stress(nutrients)
            }
            _ => 1.0,
        }
    }

    /// Combined stress factor of every cell under the given conditions.
    ///
    /// Empty cells have neither moisture nor nutrient stress, so their
    /// value is the temperature stress alone.
    ///
    /// # Panics
    ///
    /// Panics if a grid does not match this model's shape.
    pub fn combined_stress(
        &self,
        moisture: &Grid<f64>,
        nutrients: &Grid<f64>,
        temperature: f64,
    ) -> Grid<f64> {
        assert_eq!(moisture.shape(), self.shape(), "moisture grid shape mismatch");
        assert_eq!(nutrients.shape(), self.shape(), "nutrient grid shape mismatch");
        let t = self.params.temperature_stress(temperature);
        Grid::from_fn(self.shape(), |r, c| {
            let i = r as usize * self.shape().cols() as usize + c as usize;
            self.soil_stress_at(i, moisture[i], nutrients[i]) * t
        })
    }

    /// Advance every planted cell by `dt_hours`.
    ///
    /// # Panics
    ///
    /// Panics if a grid does not match this model's shape.
    pub fn update(
        &mut self,
        moisture: &Grid<f64>,
        nutrients: &Grid<f64>,
        temperature: f64,
        pest: &Grid<bool>,
        dt_hours: f64,
    ) -> CropTransitions {
        assert_eq!(pest.shape(), self.shape(), "pest grid shape mismatch");
        let mut out = CropTransitions::default();
        if self.planted_count() == 0 {
            return out;
        }
        let combined = self.combined_stress(moisture, nutrients, temperature);
        let p = self.params.clone();

        for i in 0..self.stage.len() {
            let stage = self.stage[i];
            let Some(plant) = self.plant[i].filter(|_| stage.is_planted()) else {
                continue;
            };
            let s = combined[i];

            let pest_damage = if pest[i] { p.pest_damage_per_hour } else { 0.0 };
            let change = p.regeneration(s) * dt_hours
                - (1.0 - s) * p.stress_damage_per_hour * dt_hours
                - pest_damage * dt_hours;
            let mut health = self.health[i] + change;

            if stage == CropStage::Mature {
                self.days_mature[i] += dt_hours / 24.0;
                if self.days_mature[i] > self.table.days_before_rot[plant.index()] {
                    health -= self.table.rot_rate_per_day[plant.index()] * dt_hours / 24.0;
                }
            }

            let health = health.clamp(0.0, 100.0);
            if health <= 0.0 {
                self.clear_cell(i);
                out.died += 1;
                continue;
            }
            self.health[i] = health;

            if let Some(next) = stage.next() {
                self.hours_remaining[i] -= dt_hours * s;
                if self.hours_remaining[i] <= 0.0 {
                    self.stage[i] = next;
                    out.advanced += 1;
                    match self.table.stage_duration(plant, next) {
                        Some(hours) => self.hours_remaining[i] = hours,
                        None => {
                            self.hours_remaining[i] = 0.0;
                            self.days_mature[i] = 0.0;
                            out.matured += 1;
                        }
                    }
                }
            }
        }

        if out != CropTransitions::default() {
            debug!(
                advanced = out.advanced,
                matured = out.matured,
                died = out.died,
                "crop transitions"
            );
        }
        out
    }
}
