//! The field orchestrator.
//!
//! [`Field`] owns every sub-model, the clock, the event flags, and the
//! random generator. Each [`step()`](Field::step) advances the clock by one
//! tick and runs the models in dependency order:
//!
//! ```text
//! clock -> temperature -> rain -> moisture (+ leaching) -> nutrients
//!       -> pest (while active) -> crop
//! ```
//!
//! # Ownership model
//!
//! `Field` is [`Send`] and mutated only through `&mut self`. To share it
//! between threads wrap it in a [`SharedField`](crate::SharedField).
//!
//! # Atomicity
//!
//! A step computes every new grid, the new rain state, and the advanced
//! generator into locals and assigns them only at the end, so a panic in
//! the middle of a tick leaves the previous state intact. Actuation calls
//! validate all inputs before writing anything.

use std::time::Instant;

use furrow_core::{
    DroneReading, EventControl, FieldAccess, FieldError, Grid, GridShape, PlantType, RainLevel,
    SoilReading,
};
use furrow_models::{
    CropModel, MoistureInputs, MoistureModel, MoistureUpdate, NutrientInputs, NutrientModel,
    PestModel, RainModel, TemperatureModel,
};
use furrow_space::Torus8;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{ConfigError, FieldConfig};
use crate::metrics::StepMetrics;

// Compile-time assertion: Field is Send.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Field>();
    }
};

/// Days in the simulated year.
pub const DAYS_PER_YEAR: u32 = 365;

/// Advance `(day, hour)` by `hours`. Days run `1..=365` and wrap back to 1.
///
/// Computed in `u64`, so any `u32` inputs are accepted.
pub fn advance_clock(day: u32, hour: u32, hours: u32) -> (u32, u32) {
    let total = u64::from(hour) + u64::from(hours);
    let year = u64::from(DAYS_PER_YEAR);
    let day = (u64::from(day.saturating_sub(1)) + total / 24) % year + 1;
    (day as u32, (total % 24) as u32)
}

// ── Field ──────────────────────────────────────────────────────────

/// A simulated agricultural field.
///
/// # Example
///
/// ```
/// use furrow_engine::{Field, FieldConfig};
///
/// let mut field = Field::new(FieldConfig::with_size(4, 4))?;
/// field.plant_seed(0, 0, 2)?;
/// for _ in 0..24 {
///     field.step();
/// }
/// assert_eq!(field.day(), 184);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    torus: Torus8,
    rng: ChaCha8Rng,
    tick_hours: u32,
    pesticide_neighbor_effect: f64,

    day: u32,
    hour: u32,
    tick: u64,
    drought: bool,
    pest_active: bool,
    temperature: f64,

    temperature_model: TemperatureModel,
    rain: RainModel,
    moisture: MoistureModel,
    nutrients: NutrientModel,
    pest: PestModel,
    crop: CropModel,

    last_metrics: StepMetrics,
}

impl Field {
    /// Build a field from `config`, seeding its generator from
    /// `config.seed`.
    ///
    /// Validates the configuration first.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Build a field that draws from `rng` instead of a generator seeded
    /// from `config.seed`.
    ///
    /// The generator type is fixed to [`ChaCha8Rng`] because the field
    /// stores and clones it every tick. To drive a sub-model with another
    /// generator, call its `update` directly; those accept any
    /// `R: Rng + ?Sized`.
    ///
    /// Initial moisture and nutrients are drawn from their triangular
    /// distributions, then the starting temperature is read.
    pub fn with_rng(config: FieldConfig, mut rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let torus = Torus8::new(config.rows, config.cols)?;
        let shape = torus.shape();

        let moisture = MoistureModel::seeded(shape, config.moisture, &mut rng);
        let nutrients = NutrientModel::seeded(shape, config.nutrients, &mut rng);
        let temperature_model = TemperatureModel::new(config.temperature);
        let temperature = temperature_model.update(config.start_day, config.start_hour, &mut rng);

        info!(
            rows = config.rows,
            cols = config.cols,
            tick_hours = config.tick_hours,
            seed = config.seed,
            day = config.start_day,
            hour = config.start_hour,
            "field created"
        );

        Ok(Self {
            torus,
            rng,
            tick_hours: config.tick_hours,
            pesticide_neighbor_effect: config.pesticide_neighbor_effect,
            day: config.start_day,
            hour: config.start_hour,
            tick: 0,
            drought: false,
            pest_active: false,
            temperature,
            temperature_model,
            rain: RainModel::new(config.rain),
            moisture,
            nutrients,
            pest: PestModel::new(shape, config.pest),
            crop: CropModel::new(shape, config.plants, config.crop),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Run one tick and return its metrics.
    pub fn step(&mut self) -> StepMetrics {
        let tick_start = Instant::now();
        let dt = f64::from(self.tick_hours);
        let mut rng = self.rng.clone();

        // 1. Clock and weather.
        let weather_start = Instant::now();
        let (day, hour) = advance_clock(self.day, self.hour, self.tick_hours);
        let temperature = self.temperature_model.update(day, hour, &mut rng);
        let mut rain = self.rain.clone();
        rain.update(day, self.drought, dt, &mut rng);
        let weather_us = weather_start.elapsed().as_micros() as u64;

        // 2. Water balance; leaching also draws down nutrients.
        let moisture_start = Instant::now();
        let MoistureUpdate {
            moisture,
            nutrients: leached,
        } = self.moisture.update(
            &self.torus,
            &MoistureInputs {
                rain: rain.level(),
                temperature,
                nutrients: self.nutrients.levels(),
                crop: &self.crop,
                dt_hours: dt,
            },
            &mut rng,
        );
        let moisture_us = moisture_start.elapsed().as_micros() as u64;

        // 3. Nutrient balance on the leached grid.
        let nutrients_start = Instant::now();
        let mut nutrient_model = self.nutrients.clone();
        nutrient_model.set_levels(leached);
        let nutrients = nutrient_model.update(
            &self.torus,
            &NutrientInputs {
                drought: self.drought,
                temperature,
                moisture: &moisture,
                crop: &self.crop,
                pest: self.pest.infested(),
                dt_hours: dt,
            },
        );
        nutrient_model.set_levels(nutrients);
        let nutrients_us = nutrients_start.elapsed().as_micros() as u64;

        // 4. Pest spread, only while the pest system is active.
        let pest_start = Instant::now();
        let (infested, pest_active) = if self.pest_active {
            let next = self.pest.spread(&self.torus, &mut rng);
            let active = next.count_true() > 0;
            (next, active)
        } else {
            (self.pest.infested().clone(), false)
        };
        let pest_us = pest_start.elapsed().as_micros() as u64;

        // 5. Crop life cycle on the updated grids.
        let crop_start = Instant::now();
        let mut crop = self.crop.clone();
        let transitions = crop.update(&moisture, nutrient_model.levels(), temperature, &infested, dt);
        let crop_us = crop_start.elapsed().as_micros() as u64;

        // Commit.
        if self.pest_active && !pest_active {
            debug!(tick = self.tick + 1, "pest system deactivated");
        }
        let infested_cells = infested.count_true();
        self.rng = rng;
        self.day = day;
        self.hour = hour;
        self.tick += 1;
        self.temperature = temperature;
        self.rain = rain;
        self.moisture.set_levels(moisture);
        self.nutrients = nutrient_model;
        self.pest.set_infested(infested);
        self.pest_active = pest_active;
        self.crop = crop;

        debug!(
            tick = self.tick,
            day,
            hour,
            temperature,
            rain = ?self.rain.level(),
            infested_cells,
            "tick complete"
        );

        let metrics = StepMetrics {
            tick: self.tick,
            total_us: tick_start.elapsed().as_micros() as u64,
            weather_us,
            moisture_us,
            nutrients_us,
            pest_us,
            crop_us,
            infested_cells,
            stage_transitions: transitions.advanced,
            crop_deaths: transitions.died,
        };
        self.last_metrics = metrics.clone();
        metrics
    }

    // ── Read-only views ────────────────────────────────────────────

    /// Dimensions of the field.
    pub fn shape(&self) -> GridShape {
        self.torus.shape()
    }

    /// Current day-of-year, `1..=365`.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Current hour, `0..24`.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Hours per tick.
    pub fn tick_hours(&self) -> u32 {
        self.tick_hours
    }

    /// Air temperature of the last tick, °C.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Whether the drought flag is set.
    pub fn is_drought(&self) -> bool {
        self.drought
    }

    /// Whether the pest system is spreading.
    pub fn is_pest_active(&self) -> bool {
        self.pest_active
    }

    /// The rain process.
    pub fn rain(&self) -> &RainModel {
        &self.rain
    }

    /// Soil moisture grid, percent.
    pub fn moisture(&self) -> &Grid<f64> {
        self.moisture.levels()
    }

    /// Soil nutrient grid, percent.
    pub fn nutrients(&self) -> &Grid<f64> {
        self.nutrients.levels()
    }

    /// Infestation grid.
    pub fn pest(&self) -> &Grid<bool> {
        self.pest.infested()
    }

    /// The pest model, including spread weights.
    pub fn pest_model(&self) -> &PestModel {
        &self.pest
    }

    /// The crop model.
    pub fn crop(&self) -> &CropModel {
        &self.crop
    }

    /// The lattice the field diffuses over.
    pub fn torus(&self) -> &Torus8 {
        &self.torus
    }

    /// Metrics of the most recent [`step()`](Self::step).
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    // ── Actuation ──────────────────────────────────────────────────

    /// Force a rain episode at `intensity` (`1..=3`), lasting a random
    /// number of hours drawn for the current season.
    pub fn apply_rain(&mut self, intensity: u8) -> Result<(), FieldError> {
        let level = RainLevel::from_intensity(intensity)?;
        self.rain.apply(level, self.day, &mut self.rng);
        info!(?level, hours = self.rain.remaining_hours(), "rain forced");
        Ok(())
    }

    /// End any active rain episode.
    pub fn stop_rain(&mut self) {
        if self.rain.level().is_raining() {
            info!("rain stopped");
        }
        self.rain.stop();
    }

    /// Flip the drought flag and return the new state.
    pub fn toggle_drought(&mut self) -> bool {
        self.drought = !self.drought;
        info!(drought = self.drought, "drought toggled");
        self.drought
    }

    /// Activate the pest system and infest one random cell.
    pub fn apply_pest(&mut self) -> (u32, u32) {
        self.pest_active = true;
        let (row, col) = self.pest.infest_random(&mut self.rng);
        info!(row, col, "pest outbreak");
        (row, col)
    }

    /// Clear every infestation, reset spread weights, and deactivate the
    /// pest system.
    pub fn remove_pest(&mut self) {
        self.pest.clear();
        self.pest_active = false;
        info!("pests removed");
    }

    /// Spray `(row, col)`: clear it and damp its future spread.
    pub fn apply_pesticide(&mut self, row: u32, col: u32) -> Result<(), FieldError> {
        self.pest
            .apply_pesticide(row, col, self.pesticide_neighbor_effect)
    }

    /// Irrigate `(row, col)` at `flow_rate` litres per hour, followed by
    /// one diffusion pass.
    pub fn apply_irrigation(&mut self, row: u32, col: u32, flow_rate: f64) -> Result<(), FieldError> {
        self.moisture
            .apply_irrigation(&self.torus, row, col, flow_rate)
    }

    /// Spread `amount_kg` of fertilizer on `(row, col)`.
    pub fn apply_fertilize(&mut self, row: u32, col: u32, amount_kg: f64) -> Result<(), FieldError> {
        self.nutrients.apply_fertilize(row, col, amount_kg)
    }

    /// Sow species `plant_type` (`0..6`) at `(row, col)`.
    pub fn plant_seed(&mut self, row: u32, col: u32, plant_type: u8) -> Result<(), FieldError> {
        self.shape().index(row, col)?;
        let plant = PlantType::new(plant_type)?;
        self.crop.plant_seed(row, col, plant)
    }

    /// Harvest `(row, col)`, returning the crop's health and emptying the
    /// cell.
    pub fn harvest(&mut self, row: u32, col: u32) -> Result<f64, FieldError> {
        self.crop.harvest(row, col)
    }

    // ── Sensing ────────────────────────────────────────────────────

    /// Soil probe reading at `(row, col)`.
    pub fn get_soil(&self, row: u32, col: u32) -> Result<SoilReading, FieldError> {
        let i = self.shape().index(row, col)?;
        Ok(SoilReading {
            temperature: self.temperature,
            nutrients: self.nutrients.levels()[i],
            moisture: self.moisture.levels()[i],
        })
    }

    /// Aerial survey reading at `(row, col)`.
    pub fn get_drone(&self, row: u32, col: u32) -> Result<DroneReading, FieldError> {
        let i = self.shape().index(row, col)?;
        let stage = self.crop.stages()[i];
        Ok(DroneReading {
            stage,
            plant: self.crop.plants()[i].filter(|_| stage.is_planted()),
            pest: self.pest.infested()[i],
        })
    }
}

impl FieldAccess for Field {
    fn shape(&self) -> GridShape {
        Field::shape(self)
    }

    fn get_soil(&self, row: u32, col: u32) -> Result<SoilReading, FieldError> {
        Field::get_soil(self, row, col)
    }

    fn get_drone(&self, row: u32, col: u32) -> Result<DroneReading, FieldError> {
        Field::get_drone(self, row, col)
    }

    fn apply_irrigation(&mut self, row: u32, col: u32, flow_rate: f64) -> Result<(), FieldError> {
        Field::apply_irrigation(self, row, col, flow_rate)
    }

    fn apply_fertilize(&mut self, row: u32, col: u32, amount_kg: f64) -> Result<(), FieldError> {
        Field::apply_fertilize(self, row, col, amount_kg)
    }

    fn apply_pesticide(&mut self, row: u32, col: u32) -> Result<(), FieldError> {
        Field::apply_pesticide(self, row, col)
    }

    fn plant_seed(&mut self, row: u32, col: u32, plant_type: u8) -> Result<(), FieldError> {
        Field::plant_seed(self, row, col, plant_type)
    }

    fn harvest(&mut self, row: u32, col: u32) -> Result<f64, FieldError> {
        Field::harvest(self, row, col)
    }
}

impl EventControl for Field {
    fn apply_rain(&mut self, intensity: u8) -> Result<(), FieldError> {
        Field::apply_rain(self, intensity)
    }

    fn stop_rain(&mut self) {
        Field::stop_rain(self)
    }

    fn toggle_drought(&mut self) -> bool {
        Field::toggle_drought(self)
    }

    fn apply_pest(&mut self) -> (u32, u32) {
        Field::apply_pest(self)
    }

    fn remove_pest(&mut self) {
        Field::remove_pest(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furrow_core::CropStage;

    fn field(rows: u32, cols: u32) -> Field {
        Field::new(FieldConfig {
            seed: 42,
            ..FieldConfig::with_size(rows, cols)
        })
        .unwrap()
    }

    // ── Clock ──────────────────────────────────────────────────────

    #[test]
    fn clock_wraps_hours_and_days() {
        assert_eq!(advance_clock(183, 10, 1), (183, 11));
        assert_eq!(advance_clock(183, 23, 1), (184, 0));
        assert_eq!(advance_clock(365, 23, 1), (1, 0));
        assert_eq!(advance_clock(364, 20, 6), (365, 2));
        assert_eq!(advance_clock(10, 0, 48), (12, 0));
        assert_eq!(advance_clock(365, 12, 24 * 365), (365, 12));
    }

    #[test]
    fn clock_handles_extreme_tick_lengths() {
        assert_eq!(advance_clock(1, 23, u32::MAX), (27, 14));
        assert_eq!(advance_clock(0, 0, 24), (2, 0));
    }

    #[test]
    fn longest_valid_tick_steps_without_panicking() {
        let mut f = Field::new(FieldConfig {
            tick_hours: crate::config::MAX_TICK_HOURS,
            ..FieldConfig::with_size(2, 2)
        })
        .unwrap();
        f.plant_seed(0, 0, 1).unwrap();
        f.apply_pest();
        f.step();
        assert_eq!((f.day(), f.hour()), (183, 10));
        assert!(f.moisture().iter().all(|v| (0.0..=100.0).contains(v)));
        assert!(f.nutrients().iter().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn step_advances_clock_and_tick() {
        let mut f = field(3, 3);
        assert_eq!((f.day(), f.hour(), f.tick()), (183, 10, 0));
        for _ in 0..14 {
            f.step();
        }
        assert_eq!((f.day(), f.hour(), f.tick()), (184, 0, 14));
        assert_eq!(f.last_metrics().tick, 14);
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn new_rejects_invalid_config() {
        assert!(Field::new(FieldConfig::with_size(0, 3)).is_err());
        let cfg = FieldConfig {
            tick_hours: 0,
            ..FieldConfig::default()
        };
        assert!(Field::new(cfg).is_err());
    }

    #[test]
    fn initial_state_is_seeded_and_clear() {
        let f = field(4, 5);
        assert_eq!(f.shape(), GridShape::new(4, 5));
        assert!(f.moisture().iter().all(|m| (75.0..=85.0).contains(m)));
        assert!(f.nutrients().iter().all(|n| (50.0..=70.0).contains(n)));
        assert_eq!(f.pest().count_true(), 0);
        assert_eq!(f.crop().planted_count(), 0);
        assert!(!f.is_drought());
        assert!(!f.is_pest_active());
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = field(4, 4);
        let mut b = field(4, 4);
        a.plant_seed(1, 1, 3).unwrap();
        b.plant_seed(1, 1, 3).unwrap();
        a.apply_pest();
        b.apply_pest();
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert_eq!(a.moisture(), b.moisture());
        assert_eq!(a.nutrients(), b.nutrients());
        assert_eq!(a.pest(), b.pest());
        assert_eq!(a.crop(), b.crop());
        assert_eq!(a.temperature(), b.temperature());
    }

    #[test]
    fn injected_generator_replaces_config_seed() {
        let cfg = FieldConfig {
            seed: 42,
            ..FieldConfig::with_size(4, 4)
        };
        let same = Field::with_rng(cfg.clone(), ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(same.moisture(), field(4, 4).moisture());

        let other = Field::with_rng(cfg, ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_ne!(other.moisture(), field(4, 4).moisture());
    }

    // ── Actuation ──────────────────────────────────────────────────

    #[test]
    fn plant_then_harvest_yields_full_health() {
        let mut f = field(3, 3);
        f.plant_seed(2, 1, 5).unwrap();
        let drone = f.get_drone(2, 1).unwrap();
        assert_eq!(drone.stage, CropStage::Seed);
        assert_eq!(drone.plant.map(PlantType::get), Some(5));
        assert_eq!(f.harvest(2, 1).unwrap(), 100.0);
        assert_eq!(f.get_drone(2, 1).unwrap().stage, CropStage::Empty);
        assert_eq!(f.harvest(2, 1).unwrap(), 0.0);
    }

    #[test]
    fn invalid_actuation_is_rejected_without_mutation() {
        let mut f = field(3, 3);
        let moisture = f.moisture().clone();
        let nutrients = f.nutrients().clone();
        assert!(matches!(
            f.plant_seed(0, 0, 6),
            Err(FieldError::InvalidPlantType(6))
        ));
        assert!(matches!(f.plant_seed(3, 0, 1), Err(FieldError::OutOfBounds { .. })));
        assert!(f.apply_irrigation(0, 0, -1.0).is_err());
        assert!(f.apply_irrigation(0, 9, 1.0).is_err());
        assert!(f.apply_fertilize(0, 0, f64::NAN).is_err());
        assert!(f.apply_pesticide(9, 9).is_err());
        assert!(matches!(f.apply_rain(0), Err(FieldError::InvalidRainIntensity(0))));
        assert!(matches!(f.apply_rain(4), Err(FieldError::InvalidRainIntensity(4))));
        assert!(f.get_soil(3, 3).is_err());
        assert_eq!(f.moisture(), &moisture);
        assert_eq!(f.nutrients(), &nutrients);
        assert_eq!(f.crop().planted_count(), 0);
        assert_eq!(f.rain().level(), RainLevel::None);
    }

    #[test]
    fn soil_reading_matches_grids() {
        let mut f = field(3, 3);
        f.apply_fertilize(1, 2, 1.0).unwrap();
        let soil = f.get_soil(1, 2).unwrap();
        assert_eq!(soil.temperature, f.temperature());
        assert_eq!(soil.nutrients, *f.nutrients().get(1, 2).unwrap());
        assert_eq!(soil.moisture, *f.moisture().get(1, 2).unwrap());
    }

    #[test]
    fn forced_rain_and_stop() {
        let mut f = field(3, 3);
        f.apply_rain(3).unwrap();
        assert_eq!(f.rain().level(), RainLevel::Heavy);
        f.stop_rain();
        assert_eq!(f.rain().level(), RainLevel::None);
        assert_eq!(f.rain().remaining_hours(), 0.0);
    }

    #[test]
    fn drought_toggles() {
        let mut f = field(2, 2);
        assert!(f.toggle_drought());
        assert!(f.is_drought());
        assert!(!f.toggle_drought());
    }

    #[test]
    fn pest_lifecycle() {
        let mut f = field(5, 5);
        let (r, c) = f.apply_pest();
        assert!(f.is_pest_active());
        assert!(f.get_drone(r, c).unwrap().pest);
        f.remove_pest();
        assert!(!f.is_pest_active());
        assert_eq!(f.pest().count_true(), 0);
    }

    #[test]
    fn pest_system_deactivates_when_extinct() {
        let mut f = field(5, 5);
        let (r, c) = f.apply_pest();
        f.apply_pesticide(r, c).unwrap();
        assert!(f.is_pest_active());
        let m = f.step();
        assert_eq!(m.infested_cells, 0);
        assert!(!f.is_pest_active());
    }

    #[test]
    fn inactive_pests_do_not_spread() {
        let mut cfg = FieldConfig::with_size(5, 5);
        cfg.pest.p_spread = 1.0;
        let mut f = Field::new(cfg).unwrap();
        f.apply_pest();
        f.step();
        assert_eq!(f.pest().count_true(), 9);
        f.remove_pest();
        f.step();
        assert_eq!(f.pest().count_true(), 0);
    }
}
