//! Soil nutrient balance.
//!
//! Per cell and per tick:
//!
//! 1. Plant uptake, proportional to the water-uptake table and damped by
//!    moisture adequacy, a temperature bell, and drought; capped at the
//!    available nutrients.
//! 2. Mineralisation, a small natural input that needs moist, mild soil.
//! 3. Pest loss, proportional to the infestation flag and the nutrient level,
//!    never more than the whole level.
//! 4. One diffusion pass over the intermediate grid, then clipping to
//!    `[0, 100]`.

use furrow_core::{FieldError, Grid, GridShape};
use furrow_space::Torus8;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::crop::CropModel;
use crate::error::ParamError;
use crate::sampling;
use crate::stress;

/// Nutrient balance parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientParams {
    /// Nutrient uptake per mm of water uptake.
    pub concentration_factor: f64,
    /// Viable temperature band `[low, high]` for uptake, °C.
    pub uptake_temp_band: [f64; 2],
    /// Floor on the uptake temperature factor.
    pub uptake_temp_floor: f64,
    /// Uptake multiplier while the drought flag is set.
    pub drought_uptake_factor: f64,
    /// Mineralisation per hour under ideal conditions, percentage points.
    pub mineral_base: f64,
    /// Viable temperature band `[low, high]` for mineralisation, °C.
    pub mineral_temp_band: [f64; 2],
    /// Moisture at which mineralisation starts, percent.
    pub mineral_moisture_start: f64,
    /// Moisture above the start at which mineralisation saturates.
    pub mineral_moisture_span: f64,
    /// Fraction of nutrients lost per hour on an infested cell.
    pub pest_loss_rate: f64,
    /// Relaxation toward the neighbour mean per tick.
    pub diffusion_coef: f64,
    /// Percentage points added per kg of fertilizer.
    pub kg_to_pct: f64,
    /// Initial nutrients are drawn from triangular(low, mode, high).
    pub initial: [f64; 3],
}

impl Default for NutrientParams {
    fn default() -> Self {
        Self {
            concentration_factor: 0.1,
            uptake_temp_band: [5.0, 45.0],
            uptake_temp_floor: 0.1,
            drought_uptake_factor: 0.8,
            mineral_base: 0.005,
            mineral_temp_band: [5.0, 55.0],
            mineral_moisture_start: 40.0,
            mineral_moisture_span: 40.0,
            pest_loss_rate: 0.02,
            diffusion_coef: 0.06,
            kg_to_pct: 10.0,
            initial: [50.0, 60.0, 70.0],
        }
    }
}

impl NutrientParams {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::finite_non_negative("nutrients.concentration_factor", self.concentration_factor)?;
        ParamError::ordered(
            "nutrients.uptake_temp_band",
            self.uptake_temp_band[0],
            self.uptake_temp_band[1],
        )?;
        ParamError::probability("nutrients.uptake_temp_floor", self.uptake_temp_floor)?;
        ParamError::probability("nutrients.drought_uptake_factor", self.drought_uptake_factor)?;
        ParamError::finite_non_negative("nutrients.mineral_base", self.mineral_base)?;
        ParamError::ordered(
            "nutrients.mineral_temp_band",
            self.mineral_temp_band[0],
            self.mineral_temp_band[1],
        )?;
        ParamError::percent("nutrients.mineral_moisture_start", self.mineral_moisture_start)?;
        ParamError::finite_non_negative("nutrients.mineral_moisture_span", self.mineral_moisture_span)?;
        ParamError::finite_non_negative("nutrients.pest_loss_rate", self.pest_loss_rate)?;
        ParamError::probability("nutrients.diffusion_coef", self.diffusion_coef)?;
        ParamError::finite_non_negative("nutrients.kg_to_pct", self.kg_to_pct)?;
        let [low, mode, high] = self.initial;
        ParamError::percent("nutrients.initial", low)?;
        ParamError::percent("nutrients.initial", high)?;
        ParamError::ordered("nutrients.initial", low, mode)?;
        ParamError::ordered("nutrients.initial", mode, high)?;
        Ok(())
    }

    fn uptake_temperature_factor(&self, temperature: f64) -> f64 {
        let [low, high] = self.uptake_temp_band;
        stress::temperature_bell(temperature, low, high).max(self.uptake_temp_floor)
    }

    fn mineralisation(&self, moisture: f64, temperature: f64, dt_hours: f64) -> f64 {
        let [low, high] = self.mineral_temp_band;
        self.mineral_base
            * stress::ramp(moisture, self.mineral_moisture_start, self.mineral_moisture_span)
            * stress::temperature_bell(temperature, low, high)
            * dt_hours
    }
}

/// What the nutrient balance reads besides its own grid.
#[derive(Clone, Copy, Debug)]
pub struct NutrientInputs<'a> {
    /// Drought flag.
    pub drought: bool,
    /// Air temperature, °C.
    pub temperature: f64,
    /// Moisture after this tick's water balance.
    pub moisture: &'a Grid<f64>,
    /// Crop state (stage and species drive uptake).
    pub crop: &'a CropModel,
    /// Infestation grid.
    pub pest: &'a Grid<bool>,
    /// Tick length, hours.
    pub dt_hours: f64,
}

/// Soil nutrient grid, percent.
#[derive(Clone, Debug, PartialEq)]
pub struct NutrientModel {
    levels: Grid<f64>,
    params: NutrientParams,
}

impl NutrientModel {
    /// A model starting from `levels`.
    pub fn new(levels: Grid<f64>, params: NutrientParams) -> Self {
        Self { levels, params }
    }

    /// A model whose initial levels are drawn from the configured
    /// triangular distribution.
    pub fn seeded<R: Rng + ?Sized>(shape: GridShape, params: NutrientParams, rng: &mut R) -> Self {
        let [low, mode, high] = params.initial;
        let levels = Grid::from_fn(shape, |_, _| sampling::triangular(rng, low, mode, high));
        Self { levels, params }
    }

    /// Nutrients of every cell, percent.
    pub fn levels(&self) -> &Grid<f64> {
        &self.levels
    }

    /// The model parameters.
    pub fn params(&self) -> &NutrientParams {
        &self.params
    }

    /// Replace the nutrient grid.
    ///
    /// # Panics
    ///
    /// Panics if `levels` has a different shape.
    pub fn set_levels(&mut self, levels: Grid<f64>) {
        assert_eq!(levels.shape(), self.levels.shape(), "nutrient grid shape mismatch");
        self.levels = levels;
    }

    /// Compute the nutrient grid after one tick, starting from the current
    /// grid (which already reflects leaching).
    ///
    /// # Panics
    ///
    /// Panics if an input grid or `torus` does not match this model's shape.
    pub fn update(&self, torus: &Torus8, inputs: &NutrientInputs<'_>) -> Grid<f64> {
        let p = &self.params;
        let dt = inputs.dt_hours;
        let n = &self.levels;
        assert_eq!(inputs.moisture.shape(), n.shape(), "moisture grid shape mismatch");
        assert_eq!(inputs.pest.shape(), n.shape(), "pest grid shape mismatch");
        assert_eq!(inputs.crop.shape(), n.shape(), "crop grid shape mismatch");

        let temp_factor = p.uptake_temperature_factor(inputs.temperature);
        let drought_factor = if inputs.drought {
            p.drought_uptake_factor
        } else {
            1.0
        };
        let stages = inputs.crop.stages();
        let plants = inputs.crop.plants();
        let table = inputs.crop.table();

        let mut next = n.clone();
        for i in 0..n.len() {
            let m = inputs.moisture[i];
            let uptake = match plants[i] {
                Some(plant) if stages[i].is_planted() => {
                    let adequacy = stress::moisture_adequacy(m, table.ideal(plant), table.tolerance(plant));
                    let base = table.uptake(stages[i], Some(plant)) * p.concentration_factor * dt;
                    (base * adequacy * temp_factor * drought_factor).min(n[i])
                }
                _ => 0.0,
            };
            let mut v = n[i] - uptake + p.mineralisation(m, inputs.temperature, dt);
            // Loss fraction is capped at 1; no cell enters diffusion negative.
            if inputs.pest[i] {
                v -= (p.pest_loss_rate * dt).min(1.0) * v;
            }
            next[i] = v;
        }

        let mut out = torus.diffuse(&next, p.diffusion_coef);
        out.clamp_all(0.0, 100.0);
        out
    }

    /// Spread `amount_kg` of fertilizer on `(row, col)`.
    ///
    /// Only the target cell changes; diffusion carries the effect on the
    /// next tick. On error nothing is changed.
    pub fn apply_fertilize(&mut self, row: u32, col: u32, amount_kg: f64) -> Result<(), FieldError> {
        let i = self.levels.shape().index(row, col)?;
        let amount_kg = FieldError::non_negative("amount_kg", amount_kg)?;
        let v = &mut self.levels[i];
        *v = (*v + amount_kg * self.params.kg_to_pct).min(100.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropParams;
    use crate::plant::PlantTable;
    use furrow_core::PlantType;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Env {
        torus: Torus8,
        moisture: Grid<f64>,
        crop: CropModel,
        pest: Grid<bool>,
    }

    fn env(rows: u32, cols: u32, moisture: f64) -> Env {
        let torus = Torus8::new(rows, cols).unwrap();
        let shape = torus.shape();
        Env {
            torus,
            moisture: Grid::filled(shape, moisture),
            crop: CropModel::new(shape, PlantTable::default(), CropParams::default()),
            pest: Grid::filled(shape, false),
        }
    }

    impl Env {
        fn inputs(&self, drought: bool, temperature: f64) -> NutrientInputs<'_> {
            NutrientInputs {
                drought,
                temperature,
                moisture: &self.moisture,
                crop: &self.crop,
                pest: &self.pest,
                dt_hours: 1.0,
            }
        }
    }

    #[test]
    fn default_params_validate() {
        assert!(NutrientParams::default().validate().is_ok());
    }

    #[test]
    fn seeded_levels_follow_initial_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let m = NutrientModel::seeded(GridShape::new(5, 5), NutrientParams::default(), &mut rng);
        assert!(m.levels().iter().all(|&v| (50.0..=70.0).contains(&v)));
    }

    #[test]
    fn bare_soil_only_mineralises() {
        let e = env(3, 3, 80.0);
        let m = NutrientModel::new(Grid::filled(e.torus.shape(), 50.0), NutrientParams::default());
        let out = m.update(&e.torus, &e.inputs(false, 30.0));
        // Full moisture ramp, temperature bell at its midpoint: +0.005.
        assert!(out.iter().all(|&v| (v - 50.005).abs() < 1e-12));
    }

    #[test]
    fn uptake_depends_on_drought() {
        let mut e = env(1, 1, 77.5);
        e.crop.plant_seed(0, 0, PlantType::new(0).unwrap()).unwrap();
        let m = NutrientModel::new(Grid::filled(e.torus.shape(), 50.0), NutrientParams::default());
        let wet = m.update(&e.torus, &e.inputs(false, 25.0))[0];
        let dry = m.update(&e.torus, &e.inputs(true, 25.0))[0];
        // Seed uptake 0.01 * 0.1 = 0.001, times 0.8 under drought.
        let mineral = 0.005 * 0.9375 * 0.96;
        assert!((wet - (50.0 - 0.001 + mineral)).abs() < 1e-9, "{wet}");
        assert!((dry - (50.0 - 0.0008 + mineral)).abs() < 1e-9, "{dry}");
    }

    #[test]
    fn pests_drain_nutrients() {
        let mut e = env(1, 1, 0.0);
        e.pest = Grid::filled(e.torus.shape(), true);
        let m = NutrientModel::new(Grid::filled(e.torus.shape(), 50.0), NutrientParams::default());
        let out = m.update(&e.torus, &e.inputs(false, 0.0));
        assert!((out[0] - 49.0).abs() < 1e-12);
    }

    #[test]
    fn long_tick_pest_loss_empties_only_the_infested_cell() {
        // Cold and dry: no uptake, no mineralisation, only pest loss and diffusion.
        let mut e = env(3, 3, 0.0);
        *e.pest.get_mut(0, 0).unwrap() = true;
        let m = NutrientModel::new(Grid::filled(e.torus.shape(), 50.0), NutrientParams::default());
        let mut inputs = e.inputs(false, 0.0);
        inputs.dt_hours = 100.0;
        let out = m.update(&e.torus, &inputs);

        // 0.02 * 100 = 2 is capped at 1: the cell loses exactly its 50 points,
        // then diffusion moves mass without creating or destroying any.
        assert!(out.iter().all(|&v| v >= 0.0));
        assert!((out.sum() - 50.0 * 8.0).abs() < 1e-9);
        assert!((*out.get(0, 0).unwrap() - 0.06 * 50.0).abs() < 1e-12);
        // Each clean cell sees seven full neighbours and one empty one.
        assert!((*out.get(1, 0).unwrap() - (50.0 - 0.06 * 50.0 / 8.0)).abs() < 1e-12);
    }

    #[test]
    fn fertilize_is_local_monotone_and_capped() {
        let shape = GridShape::new(3, 3);
        let mut m = NutrientModel::new(Grid::filled(shape, 50.0), NutrientParams::default());
        m.apply_fertilize(1, 1, 2.0).unwrap();
        assert_eq!(*m.levels().get(1, 1).unwrap(), 70.0);
        assert_eq!(m.levels().sum(), 50.0 * 9.0 + 20.0);
        m.apply_fertilize(1, 1, 10.0).unwrap();
        assert_eq!(*m.levels().get(1, 1).unwrap(), 100.0);
    }

    #[test]
    fn fertilize_errors_leave_grid_untouched() {
        let shape = GridShape::new(3, 3);
        let mut m = NutrientModel::new(Grid::filled(shape, 50.0), NutrientParams::default());
        let before = m.clone();
        assert!(m.apply_fertilize(0, 3, 1.0).is_err());
        assert!(matches!(
            m.apply_fertilize(0, 0, -0.5),
            Err(FieldError::InvalidAmount { quantity: "amount_kg", .. })
        ));
        assert_eq!(m, before);
    }

    proptest! {
        #[test]
        fn outputs_stay_in_percent_range(
            start in 0.0f64..100.0,
            moisture in 0.0f64..100.0,
            temperature in -20.0f64..60.0,
            drought in any::<bool>(),
            infested in any::<bool>(),
            species in 0u8..6,
        ) {
            let mut e = env(3, 3, moisture);
            e.crop.plant_seed(0, 0, PlantType::new(species).unwrap()).unwrap();
            e.pest = Grid::filled(e.torus.shape(), infested);
            let m = NutrientModel::new(Grid::filled(e.torus.shape(), start), NutrientParams::default());
            let out = m.update(&e.torus, &e.inputs(drought, temperature));
            prop_assert!(out.iter().all(|v| (0.0..=100.0).contains(v)));
        }
    }
}
