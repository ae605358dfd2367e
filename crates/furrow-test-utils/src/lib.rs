//! Test utilities and mock types for Furrow development.
//!
//! Provides [`MockField`], a scripted implementation of the capability
//! traits ([`FieldAccess`], [`EventControl`]) that records every call, and
//! grid [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use furrow_core::{
    CropStage, DroneReading, EventControl, FieldAccess, FieldError, Grid, GridShape, PlantType,
    RainLevel, SoilReading,
};

/// One recorded call on a [`MockField`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Irrigate { row: u32, col: u32, flow_rate: f64 },
    Fertilize { row: u32, col: u32, amount_kg: f64 },
    Pesticide { row: u32, col: u32 },
    Plant { row: u32, col: u32, plant: PlantType },
    Harvest { row: u32, col: u32 },
    Rain(RainLevel),
    StopRain,
    ToggleDrought,
    Pest,
    RemovePest,
}

/// Scripted field: readings come from preset grids, actuation nudges
/// those grids in the obvious direction and is appended to [`actions`].
///
/// Inputs are validated exactly as the real engine validates them, and a
/// rejected call is not recorded.
///
/// [`actions`]: MockField::actions
#[derive(Clone, Debug)]
pub struct MockField {
    pub soil: Grid<SoilReading>,
    pub drone: Grid<DroneReading>,
    pub actions: Vec<Action>,
    pub rain: RainLevel,
    pub drought: bool,
    pub pest_active: bool,
    /// Cell infested by [`EventControl::apply_pest`].
    pub outbreak_cell: (u32, u32),
}

impl MockField {
    /// Uniform soil at every cell, nothing planted.
    pub fn new(rows: u32, cols: u32, soil: SoilReading) -> Self {
        let shape = GridShape::new(rows, cols);
        Self {
            soil: Grid::filled(shape, soil),
            drone: Grid::filled(shape, DroneReading::default()),
            actions: Vec::new(),
            rain: RainLevel::None,
            drought: false,
            pest_active: false,
            outbreak_cell: (0, 0),
        }
    }

    /// Set the soil reading of one cell.
    pub fn set_soil(&mut self, row: u32, col: u32, soil: SoilReading) -> &mut Self {
        if let Ok(cell) = self.soil.get_mut(row, col) {
            *cell = soil;
        }
        self
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Action) -> bool) -> usize {
        self.actions.iter().filter(|a| pred(a)).count()
    }
}

impl Default for MockField {
    fn default() -> Self {
        Self::new(
            4,
            4,
            SoilReading {
                temperature: 20.0,
                nutrients: 60.0,
                moisture: 80.0,
            },
        )
    }
}

impl FieldAccess for MockField {
    fn shape(&self) -> GridShape {
        self.soil.shape()
    }

    fn get_soil(&self, row: u32, col: u32) -> Result<SoilReading, FieldError> {
        self.soil.get(row, col).copied()
    }

    fn get_drone(&self, row: u32, col: u32) -> Result<DroneReading, FieldError> {
        self.drone.get(row, col).copied()
    }

    fn apply_irrigation(&mut self, row: u32, col: u32, flow_rate: f64) -> Result<(), FieldError> {
        self.shape().index(row, col)?;
        let flow_rate = FieldError::non_negative("flow_rate", flow_rate)?;
        let cell = self.soil.get_mut(row, col)?;
        cell.moisture = (cell.moisture + flow_rate).min(100.0);
        self.actions.push(Action::Irrigate { row, col, flow_rate });
        Ok(())
    }

    fn apply_fertilize(&mut self, row: u32, col: u32, amount_kg: f64) -> Result<(), FieldError> {
        self.shape().index(row, col)?;
        let amount_kg = FieldError::non_negative("amount_kg", amount_kg)?;
        let cell = self.soil.get_mut(row, col)?;
        cell.nutrients = (cell.nutrients + amount_kg).min(100.0);
        self.actions.push(Action::Fertilize { row, col, amount_kg });
        Ok(())
    }

    fn apply_pesticide(&mut self, row: u32, col: u32) -> Result<(), FieldError> {
        self.drone.get_mut(row, col)?.pest = false;
        self.actions.push(Action::Pesticide { row, col });
        Ok(())
    }

    fn plant_seed(&mut self, row: u32, col: u32, plant_type: u8) -> Result<(), FieldError> {
        self.shape().index(row, col)?;
        let plant = PlantType::new(plant_type)?;
        let cell = self.drone.get_mut(row, col)?;
        cell.stage = CropStage::Seed;
        cell.plant = Some(plant);
        self.actions.push(Action::Plant { row, col, plant });
        Ok(())
    }

    fn harvest(&mut self, row: u32, col: u32) -> Result<f64, FieldError> {
        let cell = self.drone.get_mut(row, col)?;
        let yield_basis = if cell.stage.is_planted() { 100.0 } else { 0.0 };
        cell.stage = CropStage::Empty;
        cell.plant = None;
        self.actions.push(Action::Harvest { row, col });
        Ok(yield_basis)
    }
}

impl EventControl for MockField {
    fn apply_rain(&mut self, intensity: u8) -> Result<(), FieldError> {
        let level = RainLevel::from_intensity(intensity)?;
        self.rain = level;
        self.actions.push(Action::Rain(level));
        Ok(())
    }

    fn stop_rain(&mut self) {
        self.rain = RainLevel::None;
        self.actions.push(Action::StopRain);
    }

    fn toggle_drought(&mut self) -> bool {
        self.drought = !self.drought;
        self.actions.push(Action::ToggleDrought);
        self.drought
    }

    fn apply_pest(&mut self) -> (u32, u32) {
        let (row, col) = self.outbreak_cell;
        if let Ok(cell) = self.drone.get_mut(row, col) {
            cell.pest = true;
        }
        self.pest_active = true;
        self.actions.push(Action::Pest);
        (row, col)
    }

    fn remove_pest(&mut self) {
        for cell in self.drone.iter_mut() {
            cell.pest = false;
        }
        self.pest_active = false;
        self.actions.push(Action::RemovePest);
    }
}
