//! Capability traits through which a control layer senses and actuates a
//! field, plus the reading records they return.
//!
//! Both the real engine and test doubles implement these traits, so agent
//! logic can be exercised against a scripted field.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::grid::GridShape;
use crate::kind::{CropStage, PlantType};

/// What a soil probe reports for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    /// Air temperature in °C (uniform over the field).
    pub temperature: f64,
    /// Soil nutrient level, percent.
    pub nutrients: f64,
    /// Soil moisture, percent.
    pub moisture: f64,
}

/// What an aerial survey reports for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroneReading {
    /// Crop life-cycle stage.
    pub stage: CropStage,
    /// Species occupying the cell; `None` when the cell is empty.
    pub plant: Option<PlantType>,
    /// Whether the cell is infested.
    pub pest: bool,
}

/// Sensing and actuation on individual cells.
///
/// Every method validates its inputs before writing: an `Err` return means
/// the field is unchanged.
pub trait FieldAccess {
    /// Dimensions of the field.
    fn shape(&self) -> GridShape;

    /// Soil probe reading at `(row, col)`.
    fn get_soil(&self, row: u32, col: u32) -> Result<SoilReading, FieldError>;

    /// Aerial survey reading at `(row, col)`.
    fn get_drone(&self, row: u32, col: u32) -> Result<DroneReading, FieldError>;

    /// Irrigate `(row, col)` at `flow_rate` litres per hour.
    fn apply_irrigation(&mut self, row: u32, col: u32, flow_rate: f64) -> Result<(), FieldError>;

    /// Spread `amount_kg` of fertilizer on `(row, col)`.
    fn apply_fertilize(&mut self, row: u32, col: u32, amount_kg: f64) -> Result<(), FieldError>;

    /// Spray pesticide on `(row, col)`.
    fn apply_pesticide(&mut self, row: u32, col: u32) -> Result<(), FieldError>;

    /// Sow species `plant_type` at `(row, col)`.
    fn plant_seed(&mut self, row: u32, col: u32, plant_type: u8) -> Result<(), FieldError>;

    /// Harvest `(row, col)`, returning the crop's health as the yield basis.
    ///
    /// Harvesting an empty cell is legal and yields 0.
    fn harvest(&mut self, row: u32, col: u32) -> Result<f64, FieldError>;
}

/// Field-wide weather and infestation events.
pub trait EventControl {
    /// Force a rain episode of the given intensity (`1..=3`).
    fn apply_rain(&mut self, intensity: u8) -> Result<(), FieldError>;

    /// End any active rain episode.
    fn stop_rain(&mut self);

    /// Flip the drought flag, returning the new state.
    fn toggle_drought(&mut self) -> bool;

    /// Activate the pest system and infest one random cell, returning it.
    fn apply_pest(&mut self) -> (u32, u32);

    /// Clear every infestation and deactivate the pest system.
    fn remove_pest(&mut self);
}
