//! Per-species parameter tables.

use furrow_core::{CropStage, PlantType};
use serde::{Deserialize, Serialize};

use crate::error::ParamError;

const N: usize = PlantType::COUNT;

/// Tabulated agronomic parameters for every plant species.
///
/// Rows of per-stage tables are indexed by [`CropStage::table_row`]
/// (`Seed` = 0 .. `Mature` = 3); columns by [`PlantType::index`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantTable {
    /// Water uptake in mm/h, `[stage][species]`.
    pub uptake_mm_per_hour: [[f64; N]; 4],
    /// Ideal soil moisture per species, percent.
    pub ideal_moisture: [f64; N],
    /// Moisture deviation tolerated without stress, percentage points.
    pub drought_tolerance: [f64; N],
    /// Hours spent in each planted stage, `[species][stage]`. The mature
    /// column is unused: maturity has no further transition.
    pub stage_hours: [[f64; 4]; N],
    /// Days a mature crop holds before it starts to rot.
    pub days_before_rot: [f64; N],
    /// Health lost per day once rotting, percentage points.
    pub rot_rate_per_day: [f64; N],
}

impl Default for PlantTable {
    fn default() -> Self {
        Self {
            uptake_mm_per_hour: [
                [0.01, 0.01, 0.01, 0.01, 0.01, 0.01],
                [0.05, 0.04, 0.03, 0.04, 0.05, 0.03],
                [0.25, 0.20, 0.15, 0.18, 0.22, 0.12],
                [0.15, 0.12, 0.10, 0.10, 0.08, 0.07],
            ],
            ideal_moisture: [77.5, 77.5, 67.5, 77.5, 77.5, 72.5],
            drought_tolerance: [10.0, 10.0, 15.0, 12.0, 10.0, 12.0],
            stage_hours: [
                [48.0, 72.0, 168.0, 240.0],
                [48.0, 72.0, 168.0, 240.0],
                [24.0, 48.0, 336.0, 480.0],
                [36.0, 60.0, 144.0, 192.0],
                [24.0, 48.0, 120.0, 168.0],
                [48.0, 72.0, 240.0, 336.0],
            ],
            days_before_rot: [7.0, 7.0, 10.0, 5.0, 3.0, 14.0],
            rot_rate_per_day: [10.0; N],
        }
    }
}

impl PlantTable {
    /// Water uptake rate for a cell, mm/h. Zero for empty cells.
    pub fn uptake(&self, stage: CropStage, plant: Option<PlantType>) -> f64 {
        match (stage.table_row(), plant) {
            (Some(row), Some(p)) => self.uptake_mm_per_hour[row][p.index()],
            _ => 0.0,
        }
    }

    /// Ideal moisture for `plant`.
    pub fn ideal(&self, plant: PlantType) -> f64 {
        self.ideal_moisture[plant.index()]
    }

    /// Drought tolerance band for `plant`.
    pub fn tolerance(&self, plant: PlantType) -> f64 {
        self.drought_tolerance[plant.index()]
    }

    /// Hours a plant spends in `stage` before advancing, or `None` for
    /// stages with no outgoing transition.
    pub fn stage_duration(&self, plant: PlantType, stage: CropStage) -> Option<f64> {
        match stage {
            CropStage::Seed | CropStage::Germinate | CropStage::Vegetative => {
                stage.table_row().map(|row| self.stage_hours[plant.index()][row])
            }
            CropStage::Empty | CropStage::Mature => None,
        }
    }

    /// Check every entry.
    pub fn validate(&self) -> Result<(), ParamError> {
        for row in &self.uptake_mm_per_hour {
            for &v in row {
                ParamError::finite_non_negative("plants.uptake_mm_per_hour", v)?;
            }
        }
        for p in PlantType::all() {
            let i = p.index();
            ParamError::percent("plants.ideal_moisture", self.ideal_moisture[i])?;
            ParamError::positive("plants.drought_tolerance", self.drought_tolerance[i])?;
            for &h in &self.stage_hours[i][..3] {
                ParamError::positive("plants.stage_hours", h)?;
            }
            ParamError::finite_non_negative("plants.days_before_rot", self.days_before_rot[i])?;
            ParamError::finite_non_negative("plants.rot_rate_per_day", self.rot_rate_per_day[i])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u8) -> PlantType {
        PlantType::new(n).unwrap()
    }

    #[test]
    fn default_validates() {
        assert!(PlantTable::default().validate().is_ok());
    }

    #[test]
    fn uptake_is_zero_for_empty_cells() {
        let t = PlantTable::default();
        assert_eq!(t.uptake(CropStage::Empty, None), 0.0);
        assert_eq!(t.uptake(CropStage::Empty, Some(p(0))), 0.0);
        assert_eq!(t.uptake(CropStage::Vegetative, Some(p(0))), 0.25);
        assert_eq!(t.uptake(CropStage::Mature, Some(p(5))), 0.07);
    }

    #[test]
    fn stage_durations() {
        let t = PlantTable::default();
        assert_eq!(t.stage_duration(p(0), CropStage::Seed), Some(48.0));
        assert_eq!(t.stage_duration(p(2), CropStage::Vegetative), Some(336.0));
        assert_eq!(t.stage_duration(p(2), CropStage::Mature), None);
        assert_eq!(t.stage_duration(p(2), CropStage::Empty), None);
    }

    #[test]
    fn validate_rejects_zero_stage_duration() {
        let mut t = PlantTable::default();
        t.stage_hours[3][1] = 0.0;
        let err = t.validate().unwrap_err();
        assert_eq!(err.name, "plants.stage_hours");
    }
}
