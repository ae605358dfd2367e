//! Per-tick metrics for the field engine.
//!
//! [`StepMetrics`] captures timing and life-cycle counts for a single tick.

/// Timing and event counts collected during a single [`Field::step`](crate::Field::step).
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Tick number after this step.
    pub tick: u64,
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Temperature and rain.
    pub weather_us: u64,
    /// Moisture balance, including leaching.
    pub moisture_us: u64,
    /// Nutrient balance.
    pub nutrients_us: u64,
    /// Pest spread (0 while the pest system is inactive).
    pub pest_us: u64,
    /// Crop life cycle.
    pub crop_us: u64,
    /// Infested cells after the tick.
    pub infested_cells: usize,
    /// Cells that advanced a growth stage.
    pub stage_transitions: usize,
    /// Planted cells whose health reached 0.
    pub crop_deaths: usize,
}
