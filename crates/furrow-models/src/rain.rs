//! Stochastic rain as a semi-Markov renewal process.
//!
//! The rain level is piecewise constant over episodes whose lengths are
//! exponentially distributed. When an episode (or a dry spell) runs out, a
//! new level is drawn from season-specific probabilities and a new length
//! from a season x level table of means. Rain episodes may also end early
//! with a small per-hour hazard. Drought damps the chance of rain, shortens
//! episodes, and doubles the early-stop hazard.

use furrow_core::{RainLevel, Season};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParamError;
use crate::sampling;

/// Weather process parameters. Season rows are in [`Season::index`] order
/// (spring, summer, autumn, winter); level columns in [`RainLevel::index`]
/// order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainParams {
    /// Probability of each level when a new episode is drawn.
    pub season_probs: [[f64; 4]; 4],
    /// Mean episode length in hours, by season and level. The level-0
    /// column is the mean length of a dry spell.
    pub mean_duration_hours: [[f64; 4]; 4],
    /// Per-hour hazard of an active episode ending early.
    pub p_stop_early_per_hour: f64,
    /// Factor applied to the early-stop hazard under drought.
    pub drought_stop_multiplier: f64,
    /// Per-level multipliers applied to `season_probs` under drought
    /// before renormalising.
    pub drought_prob_mod: [f64; 4],
    /// Divisor applied to mean episode length under drought.
    pub drought_duration_factor: f64,
    /// Chance, per summer draw, of forcing heavy rain.
    pub extreme_override_prob: f64,
    /// Floor on sampled episode and dry-spell lengths, hours.
    pub min_duration_hours: f64,
    /// Floor on sampled episode lengths under drought, hours.
    pub min_drought_duration_hours: f64,
}

impl Default for RainParams {
    fn default() -> Self {
        let shoulder = [0.30, 0.45, 0.20, 0.05];
        let shoulder_hours = [36.0, 3.0, 6.0, 10.0];
        Self {
            season_probs: [shoulder, [0.60, 0.35, 0.045, 0.005], shoulder, [0.15, 0.35, 0.30, 0.20]],
            mean_duration_hours: [
                shoulder_hours,
                [72.0, 2.0, 4.0, 8.0],
                shoulder_hours,
                [24.0, 6.0, 12.0, 24.0],
            ],
            p_stop_early_per_hour: 0.02,
            drought_stop_multiplier: 2.0,
            drought_prob_mod: [1.0, 0.15, 0.001, 0.0001],
            drought_duration_factor: 4.0,
            extreme_override_prob: 1e-4,
            min_duration_hours: 1.0,
            min_drought_duration_hours: 0.5,
        }
    }
}

impl RainParams {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ParamError> {
        for row in &self.season_probs {
            for &p in row {
                ParamError::probability("rain.season_probs", p)?;
            }
            let total: f64 = row.iter().sum();
            ParamError::positive("rain.season_probs (row sum)", total)?;
        }
        for row in &self.mean_duration_hours {
            for &h in row {
                ParamError::positive("rain.mean_duration_hours", h)?;
            }
        }
        ParamError::probability("rain.p_stop_early_per_hour", self.p_stop_early_per_hour)?;
        ParamError::finite_non_negative("rain.drought_stop_multiplier", self.drought_stop_multiplier)?;
        for &m in &self.drought_prob_mod {
            ParamError::finite_non_negative("rain.drought_prob_mod", m)?;
        }
        ParamError::positive("rain.drought_duration_factor", self.drought_duration_factor)?;
        ParamError::probability("rain.extreme_override_prob", self.extreme_override_prob)?;
        ParamError::finite_non_negative("rain.min_duration_hours", self.min_duration_hours)?;
        ParamError::finite_non_negative(
            "rain.min_drought_duration_hours",
            self.min_drought_duration_hours,
        )?;
        Ok(())
    }

    fn mean_hours(&self, season: Season, level: RainLevel) -> f64 {
        self.mean_duration_hours[season.index()][level.index()]
    }
}

/// Current rain level and the time left in the current episode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RainModel {
    level: RainLevel,
    remaining_hours: f64,
    params: RainParams,
}

impl RainModel {
    /// A dry model with no episode scheduled; the first update draws one.
    pub fn new(params: RainParams) -> Self {
        Self {
            level: RainLevel::None,
            remaining_hours: 0.0,
            params,
        }
    }

    /// Current rain level.
    pub fn level(&self) -> RainLevel {
        self.level
    }

    /// Hours left in the current episode or dry spell.
    pub fn remaining_hours(&self) -> f64 {
        self.remaining_hours
    }

    /// The model parameters.
    pub fn params(&self) -> &RainParams {
        &self.params
    }

    /// Advance the process by `dt_hours` at day-of-year `day`.
    pub fn update<R: Rng + ?Sized>(&mut self, day: u32, drought: bool, dt_hours: f64, rng: &mut R) {
        let season = Season::from_day(day);
        self.remaining_hours -= dt_hours;

        if self.remaining_hours > 0.0 && self.level.is_raining() {
            let mut hazard = self.params.p_stop_early_per_hour;
            if drought {
                hazard = (hazard * self.params.drought_stop_multiplier).min(1.0);
            }
            let p_stop = 1.0 - (1.0 - hazard).powf(dt_hours);
            if rng.random::<f64>() < p_stop {
                debug!(level = ?self.level, "rain episode stopped early");
                self.level = RainLevel::None;
                self.remaining_hours = 0.0;
            }
            return;
        }

        if self.level.is_raining() {
            debug!(level = ?self.level, "rain episode expired");
        }
        self.level = RainLevel::None;
        if self.remaining_hours > 0.0 {
            return;
        }

        self.remaining_hours = self.start_episode(season, drought, rng).max(dt_hours);
        if self.level.is_raining() {
            debug!(
                level = ?self.level,
                hours = self.remaining_hours,
                ?season,
                drought,
                "rain episode started"
            );
        }
    }

    /// Draw a new level and return the length of its episode.
    fn start_episode<R: Rng + ?Sized>(&mut self, season: Season, drought: bool, rng: &mut R) -> f64 {
        let p = &self.params;
        let mut probs = p.season_probs[season.index()];
        if drought {
            for (w, m) in probs.iter_mut().zip(p.drought_prob_mod) {
                *w *= m;
            }
        }
        // `categorical` normalises by the total weight.
        let mut level = RainLevel::from_index(sampling::categorical(rng, &probs));
        if season == Season::Summer && rng.random::<f64>() < p.extreme_override_prob {
            level = RainLevel::Heavy;
        }

        let mean = p.mean_hours(season, level);
        let hours = if level.is_raining() && drought {
            let shortened = (mean / p.drought_duration_factor).max(1.0);
            sampling::exponential(rng, shortened).max(p.min_drought_duration_hours)
        } else {
            sampling::exponential(rng, mean).max(p.min_duration_hours)
        };
        self.level = level;
        hours
    }

    /// Force an episode at `level` starting now, with a length drawn for
    /// the season of `day`. Forcing [`RainLevel::None`] is the same as
    /// [`stop`](Self::stop).
    pub fn apply<R: Rng + ?Sized>(&mut self, level: RainLevel, day: u32, rng: &mut R) {
        if !level.is_raining() {
            self.stop();
            return;
        }
        let mean = self.params.mean_hours(Season::from_day(day), level);
        self.level = level;
        self.remaining_hours = sampling::exponential(rng, mean).max(self.params.min_duration_hours);
    }

    /// End any active episode immediately.
    pub fn stop(&mut self) {
        self.level = RainLevel::None;
        self.remaining_hours = 0.0;
    }
}
