//! Air temperature from day-of-year and hour-of-day.
//!
//! An annual sinusoid sets the day's min/max band. Within the day the
//! curve has three phases: a sine warm-up from sunrise to the peak hour, a
//! cosine cool-down from the peak to sunset, and an exponential decay
//! toward the daily minimum overnight. Sunrise and sunset come from the
//! solar declination at a fixed latitude.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::sampling;

/// Climate and diurnal-curve parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureParams {
    /// Mean annual temperature, °C.
    pub annual_mean: f64,
    /// Amplitude of the annual sinusoid, °C.
    pub annual_amplitude: f64,
    /// Day-of-year at which the annual sinusoid crosses its mean upward.
    pub phase_day: f64,
    /// Daily minimum sits this far below the annual curve, °C.
    pub daily_min_offset: f64,
    /// Daily maximum sits this far above the annual curve, °C.
    pub daily_max_offset: f64,
    /// Site latitude, degrees north.
    pub latitude_deg: f64,
    /// Earth's axial tilt, degrees.
    pub axial_tilt_deg: f64,
    /// Hour of the daily maximum.
    pub peak_hour: f64,
    /// Position of the sunset temperature between min (0) and max (1).
    pub sunset_fraction: f64,
    /// E-folding time of the overnight decay, hours.
    pub night_decay_hours: f64,
    /// Standard deviation of the per-reading perturbation, °C.
    pub noise_std: f64,
}

impl Default for TemperatureParams {
    fn default() -> Self {
        Self {
            annual_mean: 15.0,
            annual_amplitude: 10.0,
            phase_day: 110.0,
            daily_min_offset: 5.0,
            daily_max_offset: 8.0,
            latitude_deg: 40.0,
            axial_tilt_deg: 23.44,
            peak_hour: 14.5,
            sunset_fraction: 0.3,
            night_decay_hours: 5.0,
            noise_std: 0.3,
        }
    }
}

impl TemperatureParams {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamError::finite("temperature.annual_mean", self.annual_mean)?;
        ParamError::finite("temperature.phase_day", self.phase_day)?;
        ParamError::finite_non_negative("temperature.annual_amplitude", self.annual_amplitude)?;
        ParamError::finite_non_negative("temperature.daily_min_offset", self.daily_min_offset)?;
        ParamError::finite_non_negative("temperature.daily_max_offset", self.daily_max_offset)?;
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(ParamError {
                name: "temperature.latitude_deg",
                value: self.latitude_deg,
                expected: "in [-90, 90]",
            });
        }
        ParamError::finite_non_negative("temperature.axial_tilt_deg", self.axial_tilt_deg)?;
        if !(0.0..24.0).contains(&self.peak_hour) {
            return Err(ParamError {
                name: "temperature.peak_hour",
                value: self.peak_hour,
                expected: "in [0, 24)",
            });
        }
        ParamError::probability("temperature.sunset_fraction", self.sunset_fraction)?;
        ParamError::positive("temperature.night_decay_hours", self.night_decay_hours)?;
        ParamError::finite_non_negative("temperature.noise_std", self.noise_std)?;
        Ok(())
    }
}

/// Stateless air temperature model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemperatureModel {
    params: TemperatureParams,
}

impl TemperatureModel {
    /// A model with the given parameters.
    pub fn new(params: TemperatureParams) -> Self {
        Self { params }
    }

    /// The model parameters.
    pub fn params(&self) -> &TemperatureParams {
        &self.params
    }

    /// Sunrise and sunset for `day`, in fractional hours within `[0, 24]`.
    ///
    /// The hour-angle argument is clamped so polar day and polar night
    /// yield 24 h and 0 h of daylight instead of a domain error.
    pub fn day_length(&self, day: u32) -> (f64, f64) {
        let latitude = self.params.latitude_deg.to_radians();
        let declination = self.params.axial_tilt_deg.to_radians()
            * (2.0 * std::f64::consts::PI * (f64::from(day) - 80.0) / 365.0).sin();
        let arg = (-latitude.tan() * declination.tan()).clamp(-1.0, 1.0);
        let hour_angle = arg.acos();
        let daylight = 2.0 * hour_angle.to_degrees() / 15.0;
        let sunrise = (12.0 - daylight / 2.0).max(0.0);
        let sunset = (12.0 + daylight / 2.0).min(24.0);
        (sunrise, sunset)
    }

    /// Daily minimum and maximum for `day`.
    pub fn daily_band(&self, day: u32) -> (f64, f64) {
        let p = &self.params;
        let mean = p.annual_mean
            + p.annual_amplitude
                * (2.0 * std::f64::consts::PI * (f64::from(day) - p.phase_day) / 365.0).sin();
        (mean - p.daily_min_offset, mean + p.daily_max_offset)
    }

    /// Noise-free temperature at `hour` on `day`.
    pub fn diurnal(&self, day: u32, hour: f64) -> f64 {
        let p = &self.params;
        let (t_min, t_max) = self.daily_band(day);
        let (sunrise, sunset) = self.day_length(day);
        let t_sunset = t_min + (t_max - t_min) * p.sunset_fraction;

        if (sunrise..=p.peak_hour).contains(&hour) {
            let span = (p.peak_hour - sunrise).max(f64::EPSILON);
            let h = (hour - sunrise) / span;
            t_min + (t_max - t_min) * (std::f64::consts::FRAC_PI_2 * h).sin()
        } else if hour > p.peak_hour && hour <= sunset {
            let span = (sunset - p.peak_hour).max(f64::EPSILON);
            let h = (hour - p.peak_hour) / span;
            t_sunset + (t_max - t_sunset) * (std::f64::consts::FRAC_PI_2 * h).cos()
        } else {
            let since_sunset = if hour > sunset {
                hour - sunset
            } else {
                24.0 - sunset + hour
            };
            t_min + (t_sunset - t_min) * (-since_sunset / p.night_decay_hours).exp()
        }
    }

    /// Temperature reading for `(day, hour)`: the diurnal curve plus
    /// Gaussian noise, rounded to 2 decimals.
    pub fn update<R: Rng + ?Sized>(&self, day: u32, hour: u32, rng: &mut R) -> f64 {
        let t = self.diurnal(day, f64::from(hour))
            + sampling::normal(rng, 0.0, self.params.noise_std);
        (t * 100.0).round() / 100.0
    }
}
