//! Stress curves shared by the soil and crop models.
//!
//! Every curve maps a condition to a factor in `[0, 1]` where 1 means the
//! condition is optimal for the plant.

/// Moisture stress around an ideal target.
///
/// Full (1.0) within `tolerance` of `ideal`, falling linearly to 0 at twice
/// the tolerance. A non-positive tolerance is treated as no stress.
pub fn moisture_stress(moisture: f64, ideal: f64, tolerance: f64) -> f64 {
    if tolerance <= 0.0 {
        return 1.0;
    }
    let excess = ((moisture - ideal).abs() - tolerance).clamp(0.0, tolerance);
    1.0 - excess / tolerance
}

/// Moisture adequacy for nutrient uptake: peaked at `ideal`, falling
/// linearly to 0 at `2 * tolerance` away.
pub fn moisture_adequacy(moisture: f64, ideal: f64, tolerance: f64) -> f64 {
    if tolerance <= 0.0 {
        return 1.0;
    }
    (1.0 - (moisture - ideal).abs() / (2.0 * tolerance)).clamp(0.0, 1.0)
}

/// Parabolic bell over `[low, high]`, 1 at the midpoint and 0 outside.
///
/// ```text
/// bell(t) = clip((t - low) * (high - t) / ((high - low) / 2)^2, 0, 1)
/// ```
pub fn temperature_bell(temperature: f64, low: f64, high: f64) -> f64 {
    let half = (high - low) / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((temperature - low) * (high - temperature) / (half * half)).clamp(0.0, 1.0)
}

/// Linear ramp from 0 at `start` to 1 at `start + span`.
pub fn ramp(value: f64, start: f64, span: f64) -> f64 {
    if span <= 0.0 {
        return if value >= start { 1.0 } else { 0.0 };
    }
    ((value - start) / span).clamp(0.0, 1.0)
}

/// Plateau with linear shoulders: 1 on `[low, high]`, reaching 0 at
/// `low - falloff` and `high + falloff`.
pub fn plateau(value: f64, low: f64, high: f64, falloff: f64) -> f64 {
    if (low..=high).contains(&value) {
        1.0
    } else if falloff <= 0.0 {
        0.0
    } else if value < low {
        (1.0 - (low - value) / falloff).max(0.0)
    } else {
        (1.0 - (value - high) / falloff).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moisture_stress_shape() {
        assert_eq!(moisture_stress(77.5, 77.5, 10.0), 1.0);
        assert_eq!(moisture_stress(87.5, 77.5, 10.0), 1.0);
        assert!((moisture_stress(92.5, 77.5, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(moisture_stress(97.5, 77.5, 10.0), 0.0);
        assert_eq!(moisture_stress(10.0, 77.5, 10.0), 0.0);
    }

    #[test]
    fn moisture_adequacy_shape() {
        assert_eq!(moisture_adequacy(60.0, 60.0, 10.0), 1.0);
        assert!((moisture_adequacy(70.0, 60.0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(moisture_adequacy(80.0, 60.0, 10.0), 0.0);
    }

    #[test]
    fn bell_peaks_at_midpoint() {
        assert_eq!(temperature_bell(25.0, 5.0, 45.0), 1.0);
        assert_eq!(temperature_bell(5.0, 5.0, 45.0), 0.0);
        assert_eq!(temperature_bell(50.0, 5.0, 45.0), 0.0);
        assert!((temperature_bell(15.0, 5.0, 45.0) - 0.75).abs() < 1e-12);
        assert_eq!(temperature_bell(30.0, 5.0, 55.0), 1.0);
    }

    #[test]
    fn plateau_shoulders() {
        assert_eq!(plateau(20.0, 15.0, 30.0, 10.0), 1.0);
        assert!((plateau(10.0, 15.0, 30.0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(plateau(5.0, 15.0, 30.0, 10.0), 0.0);
        assert!((plateau(35.0, 15.0, 30.0, 10.0) - 0.5).abs() < 1e-12);
        assert_eq!(plateau(45.0, 15.0, 30.0, 10.0), 0.0);
    }

    #[test]
    fn ramp_saturates() {
        assert_eq!(ramp(0.0, 0.0, 40.0), 0.0);
        assert_eq!(ramp(20.0, 0.0, 40.0), 0.5);
        assert_eq!(ramp(90.0, 0.0, 40.0), 1.0);
        assert_eq!(ramp(60.0, 40.0, 40.0), 0.5);
    }
}
