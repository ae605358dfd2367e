//! Seeded sampling of the continuous and discrete distributions the models
//! draw from.
//!
//! All helpers take `&mut R where R: Rng + ?Sized` so callers can pass a
//! concrete seeded generator or a trait object.

use rand::Rng;

/// Standard normal deviate via the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Normal deviate with the given mean and standard deviation.
pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    mean + std_dev * standard_normal(rng)
}

/// Exponential deviate with the given mean (scale), by inverse CDF.
///
/// A non-positive mean yields 0.
pub fn exponential<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> f64 {
    if mean <= 0.0 {
        return 0.0;
    }
    let u: f64 = rng.random();
    // u is in [0, 1), so 1 - u is in (0, 1] and the log is finite.
    -mean * (1.0 - u).ln()
}

/// Triangular deviate on `[low, high]` with peak at `mode`, by inverse CDF.
///
/// Callers must ensure `low <= mode <= high`. A degenerate interval
/// returns `low`.
pub fn triangular<R: Rng + ?Sized>(rng: &mut R, low: f64, mode: f64, high: f64) -> f64 {
    let width = high - low;
    if width <= 0.0 {
        return low;
    }
    let u: f64 = rng.random();
    let split = (mode - low) / width;
    if u < split {
        low + (u * width * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * width * (high - mode)).sqrt()
    }
}

/// Index drawn with probability proportional to `weights[i]`.
///
/// Negative weights count as zero. If every weight is zero the first
/// index is returned.
pub fn categorical<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return 0;
    }
    let target = rng.random::<f64>() * total;
    let mut acc = 0.0;
    let mut last_positive = 0;
    for (i, w) in weights.iter().enumerate() {
        let w = w.max(0.0);
        if w > 0.0 {
            last_positive = i;
        }
        acc += w;
        if target < acc {
            return i;
        }
    }
    // Rounding can leave target == total; fall back to the last live bucket.
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn normal_moments() {
        let mut r = rng();
        let n = 20_000;
        let xs: Vec<f64> = (0..n).map(|_| normal(&mut r, 3.0, 2.0)).collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 3.0).abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn exponential_mean_and_sign() {
        let mut r = rng();
        let n = 20_000;
        let xs: Vec<f64> = (0..n).map(|_| exponential(&mut r, 6.0)).collect();
        assert!(xs.iter().all(|&x| x >= 0.0 && x.is_finite()));
        let mean = xs.iter().sum::<f64>() / n as f64;
        assert!((mean - 6.0).abs() < 0.3, "mean {mean}");
        assert_eq!(exponential(&mut r, 0.0), 0.0);
    }

    #[test]
    fn triangular_stays_in_support() {
        let mut r = rng();
        let xs: Vec<f64> = (0..5_000).map(|_| triangular(&mut r, 75.0, 80.0, 85.0)).collect();
        assert!(xs.iter().all(|&x| (75.0..=85.0).contains(&x)));
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((mean - 80.0).abs() < 0.3, "mean {mean}");
        assert_eq!(triangular(&mut r, 4.0, 4.0, 4.0), 4.0);
    }

    #[test]
    fn categorical_respects_zero_weights() {
        let mut r = rng();
        let weights = [0.0, 0.7, 0.0, 0.3];
        let mut counts = [0usize; 4];
        for _ in 0..10_000 {
            counts[categorical(&mut r, &weights)] += 1;
        }
        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        let frac = counts[1] as f64 / 10_000.0;
        assert!((frac - 0.7).abs() < 0.03, "frac {frac}");
    }

    #[test]
    fn categorical_all_zero_returns_first() {
        let mut r = rng();
        assert_eq!(categorical(&mut r, &[0.0, 0.0]), 0);
    }
}
