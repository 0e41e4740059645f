//! Deterministic test data generators.
//!
//! No randomness crate is used: a small linear congruential generator keeps
//! generated datasets identical across runs and platforms.

use atlas_common::{Facility, WeatherSample};

use crate::fixtures::{facility_at, sample_at};

/// Minimal LCG (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 32) as u32
    }

    /// Uniform value in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform value in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// `count` operating facilities scattered over a lat/lon box.
///
/// Ids are "F0001", "F0002", ...; generation is rounded to whole MWh so
/// ties occur now and then.
pub fn generate_facilities(
    count: usize,
    seed: u64,
    (min_lat, max_lat): (f64, f64),
    (min_lon, max_lon): (f64, f64),
) -> Vec<Facility> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|i| {
            let lat = rng.range(min_lat, max_lat);
            let lon = rng.range(min_lon, max_lon);
            let generation = (rng.range(0.0, 50.0)).round() * 1000.0;
            facility_at(&format!("F{:04}", i + 1), generation, lat, lon)
        })
        .collect()
}

/// A regular grid of samples with spacing `step` degrees.
///
/// Intensity is produced by `f(row, col)`.
pub fn grid_samples(
    origin: (f64, f64),
    rows: usize,
    cols: usize,
    step: f64,
    f: impl Fn(usize, usize) -> f64,
) -> Vec<WeatherSample> {
    let mut samples = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            samples.push(sample_at(
                origin.0 + r as f64 * step,
                origin.1 + c as f64 * step,
                f(r, c),
            ));
        }
    }
    samples
}

/// Weibull-distributed wind speeds at evenly spaced quantiles.
///
/// Uses the inverse CDF `c * (-ln(1 - p))^(1/k)` at p = (i + 0.5) / n, which
/// gives a sample whose maximum-likelihood fit lands close to (k, c).
pub fn weibull_speeds(shape: f64, scale: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let p = (i as f64 + 0.5) / n as f64;
            scale * (-(1.0 - p).ln()).powf(1.0 / shape)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_is_deterministic() {
        let a: Vec<u32> = {
            let mut r = Lcg::new(42);
            (0..5).map(|_| r.next_u32()).collect()
        };
        let b: Vec<u32> = {
            let mut r = Lcg::new(42);
            (0..5).map(|_| r.next_u32()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_facilities_in_box() {
        let fs = generate_facilities(50, 7, (34.0, 38.0), (126.0, 129.0));
        assert_eq!(fs.len(), 50);
        assert!(fs
            .iter()
            .all(|f| (34.0..38.0).contains(&f.latitude) && (126.0..129.0).contains(&f.longitude)));
    }

    #[test]
    fn test_weibull_speeds_positive_and_sorted() {
        let v = weibull_speeds(2.0, 8.0, 100);
        assert!(v.windows(2).all(|w| w[0] < w[1]));
        assert!(v[0] > 0.0);
    }
}
