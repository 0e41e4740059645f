//! Two-parameter Weibull fit for wind speed samples.
//!
//! Location is fixed at zero (wind speed cannot be negative). The shape k is
//! the root of the maximum-likelihood equation
//!
//! ```text
//! Σ xᵏ ln x / Σ xᵏ − 1/k − mean(ln x) = 0
//! ```
//!
//! solved by Newton iteration; the scale follows as c = (Σ xᵏ / n)^(1/k).
//! Speeds are divided by their maximum first so xᵏ cannot overflow; the
//! equation for k is unchanged by that rescaling.

use tracing::debug;

use atlas_common::WeibullFit;

/// Below this many samples a fit is still produced but is considered
/// unstable.
pub const MIN_RECOMMENDED_SAMPLES: usize = 100;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-10;

/// Fit a Weibull distribution to the positive, finite speeds in `speeds`.
///
/// Returns `None` when fewer than two distinct positive speeds remain, since
/// the likelihood then has no finite maximum.
pub fn fit_weibull(speeds: &[f64]) -> Option<WeibullFit> {
    let xs: Vec<f64> = speeds
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    let n = xs.len();
    if n < 2 {
        return None;
    }

    let x_max = xs.iter().copied().fold(f64::MIN, f64::max);
    let logs: Vec<f64> = xs.iter().map(|x| (x / x_max).ln()).collect();
    let mean_log = logs.iter().sum::<f64>() / n as f64;
    let var_log = logs.iter().map(|l| (l - mean_log).powi(2)).sum::<f64>() / n as f64;
    if var_log <= f64::EPSILON {
        return None;
    }

    // Var(ln X) = π² / (6k²) for a Weibull variable
    let mut k = std::f64::consts::PI / (6.0 * var_log).sqrt();

    for _ in 0..MAX_ITERATIONS {
        let (mut s0, mut s1, mut s2) = (0.0, 0.0, 0.0);
        for l in &logs {
            let w = (k * l).exp();
            s0 += w;
            s1 += w * l;
            s2 += w * l * l;
        }
        let g = s1 / s0 - 1.0 / k - mean_log;
        let dg = (s2 * s0 - s1 * s1) / (s0 * s0) + 1.0 / (k * k);

        let mut next = k - g / dg;
        if !next.is_finite() || next <= 0.0 {
            next = k / 2.0;
        }
        let step = (next - k).abs();
        k = next;
        if step < TOLERANCE * k {
            break;
        }
    }

    let mean_pow = logs.iter().map(|l| (k * l).exp()).sum::<f64>() / n as f64;
    let scale = x_max * mean_pow.powf(1.0 / k);

    if n < MIN_RECOMMENDED_SAMPLES {
        debug!(samples = n, "Weibull fit on a small sample may be unstable");
    }

    Some(WeibullFit {
        shape: k,
        scale,
        sample_count: n,
    })
}
