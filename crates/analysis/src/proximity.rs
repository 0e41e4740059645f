//! Geo-join of facilities with nearby weather samples.
//!
//! Distances are great-circle (haversine) distances; planar degree distances
//! would overweight east-west neighbours as latitude grows.

use rayon::prelude::*;
use tracing::{info, warn};

use atlas_common::{
    haversine_distance_km, Facility, InvalidParameterError, ProximityBinding, SampleMatch,
    WeatherSample, EARTH_RADIUS_M,
};

use crate::reducer::Reducer;
use crate::weibull::{fit_weibull, MIN_RECOMMENDED_SAMPLES};

/// Which samples count as "near" a facility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityPolicy {
    /// Every sample within `radius_km` (inclusive).
    Radius { radius_km: f64 },
    /// The `k` closest samples; equal distances keep dataset order.
    Nearest { k: usize },
}

impl ProximityPolicy {
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        match self {
            ProximityPolicy::Radius { radius_km } if !(radius_km.is_finite() && *radius_km > 0.0) => {
                Err(InvalidParameterError::new(
                    "proximity.radius_km",
                    format!("must be a positive distance, got {}", radius_km),
                ))
            }
            ProximityPolicy::Nearest { k: 0 } => Err(InvalidParameterError::new(
                "proximity.nearest_k",
                "must be > 0",
            )),
            _ => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ProximityPolicy::Radius { radius_km } => format!("within {} km", radius_km),
            ProximityPolicy::Nearest { k } => format!("nearest {}", k),
        }
    }
}

/// Binds facilities to nearby samples and aggregates their intensity.
#[derive(Debug, Clone)]
pub struct ProximityAggregator {
    policy: ProximityPolicy,
    reducer: Reducer,
    fit_weibull: bool,
}

impl ProximityAggregator {
    /// Create an aggregator, rejecting unusable policies up front.
    pub fn new(policy: ProximityPolicy, reducer: Reducer) -> Result<Self, InvalidParameterError> {
        policy.validate()?;
        Ok(Self {
            policy,
            reducer,
            fit_weibull: true,
        })
    }

    /// Enable or disable the per-facility Weibull fit.
    pub fn with_weibull(mut self, enabled: bool) -> Self {
        self.fit_weibull = enabled;
        self
    }

    pub fn policy(&self) -> ProximityPolicy {
        self.policy
    }

    pub fn reducer(&self) -> Reducer {
        self.reducer
    }

    /// Samples selected for one facility.
    ///
    /// Radius matches come back in dataset order; nearest-K matches come back
    /// closest first.
    pub fn select(&self, facility: &Facility, samples: &[WeatherSample]) -> Vec<SampleMatch> {
        let lat_rad = facility.latitude.to_radians();

        match self.policy {
            ProximityPolicy::Radius { radius_km } => samples
                .iter()
                .enumerate()
                .filter(|(_, s)| {
                    // Meridian distance is a lower bound on great-circle
                    // distance; the slack absorbs rounding at the boundary.
                    let meridian_km =
                        EARTH_RADIUS_M / 1000.0 * (s.latitude.to_radians() - lat_rad).abs();
                    meridian_km <= radius_km * (1.0 + 1e-9)
                })
                .map(|(i, s)| sample_match(facility, i, s))
                .filter(|m| m.distance_km <= radius_km)
                .collect(),
            ProximityPolicy::Nearest { k } => {
                let mut all: Vec<SampleMatch> = samples
                    .iter()
                    .enumerate()
                    .map(|(i, s)| sample_match(facility, i, s))
                    .collect();
                all.sort_by(|a, b| {
                    a.distance_km
                        .total_cmp(&b.distance_km)
                        .then_with(|| a.sample_index.cmp(&b.sample_index))
                });
                all.truncate(k);
                all
            }
        }
    }

    /// Binding for one facility.
    pub fn bind_one(&self, facility: &Facility, samples: &[WeatherSample]) -> ProximityBinding {
        let matches = self.select(facility, samples);
        let intensities: Vec<f64> = matches.iter().map(|m| m.intensity).collect();
        let aggregate = self.reducer.apply(&intensities);
        let weibull = if self.fit_weibull {
            fit_weibull(&intensities)
        } else {
            None
        };

        ProximityBinding {
            facility_id: facility.id.clone(),
            matches,
            aggregate,
            weibull,
        }
    }

    /// One binding per facility, in facility order.
    ///
    /// Facilities are processed in parallel; the output is identical to a
    /// sequential run.
    pub fn bind(&self, facilities: &[Facility], samples: &[WeatherSample]) -> Vec<ProximityBinding> {
        let bindings: Vec<ProximityBinding> = facilities
            .par_iter()
            .map(|f| self.bind_one(f, samples))
            .collect();

        let no_data = bindings.iter().filter(|b| b.aggregate.is_no_data()).count();
        let small_fits = bindings
            .iter()
            .filter_map(|b| b.weibull)
            .filter(|w| w.sample_count < MIN_RECOMMENDED_SAMPLES)
            .count();

        if no_data > 0 {
            warn!(
                facilities = no_data,
                policy = %self.policy.describe(),
                "Facilities without nearby weather samples"
            );
        }
        if small_fits > 0 {
            warn!(
                facilities = small_fits,
                min_samples = MIN_RECOMMENDED_SAMPLES,
                "Weibull fits based on few samples may be unstable"
            );
        }

        info!(
            facilities = bindings.len(),
            samples = samples.len(),
            policy = %self.policy.describe(),
            reducer = self.reducer.label(),
            "Bound weather samples to facilities"
        );

        bindings
    }
}

fn sample_match(facility: &Facility, index: usize, sample: &WeatherSample) -> SampleMatch {
    SampleMatch {
        sample_index: index,
        distance_km: haversine_distance_km(
            facility.latitude,
            facility.longitude,
            sample.latitude,
            sample.longitude,
        ),
        intensity: sample.intensity,
    }
}
