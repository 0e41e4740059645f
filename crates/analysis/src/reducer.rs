//! Aggregation functions for nearby weather intensities.

use serde::{Deserialize, Serialize};

use atlas_common::Intensity;

/// Standard sea-level air density in kg/m³.
pub const AIR_DENSITY_KG_M3: f64 = 1.225;

/// How the intensities of selected samples combine into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    #[default]
    Mean,
    Median,
    Min,
    Max,
    /// Mean wind power density ½·ρ·v³ in W/m².
    PowerDensity,
}

impl Reducer {
    /// Apply the reducer. An empty slice is always `NoData`.
    pub fn apply(&self, values: &[f64]) -> Intensity {
        if values.is_empty() {
            return Intensity::NoData;
        }
        let n = values.len() as f64;

        let value = match self {
            Reducer::Mean => values.iter().sum::<f64>() / n,
            Reducer::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Reducer::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Reducer::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reducer::PowerDensity => {
                values
                    .iter()
                    .map(|v| 0.5 * AIR_DENSITY_KG_M3 * v.powi(3))
                    .sum::<f64>()
                    / n
            }
        };

        Intensity::Value(value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Reducer::Mean => "mean wind speed",
            Reducer::Median => "median wind speed",
            Reducer::Min => "minimum wind speed",
            Reducer::Max => "maximum wind speed",
            Reducer::PowerDensity => "wind power density",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Reducer::PowerDensity => "W/m²",
            _ => "m/s",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mean" | "avg" | "average" => Some(Self::Mean),
            "median" => Some(Self::Median),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "power_density" => Some(Self::PowerDensity),
            _ => None,
        }
    }
}
