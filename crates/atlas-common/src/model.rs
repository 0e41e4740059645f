//! Core domain types for the wind atlas pipeline.
//!
//! Everything here is produced once per run and treated as immutable
//! afterwards. No I/O lives in this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// Unique facility identifier.
///
/// Ordering is "natural": purely numeric identifiers compare by value and
/// sort before any non-numeric identifier, which compare as text. Numeric
/// ties (e.g. "07" vs "7") fall back to text so the order stays total.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityId(pub String);

impl FacilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u128> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl Ord for FacilityId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for FacilityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    Operating,
    Planned,
    Candidate,
    UnderConstruction,
    Decommissioned,
}

impl FacilityStatus {
    /// Parse a status tag, accepting common spellings.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "operating" | "operational" | "active" | "in_operation" => Some(Self::Operating),
            "planned" => Some(Self::Planned),
            "candidate" | "candidate_site" => Some(Self::Candidate),
            "under_construction" | "construction" => Some(Self::UnderConstruction),
            "decommissioned" | "retired" => Some(Self::Decommissioned),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operating => "operating",
            Self::Planned => "planned",
            Self::Candidate => "candidate",
            Self::UnderConstruction => "under_construction",
            Self::Decommissioned => "decommissioned",
        }
    }

    /// Sites shown on the candidate layer.
    pub fn is_prospective(&self) -> bool {
        matches!(self, Self::Planned | Self::Candidate)
    }
}

impl fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated wind power installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Installed capacity in MW, always > 0.
    pub capacity_mw: f64,
    /// Annual generation in MWh, always >= 0.
    pub annual_generation_mwh: f64,
    pub status: FacilityStatus,
    pub operator: Option<String>,
    pub hub_height_m: Option<f64>,
    pub turbine_count: Option<u32>,
    pub commissioned_year: Option<i32>,
}

impl Facility {
    /// Hours in a non-leap year, used for capacity factor.
    pub const HOURS_PER_YEAR: f64 = 8760.0;

    /// Ratio of actual to theoretical maximum annual output.
    pub fn capacity_factor(&self) -> f64 {
        self.annual_generation_mwh / (self.capacity_mw * Self::HOURS_PER_YEAR)
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// When a weather sample was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SampleTime {
    Instant(DateTime<Utc>),
    /// Free-form period such as "2024" or "2024-Q1".
    Period(String),
}

impl fmt::Display for SampleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleTime::Instant(t) => write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%SZ")),
            SampleTime::Period(p) => f.write_str(p),
        }
    }
}

/// A single localized wind observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Wind speed in m/s, always >= 0.
    pub intensity: f64,
    pub time: SampleTime,
    pub station_id: Option<String>,
    /// Degrees clockwise from north.
    pub wind_direction_deg: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Which ranked set a facility belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    Top,
    Bottom,
    Unranked,
}

impl RankTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Unranked => "unranked",
        }
    }
}

/// A facility placed in a ranked set. `rank` is 1-based within its tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFacility {
    pub facility: Facility,
    pub rank: usize,
    pub tier: RankTier,
    /// The metric value the rank was computed from.
    pub metric_value: f64,
}

// ---------------------------------------------------------------------------
// Proximity
// ---------------------------------------------------------------------------

/// Aggregated weather intensity near a facility.
///
/// `NoData` is distinct from `Value(0.0)`: calm air is a real reading.
/// Serializes as a number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Intensity {
    Value(f64),
    NoData,
}

impl Intensity {
    pub fn value(&self) -> Option<f64> {
        match self {
            Intensity::Value(v) => Some(*v),
            Intensity::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Intensity::NoData)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Value(v) => write!(f, "{:.2}", v),
            Intensity::NoData => f.write_str("no data"),
        }
    }
}

/// A weather sample selected as near a facility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleMatch {
    /// Position of the sample in the loaded weather table.
    pub sample_index: usize,
    pub distance_km: f64,
    pub intensity: f64,
}

/// Two-parameter Weibull distribution fitted to wind speeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeibullFit {
    /// Shape parameter k.
    pub shape: f64,
    /// Scale parameter c, in the units of the samples (m/s).
    pub scale: f64,
    /// Number of positive speeds used in the fit.
    pub sample_count: usize,
}

/// A facility paired with its nearby samples and their aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityBinding {
    pub facility_id: FacilityId,
    pub matches: Vec<SampleMatch>,
    pub aggregate: Intensity,
    pub weibull: Option<WeibullFit>,
}

impl ProximityBinding {
    pub fn sample_count(&self) -> usize {
        self.matches.len()
    }
}
