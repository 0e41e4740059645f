//! Top-N / bottom-N facility ranking.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use atlas_common::{Facility, FacilityId, InvalidParameterError, RankTier, RankedFacility};

/// Which facility attribute ranking is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    AnnualGeneration,
    InstalledCapacity,
    CapacityFactor,
}

impl RankingMetric {
    /// The metric value for a facility.
    pub fn value(&self, facility: &Facility) -> f64 {
        match self {
            Self::AnnualGeneration => facility.annual_generation_mwh,
            Self::InstalledCapacity => facility.capacity_mw,
            Self::CapacityFactor => facility.capacity_factor(),
        }
    }

    /// Human-readable name used in layer titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AnnualGeneration => "annual generation",
            Self::InstalledCapacity => "installed capacity",
            Self::CapacityFactor => "capacity factor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "annual_generation" | "generation" => Some(Self::AnnualGeneration),
            "installed_capacity" | "capacity" => Some(Self::InstalledCapacity),
            "capacity_factor" => Some(Self::CapacityFactor),
            _ => None,
        }
    }
}

/// Result of one ranking run.
#[derive(Debug, Clone, PartialEq)]
pub struct Rankings {
    pub n: usize,
    pub metric: RankingMetric,
    /// Descending by metric; rank 1 is the highest.
    pub top: Vec<RankedFacility>,
    /// Ascending by metric; rank 1 is the lowest.
    pub bottom: Vec<RankedFacility>,
}

impl Rankings {
    /// Every (tier, rank) a facility holds. A facility can sit in both sets
    /// when N exceeds half the facility count.
    pub fn positions_of(&self, id: &FacilityId) -> Vec<(RankTier, usize)> {
        let top = self
            .top
            .iter()
            .filter(|r| &r.facility.id == id)
            .map(|r| (RankTier::Top, r.rank));
        let bottom = self
            .bottom
            .iter()
            .filter(|r| &r.facility.id == id)
            .map(|r| (RankTier::Bottom, r.rank));
        top.chain(bottom).collect()
    }

    /// Primary tier of a facility: top wins over bottom.
    pub fn tier_of(&self, id: &FacilityId) -> RankTier {
        if self.top.iter().any(|r| &r.facility.id == id) {
            RankTier::Top
        } else if self.bottom.iter().any(|r| &r.facility.id == id) {
            RankTier::Bottom
        } else {
            RankTier::Unranked
        }
    }
}

fn ranked_set(
    facilities: &[Facility],
    values: &[f64],
    order: &[usize],
    n: usize,
    tier: RankTier,
) -> Vec<RankedFacility> {
    order
        .iter()
        .take(n)
        .enumerate()
        .map(|(pos, &i)| RankedFacility {
            facility: facilities[i].clone(),
            rank: pos + 1,
            tier,
            metric_value: values[i],
        })
        .collect()
}

/// Rank facilities by `metric`, returning the top-N and bottom-N sets.
///
/// Equal metric values are ordered by facility id ascending within both
/// sets, so the result does not depend on input order. Bottom-N members are
/// the tail of the top-N ordering, which keeps the sets disjoint even when a
/// run of equal values straddles the middle. With fewer than N facilities
/// every facility is returned in each set.
pub fn rank_facilities(
    facilities: &[Facility],
    metric: RankingMetric,
    n: usize,
) -> Result<Rankings, InvalidParameterError> {
    if n == 0 {
        return Err(InvalidParameterError::new("ranking_n", "must be > 0"));
    }

    if facilities.len() < n {
        warn!(
            facilities = facilities.len(),
            n, "Fewer facilities than requested ranking size; returning all"
        );
    }

    let values: Vec<f64> = facilities.iter().map(|f| metric.value(f)).collect();

    // One total order (metric descending, id ascending) decides membership
    // of both sets, so top and bottom never overlap while N <= len / 2.
    let mut descending: Vec<usize> = (0..facilities.len()).collect();
    descending.sort_by(|&a, &b| {
        values[b]
            .total_cmp(&values[a])
            .then_with(|| facilities[a].id.cmp(&facilities[b].id))
    });

    let tail_start = descending.len().saturating_sub(n);
    let mut ascending: Vec<usize> = descending[tail_start..].to_vec();
    ascending.sort_by(|&a, &b| {
        values[a]
            .total_cmp(&values[b])
            .then_with(|| facilities[a].id.cmp(&facilities[b].id))
    });

    let top = ranked_set(facilities, &values, &descending, n, RankTier::Top);
    let bottom = ranked_set(facilities, &values, &ascending, n, RankTier::Bottom);

    info!(
        metric = metric.label(),
        n,
        top = top.len(),
        bottom = bottom.len(),
        "Ranked facilities"
    );

    Ok(Rankings {
        n,
        metric,
        top,
        bottom,
    })
}
