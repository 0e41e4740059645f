//! Declarative map layer descriptions.
//!
//! These are produced by the layer composer and read by the artifact
//! emitter; neither side knows how the browser draws them.

use serde::Serialize;

use crate::model::{Intensity, RankTier, WeibullFit};

/// Unique identifier for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LayerId(pub String);

impl LayerId {
    pub const TOP_N: &'static str = "top_n";
    pub const BOTTOM_N: &'static str = "bottom_n";
    pub const CANDIDATE_SITES: &'static str = "candidate_sites";
    pub const WIND_HEATMAP: &'static str = "wind_heatmap";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Toggle group a layer is listed under in the layer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerGroup {
    Facilities,
    Weather,
}

impl LayerGroup {
    pub fn title(&self) -> &'static str {
        match self {
            LayerGroup::Facilities => "Facilities",
            LayerGroup::Weather => "Weather",
        }
    }
}

/// Resolved marker appearance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    /// "#rrggbb"
    pub color: String,
    pub radius: f64,
    pub fill_opacity: f64,
}

/// A facility marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    /// Short text shown on hover.
    pub label: String,
    /// Key into the artifact's detail table.
    pub detail_key: String,
    pub style: MarkerStyle,
}

/// A weighted heatmap point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    /// Normalized weight in [0, 1].
    pub weight: f64,
    /// The un-normalized aggregate the weight came from.
    pub value: f64,
    /// Facility the point is anchored to.
    pub detail_key: String,
}

/// The visual elements of one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerElements {
    Markers {
        markers: Vec<Marker>,
    },
    Heat {
        points: Vec<HeatPoint>,
        radius: f64,
        blur: f64,
        min_opacity: f64,
        /// Ordered (position, "#rrggbb") pairs.
        gradient: Vec<(f64, String)>,
    },
}

impl LayerElements {
    pub fn len(&self) -> usize {
        match self {
            LayerElements::Markers { markers } => markers.len(),
            LayerElements::Heat { points, .. } => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (label, lat, lon) of every element, for bounds checks.
    pub fn positions(&self) -> Vec<(String, f64, f64)> {
        match self {
            LayerElements::Markers { markers } => markers
                .iter()
                .map(|m| (m.detail_key.clone(), m.lat, m.lon))
                .collect(),
            LayerElements::Heat { points, .. } => points
                .iter()
                .map(|p| (p.detail_key.clone(), p.lat, p.lon))
                .collect(),
        }
    }
}

/// A named, toggleable overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: LayerId,
    /// Title shown in the layer control.
    pub name: String,
    pub group: LayerGroup,
    /// Whether the layer is switched on when the map opens.
    pub visible: bool,
    pub elements: LayerElements,
}

/// Extended per-facility information shown on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityDetail {
    pub id: String,
    pub name: String,
    pub status: String,
    pub lat: f64,
    pub lon: f64,
    pub capacity_mw: f64,
    pub annual_generation_mwh: f64,
    pub capacity_factor: f64,
    pub operator: Option<String>,
    pub hub_height_m: Option<f64>,
    pub turbine_count: Option<u32>,
    pub commissioned_year: Option<i32>,
    /// (tier, 1-based rank) for every ranked set the facility appears in.
    pub ranks: Vec<(RankTier, usize)>,
    pub intensity: Intensity,
    pub nearby_samples: usize,
    pub weibull: Option<WeibullFit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_elements_serialize_with_kind_tag() {
        let elements = LayerElements::Heat {
            points: vec![],
            radius: 25.0,
            blur: 15.0,
            min_opacity: 0.3,
            gradient: vec![(0.5, "#ffffff".to_string())],
        };
        let json = serde_json::to_value(&elements).unwrap();
        assert_eq!(json["kind"], "heat");
        assert_eq!(json["gradient"][0][1], "#ffffff");
        assert!(elements.is_empty());
    }

    #[test]
    fn test_marker_positions() {
        let elements = LayerElements::Markers {
            markers: vec![Marker {
                lat: 35.0,
                lon: 129.0,
                label: "A".to_string(),
                detail_key: "1".to_string(),
                style: MarkerStyle {
                    color: "#000000".to_string(),
                    radius: 8.0,
                    fill_opacity: 0.8,
                },
            }],
        };
        assert_eq!(elements.positions(), vec![("1".to_string(), 35.0, 129.0)]);
    }
}
