//! Layer composition.
//!
//! Turns ranking and proximity results into the fixed, ordered list of
//! overlay layers plus the per-facility detail table. Pure: the same inputs
//! always give the same layers in the same order.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{debug, info};

use analysis::{Rankings, Reducer};
use atlas_common::{
    Facility, FacilityDetail, FacilityId, HeatPoint, HeatStyle, Intensity, Layer, LayerElements,
    LayerGroup, LayerId, Marker, MarkerStyle, ProximityBinding, RankTier, RankedFacility,
    TierStyle, TierStyles,
};

/// Everything the artifact emitter needs besides the base map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedMap {
    /// Overlays in display order.
    pub layers: Vec<Layer>,
    /// Facility details keyed by id, in natural id order.
    pub details: BTreeMap<FacilityId, FacilityDetail>,
    /// Units of the aggregated intensity ("m/s", "W/m²").
    pub intensity_units: String,
}

impl ComposedMap {
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id.as_str() == id)
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }
}

/// Builds layers from analysis results using explicit tier styling.
#[derive(Debug, Clone)]
pub struct LayerComposer {
    styles: TierStyles,
    heat: HeatStyle,
    include_candidates: bool,
}

impl Default for LayerComposer {
    fn default() -> Self {
        Self::new(TierStyles::default(), HeatStyle::default())
    }
}

impl LayerComposer {
    pub fn new(styles: TierStyles, heat: HeatStyle) -> Self {
        Self {
            styles,
            heat,
            include_candidates: false,
        }
    }

    /// Add the `candidate_sites` layer for planned and candidate facilities.
    pub fn with_candidates(mut self, enabled: bool) -> Self {
        self.include_candidates = enabled;
        self
    }

    pub fn includes_candidates(&self) -> bool {
        self.include_candidates
    }

    /// Compose the overlay layers and detail table.
    ///
    /// `facilities` is the full loaded table: it supplies heat point
    /// positions, candidate sites and the detail entries.
    pub fn compose(
        &self,
        rankings: &Rankings,
        bindings: &[ProximityBinding],
        facilities: &[Facility],
        reducer: Reducer,
    ) -> ComposedMap {
        let by_id: HashMap<&FacilityId, &Facility> =
            facilities.iter().map(|f| (&f.id, f)).collect();

        let mut layers = Vec::with_capacity(4);
        layers.push(self.ranked_layer(
            LayerId::TOP_N,
            format!("Top {} by {}", rankings.n, rankings.metric.label()),
            &rankings.top,
            RankTier::Top,
        ));
        layers.push(self.ranked_layer(
            LayerId::BOTTOM_N,
            format!("Bottom {} by {}", rankings.n, rankings.metric.label()),
            &rankings.bottom,
            RankTier::Bottom,
        ));
        if self.include_candidates {
            layers.push(self.candidate_layer(facilities));
        }
        layers.push(self.heat_layer(bindings, &by_id, reducer));

        let details = build_details(rankings, bindings, facilities);

        info!(
            layers = layers.len(),
            details = details.len(),
            "Composed map layers"
        );

        ComposedMap {
            layers,
            details,
            intensity_units: reducer.units().to_string(),
        }
    }

    fn ranked_layer(
        &self,
        id: &str,
        name: String,
        ranked: &[RankedFacility],
        tier: RankTier,
    ) -> Layer {
        let style = self.styles.for_tier(tier);
        let markers = ranked
            .iter()
            .map(|r| Marker {
                lat: r.facility.latitude,
                lon: r.facility.longitude,
                label: format!("#{} {}", r.rank, r.facility.name),
                detail_key: r.facility.id.to_string(),
                style: marker_style(style),
            })
            .collect();

        Layer {
            id: LayerId::new(id),
            name,
            group: LayerGroup::Facilities,
            visible: true,
            elements: LayerElements::Markers { markers },
        }
    }

    fn candidate_layer(&self, facilities: &[Facility]) -> Layer {
        let mut sites: Vec<&Facility> = facilities
            .iter()
            .filter(|f| f.status.is_prospective())
            .collect();
        sites.sort_by(|a, b| a.id.cmp(&b.id));

        let markers = sites
            .into_iter()
            .map(|f| Marker {
                lat: f.latitude,
                lon: f.longitude,
                label: format!("{} ({})", f.name, f.status),
                detail_key: f.id.to_string(),
                style: marker_style(self.styles.for_tier(RankTier::Unranked)),
            })
            .collect();

        Layer {
            id: LayerId::new(LayerId::CANDIDATE_SITES),
            name: "Candidate sites".to_string(),
            group: LayerGroup::Facilities,
            visible: true,
            elements: LayerElements::Markers { markers },
        }
    }

    fn heat_layer(
        &self,
        bindings: &[ProximityBinding],
        by_id: &HashMap<&FacilityId, &Facility>,
        reducer: Reducer,
    ) -> Layer {
        let max = bindings
            .iter()
            .filter_map(|b| b.aggregate.value())
            .fold(0.0_f64, f64::max);

        let mut points = Vec::new();
        for binding in bindings {
            let Some(value) = binding.aggregate.value() else {
                continue;
            };
            let Some(facility) = by_id.get(&binding.facility_id) else {
                debug!(facility = %binding.facility_id, "Binding without a facility; skipped");
                continue;
            };
            let weight = if max > 0.0 { value / max } else { 0.0 };
            points.push(HeatPoint {
                lat: facility.latitude,
                lon: facility.longitude,
                weight,
                value,
                detail_key: facility.id.to_string(),
            });
        }

        Layer {
            id: LayerId::new(LayerId::WIND_HEATMAP),
            name: format!("Wind intensity ({})", reducer.label()),
            group: LayerGroup::Weather,
            visible: true,
            elements: LayerElements::Heat {
                points,
                radius: self.heat.radius,
                blur: self.heat.blur,
                min_opacity: self.heat.min_opacity,
                gradient: self.heat.gradient_hex(),
            },
        }
    }
}

fn marker_style(style: &TierStyle) -> MarkerStyle {
    MarkerStyle {
        color: style.color.to_hex(),
        radius: style.radius,
        fill_opacity: style.fill_opacity,
    }
}

fn build_details(
    rankings: &Rankings,
    bindings: &[ProximityBinding],
    facilities: &[Facility],
) -> BTreeMap<FacilityId, FacilityDetail> {
    let by_binding: HashMap<&FacilityId, &ProximityBinding> =
        bindings.iter().map(|b| (&b.facility_id, b)).collect();

    facilities
        .iter()
        .map(|f| {
            let binding = by_binding.get(&f.id);
            let detail = FacilityDetail {
                id: f.id.to_string(),
                name: f.name.clone(),
                status: f.status.to_string(),
                lat: f.latitude,
                lon: f.longitude,
                capacity_mw: f.capacity_mw,
                annual_generation_mwh: f.annual_generation_mwh,
                capacity_factor: f.capacity_factor(),
                operator: f.operator.clone(),
                hub_height_m: f.hub_height_m,
                turbine_count: f.turbine_count,
                commissioned_year: f.commissioned_year,
                ranks: rankings.positions_of(&f.id),
                intensity: binding.map_or(Intensity::NoData, |b| b.aggregate),
                nearby_samples: binding.map_or(0, |b| b.sample_count()),
                weibull: binding.and_then(|b| b.weibull),
            };
            (f.id.clone(), detail)
        })
        .collect()
}
