//! Tests for layer composition and HTML emission.

use analysis::{rank_facilities, ProximityAggregator, ProximityPolicy, RankingMetric, Reducer};
use atlas_common::{BoundingBox, EmissionError, Facility, LayerId};
use renderer::{emit_document, write_artifact, BaseMapConfig, ComposedMap, LayerComposer};
use test_utils::{candidate_site, region, sample_at, scenario_facilities};

fn korea_base() -> BaseMapConfig {
    BaseMapConfig {
        title: "Korea wind atlas".to_string(),
        center: (36.5, 127.8),
        zoom: 7,
        valid_bounds: region::KOREA,
        ..Default::default()
    }
}

fn compose(facilities: &[Facility], with_candidates: bool) -> ComposedMap {
    let samples = vec![
        sample_at(37.70, 128.70, 6.0),
        sample_at(37.72, 128.71, 8.0),
        sample_at(33.40, 126.50, 3.0),
    ];
    let operating: Vec<Facility> = facilities
        .iter()
        .filter(|f| !f.status.is_prospective())
        .cloned()
        .collect();
    let rankings = rank_facilities(&operating, RankingMetric::AnnualGeneration, 2).unwrap();
    let bindings =
        ProximityAggregator::new(ProximityPolicy::Radius { radius_km: 10.0 }, Reducer::Mean)
            .unwrap()
            .bind(facilities, &samples);

    LayerComposer::default()
        .with_candidates(with_candidates)
        .compose(&rankings, &bindings, facilities, Reducer::Mean)
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_layer_ids_and_names() {
    let map = compose(&scenario_facilities(), false);
    assert_eq!(
        map.layer_ids(),
        vec![LayerId::TOP_N, LayerId::BOTTOM_N, LayerId::WIND_HEATMAP]
    );
    let names: Vec<&str> = map.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Top 2 by annual generation",
            "Bottom 2 by annual generation",
            "Wind intensity (mean wind speed)",
        ]
    );
    assert_eq!(map.intensity_units, "m/s");
}

#[test]
fn test_markers_follow_rank_order() {
    let map = compose(&scenario_facilities(), false);
    let top = map.layer(LayerId::TOP_N).unwrap();
    let keys: Vec<String> = top.elements.positions().into_iter().map(|p| p.0).collect();
    assert_eq!(keys, vec!["1", "3"]);

    let bottom = map.layer(LayerId::BOTTOM_N).unwrap();
    let keys: Vec<String> = bottom.elements.positions().into_iter().map(|p| p.0).collect();
    assert_eq!(keys, vec!["2", "3"]);
}

#[test]
fn test_candidate_sites_layer() {
    let mut facilities = scenario_facilities();
    facilities.push(candidate_site("C1", 35.2, 129.1));

    let map = compose(&facilities, true);
    assert_eq!(
        map.layer_ids(),
        vec![
            LayerId::TOP_N,
            LayerId::BOTTOM_N,
            LayerId::CANDIDATE_SITES,
            LayerId::WIND_HEATMAP
        ]
    );
    let detail = &map.details[&atlas_common::FacilityId::new("C1")];
    assert!(detail.ranks.is_empty());
    assert!(detail.intensity.is_no_data());
    assert_eq!(detail.status, "candidate");
}

// ============================================================================
// Emission
// ============================================================================

#[test]
fn test_emission_is_deterministic() {
    let a = emit_document(&korea_base(), &compose(&scenario_facilities(), false)).unwrap();
    let b = emit_document(&korea_base(), &compose(&scenario_facilities(), false)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_document_contents() {
    let doc = emit_document(&korea_base(), &compose(&scenario_facilities(), false)).unwrap();
    assert!(doc.starts_with("<!doctype html>"));
    assert!(doc.contains("<title>Korea wind atlas</title>"));
    assert!(doc.contains("leaflet/1.9.4/leaflet.js"));
    assert!(doc.contains("leaflet-heat.js"));
    assert!(doc.contains("L.control.layers"));
    assert!(doc.contains(r#""control_label":"Facilities: Top 2 by annual generation""#));
    assert!(doc.contains(r#""control_label":"Weather: Wind intensity (mean wind speed)""#));
    // exactly one base tile layer
    assert_eq!(doc.matches("L.tileLayer(").count(), 1);
}

#[test]
fn test_panning_limited_to_valid_bounds() {
    let doc = emit_document(&korea_base(), &compose(&scenario_facilities(), false)).unwrap();
    assert!(doc.contains(r#""max_bounds":[[33.0,124.0],[39.0,132.0]]"#));
    assert!(doc.contains("maxBounds: data.base.max_bounds"));
}

#[test]
fn test_embedded_names_cannot_close_script() {
    let mut facilities = scenario_facilities();
    facilities[0].name = "</script><script>alert(1)</script>".to_string();
    let doc = emit_document(&korea_base(), &compose(&facilities, false)).unwrap();
    assert!(!doc.contains("</script><script>alert"));
    assert!(doc.contains(r"\u003c/script>\u003cscript>alert(1)"));
}

#[test]
fn test_empty_layers_rejected() {
    let map = ComposedMap {
        layers: vec![],
        details: Default::default(),
        intensity_units: "m/s".to_string(),
    };
    assert!(matches!(
        emit_document(&korea_base(), &map),
        Err(EmissionError::EmptyLayers)
    ));
}

#[test]
fn test_unexpected_layer_set_rejected() {
    let mut map = compose(&scenario_facilities(), false);
    map.layers.pop();
    match emit_document(&korea_base(), &map) {
        Err(EmissionError::UnexpectedLayers { expected, actual }) => {
            assert_eq!(expected.len(), 3);
            assert_eq!(actual, vec!["top_n", "bottom_n"]);
        }
        other => panic!("expected UnexpectedLayers, got {:?}", other),
    }

    let mut map = compose(&scenario_facilities(), false);
    map.layers.swap(0, 1);
    assert!(matches!(
        emit_document(&korea_base(), &map),
        Err(EmissionError::UnexpectedLayers { .. })
    ));
}

#[test]
fn test_out_of_bounds_element_names_layer_and_element() {
    let base = BaseMapConfig {
        center: (33.3, 126.5),
        valid_bounds: region::JEJU,
        ..korea_base()
    };
    match emit_document(&base, &compose(&scenario_facilities(), false)) {
        Err(EmissionError::OutOfBounds { layer, element, .. }) => {
            assert_eq!(layer, "top_n");
            assert_eq!(element, "1");
        }
        other => panic!("expected OutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_invalid_base_map_rejected() {
    let base = BaseMapConfig {
        zoom: 30,
        ..korea_base()
    };
    assert!(matches!(
        emit_document(&base, &compose(&scenario_facilities(), false)),
        Err(EmissionError::InvalidBaseMap(_))
    ));

    let base = BaseMapConfig {
        valid_bounds: BoundingBox::new(132.0, 33.0, 124.0, 39.0),
        ..korea_base()
    };
    assert!(matches!(
        emit_document(&base, &compose(&scenario_facilities(), false)),
        Err(EmissionError::InvalidBaseMap(_))
    ));
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn test_write_artifact_replaces_file_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.html");
    std::fs::write(&path, "old").unwrap();

    let doc = emit_document(&korea_base(), &compose(&scenario_facilities(), false)).unwrap();
    write_artifact(&path, &doc).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), doc);
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temporary file left behind");
}

#[test]
fn test_write_artifact_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("map.html");
    assert!(matches!(
        write_artifact(&path, "<html></html>"),
        Err(EmissionError::Write(_))
    ));
    assert!(!path.exists());
}
