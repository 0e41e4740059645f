//! Tests for reading and validating facility and weather datasets.

use atlas_common::{BoundingBox, Dataset, FacilityStatus, SampleTime, ValidationError};
use ingestion::{
    load_facilities, load_weather, read_facility_records, read_rows, read_weather_records,
    IngestionError, RawFacilityRecord, RawValue, RawWeatherRecord,
};
use test_utils::{region, DatasetDir, FACILITIES_CSV, WEATHER_CSV};

fn raw(id: &str, gen: f64) -> RawFacilityRecord {
    RawFacilityRecord {
        id: Some(id.into()),
        name: Some("Ridge".into()),
        latitude: Some(RawValue::Number(37.0)),
        longitude: Some(RawValue::Number(128.0)),
        capacity_mw: Some(RawValue::Number(10.0)),
        annual_generation_mwh: Some(RawValue::Number(gen)),
        status: Some("operating".into()),
        ..Default::default()
    }
}

fn raw_sample(lat: f64, lon: f64, ws: f64) -> RawWeatherRecord {
    RawWeatherRecord {
        latitude: Some(RawValue::Number(lat)),
        longitude: Some(RawValue::Number(lon)),
        intensity: Some(RawValue::Number(ws)),
        time: Some("2024".into()),
        ..Default::default()
    }
}

// ============================================================================
// File reading
// ============================================================================

#[test]
fn test_load_facility_csv() {
    let dir = DatasetDir::new();
    let path = dir.write("facilities.csv", FACILITIES_CSV);

    let records = read_facility_records(&path).unwrap();
    let facilities = load_facilities(&records, &region::KOREA).unwrap();

    assert_eq!(facilities.len(), 4);
    assert_eq!(facilities[0].id.as_str(), "1");
    assert_eq!(facilities[0].operator.as_deref(), Some("KEPCO"));
    assert_eq!(facilities[0].turbine_count, Some(20));
    assert_eq!(facilities[1].operator, None);
    assert_eq!(facilities[3].status, FacilityStatus::Candidate);
}

#[test]
fn test_load_weather_csv_with_asos_headers() {
    let dir = DatasetDir::new();
    let path = dir.write("weather.csv", WEATHER_CSV);

    let records = read_weather_records(&path).unwrap();
    let samples = load_weather(&records).unwrap();

    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0].station_id.as_deref(), Some("100"));
    assert_eq!(samples[0].intensity, 6.5);
    assert_eq!(samples[0].wind_direction_deg, Some(270.0));
    assert!(matches!(samples[0].time, SampleTime::Instant(_)));
    // blank wd stays absent; calm reading stays zero
    assert_eq!(samples[3].wind_direction_deg, None);
    assert_eq!(samples[3].intensity, 0.0);
}

#[test]
fn test_load_facility_json_and_yaml_agree() {
    let dir = DatasetDir::new();
    let json = dir.write(
        "f.json",
        r#"[{"id": 1, "name": "A", "lat": 35.0, "lon": 129.0, "capacity": 3, "generation": 10, "status": "operating"}]"#,
    );
    let yaml = dir.write(
        "f.yaml",
        "- id: 1\n  name: A\n  lat: 35.0\n  lon: 129.0\n  capacity: 3\n  generation: 10\n  status: operating\n",
    );

    let from_json = load_facilities(&read_facility_records(&json).unwrap(), &region::KOREA).unwrap();
    let from_yaml = load_facilities(&read_facility_records(&yaml).unwrap(), &region::KOREA).unwrap();
    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json[0].id.as_str(), "1");
}

#[test]
fn test_unsupported_extension() {
    let dir = DatasetDir::new();
    let path = dir.write("facilities.txt", FACILITIES_CSV);
    let err = read_facility_records(&path).unwrap_err();
    assert!(matches!(err, IngestionError::UnsupportedFormat(_)));
}

#[test]
fn test_missing_file() {
    let dir = DatasetDir::new();
    let err = read_facility_records(dir.path("nope.csv")).unwrap_err();
    assert!(matches!(err, IngestionError::FileRead { .. }));
}

#[test]
fn test_read_rows_errors_name_the_file() {
    let dir = DatasetDir::new();
    let missing = dir.path("gone.csv");
    match read_rows(&missing).unwrap_err() {
        IngestionError::FileRead { path, .. } => assert_eq!(path, missing.display().to_string()),
        other => panic!("expected file read error, got {:?}", other),
    }

    let broken = dir.write("broken.json", "{not json");
    match read_rows(&broken).unwrap_err() {
        IngestionError::Parse { path, .. } => assert!(path.ends_with("broken.json")),
        other => panic!("expected parse error, got {:?}", other),
    }

    let rows = read_rows(dir.write("weather.csv", WEATHER_CSV)).unwrap();
    assert!(!rows.is_empty());
}

// ============================================================================
// Facility validation
// ============================================================================

#[test]
fn test_duplicate_id_is_fatal() {
    let records = vec![raw("1", 500.0), raw("2", 100.0), raw("1", 300.0)];
    let err = load_facilities(&records, &BoundingBox::WORLD).unwrap_err();
    match err {
        ValidationError::DuplicateId {
            record,
            first_position,
        } => {
            assert_eq!(record.position, 3);
            assert_eq!(record.id.as_deref(), Some("1"));
            assert_eq!(first_position, 1);
        }
        other => panic!("expected DuplicateId, got {:?}", other),
    }
}

#[test]
fn test_missing_field_names_record_and_field() {
    let mut bad = raw("7", 10.0);
    bad.latitude = None;
    let err = load_facilities(&[raw("1", 1.0), bad], &BoundingBox::WORLD).unwrap_err();
    assert_eq!(err.field(), "latitude");
    assert_eq!(err.record().position, 2);
    assert_eq!(err.record().dataset, Dataset::Facilities);
    assert_eq!(err.record().id.as_deref(), Some("7"));
}

#[test]
fn test_missing_id() {
    let mut bad = raw("x", 10.0);
    bad.id = Some(RawValue::Text("   ".to_string()));
    let err = load_facilities(&[bad], &BoundingBox::WORLD).unwrap_err();
    assert!(matches!(err, ValidationError::MissingField { field: "id", .. }));
}

#[test]
fn test_coordinate_outside_region() {
    // Tokyo is outside the Korean region box
    let mut bad = raw("1", 10.0);
    bad.latitude = Some(RawValue::Number(35.68));
    bad.longitude = Some(RawValue::Number(139.69));
    let err = load_facilities(&[bad], &region::KOREA).unwrap_err();
    match err {
        ValidationError::OutOfRange {
            field, value, max, ..
        } => {
            assert_eq!(field, "longitude");
            assert_eq!(value, 139.69);
            assert_eq!(max, 132.0);
        }
        other => panic!("expected OutOfRange, got {:?}", other),
    }
}

#[test]
fn test_negative_generation_rejected() {
    let err = load_facilities(&[raw("1", -5.0)], &BoundingBox::WORLD).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::Constraint {
            field: "annual_generation_mwh",
            constraint: "non-negative",
            ..
        }
    ));
}

#[test]
fn test_unknown_status_rejected() {
    let mut bad = raw("1", 5.0);
    bad.status = Some("mothballed".into());
    let err = load_facilities(&[bad], &BoundingBox::WORLD).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidValue { field: "status", ref value, .. } if value == "mothballed"
    ));
}

#[test]
fn test_text_in_numeric_field() {
    let mut bad = raw("1", 5.0);
    bad.capacity_mw = Some("forty".into());
    let err = load_facilities(&[bad], &BoundingBox::WORLD).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::NotANumber { field: "capacity_mw", ref value, .. } if value == "forty"
    ));
}

#[test]
fn test_inputs_not_mutated() {
    let records = vec![raw("1", 5.0), raw("2", 6.0)];
    let before = records.clone();
    load_facilities(&records, &BoundingBox::WORLD).unwrap();
    assert_eq!(records, before);
}

// ============================================================================
// Weather validation
// ============================================================================

#[test]
fn test_negative_wind_speed_rejected() {
    let err = load_weather(&[raw_sample(35.0, 129.0, 1.0), raw_sample(35.0, 129.0, -0.1)])
        .unwrap_err();
    assert_eq!(err.field(), "intensity");
    assert_eq!(err.record().position, 2);
    assert_eq!(err.record().dataset, Dataset::Weather);
}

#[test]
fn test_weather_latitude_out_of_range() {
    let err = load_weather(&[raw_sample(95.0, 129.0, 1.0)]).unwrap_err();
    assert!(matches!(err, ValidationError::OutOfRange { field: "latitude", .. }));
}

#[test]
fn test_weather_time_required() {
    let mut s = raw_sample(35.0, 129.0, 1.0);
    s.time = None;
    let err = load_weather(&[s]).unwrap_err();
    assert!(matches!(err, ValidationError::MissingField { field: "time", .. }));
}

#[test]
fn test_humidity_range() {
    let mut s = raw_sample(35.0, 129.0, 1.0);
    s.humidity_pct = Some(RawValue::Number(120.0));
    let err = load_weather(&[s]).unwrap_err();
    assert!(matches!(err, ValidationError::OutOfRange { field: "humidity_pct", .. }));
}
