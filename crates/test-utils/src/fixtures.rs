//! Common test fixtures for wind atlas tests.

use atlas_common::{BoundingBox, Facility, FacilityId, FacilityStatus, SampleTime, WeatherSample};

/// Region bounding boxes.
pub mod region {
    use super::BoundingBox;

    /// South Korea mainland and Jeju.
    pub const KOREA: BoundingBox = BoundingBox {
        min_x: 124.0,
        min_y: 33.0,
        max_x: 132.0,
        max_y: 39.0,
    };

    /// A small box around Jeju island.
    pub const JEJU: BoundingBox = BoundingBox {
        min_x: 126.1,
        min_y: 33.1,
        max_x: 127.0,
        max_y: 33.6,
    };
}

/// An operating facility with the given id and annual generation, placed at
/// a fixed point in Gangwon.
pub fn facility(id: &str, generation_mwh: f64) -> Facility {
    facility_at(id, generation_mwh, 37.7, 128.7)
}

/// An operating facility at a specific location.
pub fn facility_at(id: &str, generation_mwh: f64, lat: f64, lon: f64) -> Facility {
    Facility {
        id: FacilityId::new(id),
        name: format!("Wind Farm {}", id),
        latitude: lat,
        longitude: lon,
        capacity_mw: 20.0,
        annual_generation_mwh: generation_mwh,
        status: FacilityStatus::Operating,
        operator: None,
        hub_height_m: None,
        turbine_count: None,
        commissioned_year: None,
    }
}

/// A planned/candidate site with no output yet.
pub fn candidate_site(id: &str, lat: f64, lon: f64) -> Facility {
    Facility {
        status: FacilityStatus::Candidate,
        annual_generation_mwh: 0.0,
        ..facility_at(id, 0.0, lat, lon)
    }
}

/// The three-facility ranking scenario: ids 1, 2, 3 with 500, 100, 300 MWh.
pub fn scenario_facilities() -> Vec<Facility> {
    vec![
        facility("1", 500.0),
        facility("2", 100.0),
        facility("3", 300.0),
    ]
}

/// A weather sample at a point.
pub fn sample_at(lat: f64, lon: f64, intensity: f64) -> WeatherSample {
    WeatherSample {
        latitude: lat,
        longitude: lon,
        intensity,
        time: SampleTime::Period("2024".to_string()),
        station_id: None,
        wind_direction_deg: None,
        temperature_c: None,
        humidity_pct: None,
    }
}
