//! Common types and utilities shared across the wind atlas crates.

pub mod bbox;
pub mod error;
pub mod geo;
pub mod layer;
pub mod model;
pub mod style;

pub use bbox::BoundingBox;
pub use error::{
    AtlasError, AtlasResult, Dataset, EmissionError, InvalidParameterError, RecordRef,
    ValidationError,
};
pub use geo::{haversine_distance_km, haversine_distance_m, EARTH_RADIUS_M};
pub use layer::{
    FacilityDetail, HeatPoint, Layer, LayerElements, LayerGroup, LayerId, Marker, MarkerStyle,
};
pub use model::{
    Facility, FacilityId, FacilityStatus, Intensity, ProximityBinding, RankTier, RankedFacility,
    SampleMatch, SampleTime, WeatherSample, WeibullFit,
};
pub use style::{Color, ColorParseError, ColorStop, HeatStyle, TierStyle, TierStyles};
