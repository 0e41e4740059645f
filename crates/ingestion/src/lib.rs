//! Record loading for the wind atlas pipeline.
//!
//! Raw datasets arrive as loosely typed rows (CSV cells are always text,
//! JSON and YAML carry their own scalar types). This crate maps every
//! format onto one raw record schema and then normalizes it into the strict
//! `Facility` / `WeatherSample` types, rejecting anything that does not
//! conform:
//!
//! - [`reader`] turns files into [`RawRow`]s
//! - [`raw`] maps rows onto raw facility/weather records by column alias
//! - [`loader`] validates and normalizes raw records

pub mod error;
pub mod loader;
pub mod raw;
pub mod reader;

pub use error::{IngestionError, Result};
pub use loader::{load_facilities, load_weather};
pub use raw::{RawFacilityRecord, RawRow, RawValue, RawWeatherRecord};
pub use reader::{read_facility_records, read_rows, read_weather_records, DataFormat};
