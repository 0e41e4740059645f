//! Normalization of raw records into validated domain types.
//!
//! Validation stops at the first failing record; the error names the record
//! (dataset, 1-based position, identifier when known) and the field.

use std::collections::HashMap;

use atlas_common::{
    BoundingBox, Dataset, Facility, FacilityId, FacilityStatus, RecordRef, SampleTime,
    ValidationError, WeatherSample,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info};

use crate::raw::{RawFacilityRecord, RawValue, RawWeatherRecord};

type FieldResult<T> = std::result::Result<T, ValidationError>;

/// Field accessors bound to one record, so every error carries its origin.
struct Fields {
    record: RecordRef,
}

impl Fields {
    fn required<'v>(
        &self,
        value: &'v Option<RawValue>,
        field: &'static str,
    ) -> FieldResult<&'v RawValue> {
        match value {
            Some(v) if !v.is_blank() => Ok(v),
            _ => Err(ValidationError::MissingField {
                record: self.record.clone(),
                field,
            }),
        }
    }

    fn number(&self, value: &RawValue, field: &'static str) -> FieldResult<f64> {
        let parsed = match value {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Bool(_) | RawValue::Null => None,
        };
        match parsed {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(ValidationError::NotANumber {
                record: self.record.clone(),
                field,
                value: value.as_text(),
            }),
        }
    }

    fn required_number(&self, value: &Option<RawValue>, field: &'static str) -> FieldResult<f64> {
        let raw = self.required(value, field)?;
        self.number(raw, field)
    }

    fn optional_number(
        &self,
        value: &Option<RawValue>,
        field: &'static str,
    ) -> FieldResult<Option<f64>> {
        match value {
            Some(v) if !v.is_blank() => self.number(v, field).map(Some),
            _ => Ok(None),
        }
    }

    fn optional_integer(
        &self,
        value: &Option<RawValue>,
        field: &'static str,
        min: f64,
        max: f64,
    ) -> FieldResult<Option<i64>> {
        match self.optional_number(value, field)? {
            Some(n) if n.fract() != 0.0 => Err(ValidationError::Constraint {
                record: self.record.clone(),
                field,
                constraint: "a whole number",
                value: n,
            }),
            Some(n) => {
                self.in_range(field, n, min, max)?;
                Ok(Some(n as i64))
            }
            None => Ok(None),
        }
    }

    fn required_text(&self, value: &Option<RawValue>, field: &'static str) -> FieldResult<String> {
        self.required(value, field).map(RawValue::as_text)
    }

    fn optional_text(value: &Option<RawValue>) -> Option<String> {
        value
            .as_ref()
            .filter(|v| !v.is_blank())
            .map(RawValue::as_text)
    }

    fn in_range(&self, field: &'static str, value: f64, min: f64, max: f64) -> FieldResult<()> {
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                record: self.record.clone(),
                field,
                value,
                min,
                max,
            });
        }
        Ok(())
    }

    fn constraint(
        &self,
        ok: bool,
        field: &'static str,
        constraint: &'static str,
        value: f64,
    ) -> FieldResult<()> {
        if ok {
            Ok(())
        } else {
            Err(ValidationError::Constraint {
                record: self.record.clone(),
                field,
                constraint,
                value,
            })
        }
    }
}

fn normalize_facility(
    raw: &RawFacilityRecord,
    position: usize,
    region: &BoundingBox,
) -> FieldResult<Facility> {
    let id_text = raw
        .id
        .as_ref()
        .filter(|v| !v.is_blank())
        .map(RawValue::as_text);
    let fields = Fields {
        record: RecordRef::new(Dataset::Facilities, position, id_text.clone()),
    };

    let id = match id_text {
        Some(id) => FacilityId::new(id),
        None => {
            return Err(ValidationError::MissingField {
                record: fields.record,
                field: "id",
            })
        }
    };
    let name = fields.required_text(&raw.name, "name")?;

    let latitude = fields.required_number(&raw.latitude, "latitude")?;
    fields.in_range("latitude", latitude, region.min_y, region.max_y)?;
    let longitude = fields.required_number(&raw.longitude, "longitude")?;
    fields.in_range("longitude", longitude, region.min_x, region.max_x)?;

    let capacity_mw = fields.required_number(&raw.capacity_mw, "capacity_mw")?;
    fields.constraint(capacity_mw > 0.0, "capacity_mw", "positive", capacity_mw)?;

    let annual_generation_mwh =
        fields.required_number(&raw.annual_generation_mwh, "annual_generation_mwh")?;
    fields.constraint(
        annual_generation_mwh >= 0.0,
        "annual_generation_mwh",
        "non-negative",
        annual_generation_mwh,
    )?;

    let status_text = fields.required_text(&raw.status, "status")?;
    let status = FacilityStatus::parse(&status_text).ok_or_else(|| {
        ValidationError::InvalidValue {
            record: fields.record.clone(),
            field: "status",
            value: status_text.clone(),
        }
    })?;

    let hub_height_m = fields.optional_number(&raw.hub_height_m, "hub_height_m")?;
    if let Some(h) = hub_height_m {
        fields.constraint(h > 0.0, "hub_height_m", "positive", h)?;
    }
    let turbine_count = fields
        .optional_integer(&raw.turbine_count, "turbine_count", 0.0, u32::MAX as f64)?
        .map(|n| n as u32);
    let commissioned_year = fields
        .optional_integer(&raw.commissioned_year, "commissioned_year", 1800.0, 2200.0)?
        .map(|n| n as i32);

    Ok(Facility {
        id,
        name,
        latitude,
        longitude,
        capacity_mw,
        annual_generation_mwh,
        status,
        operator: Fields::optional_text(&raw.operator),
        hub_height_m,
        turbine_count,
        commissioned_year,
    })
}

/// Validate and normalize facility records.
///
/// Coordinates must fall inside `region` (edges included). Duplicate
/// identifiers are rejected, since they would make the ranking ambiguous.
pub fn load_facilities(
    records: &[RawFacilityRecord],
    region: &BoundingBox,
) -> Result<Vec<Facility>, ValidationError> {
    let mut facilities = Vec::with_capacity(records.len());
    let mut seen: HashMap<FacilityId, usize> = HashMap::with_capacity(records.len());

    for (index, raw) in records.iter().enumerate() {
        let position = index + 1;
        let facility = normalize_facility(raw, position, region)?;

        if let Some(&first_position) = seen.get(&facility.id) {
            return Err(ValidationError::DuplicateId {
                record: RecordRef::new(
                    Dataset::Facilities,
                    position,
                    Some(facility.id.to_string()),
                ),
                first_position,
            });
        }
        seen.insert(facility.id.clone(), position);

        debug!(id = %facility.id, status = %facility.status, "Validated facility");
        facilities.push(facility);
    }

    info!(count = facilities.len(), "Loaded facilities");
    Ok(facilities)
}

/// Interpret a time cell as an instant when it looks like one.
///
/// RFC 3339 values keep their offset; naive "YYYY-MM-DD HH:MM[:SS]" values
/// (the ASOS export format) are taken as UTC. Anything else is a period
/// label.
pub fn parse_sample_time(raw: &RawValue) -> SampleTime {
    let text = raw.as_text();

    if let Ok(t) = DateTime::parse_from_rfc3339(&text) {
        return SampleTime::Instant(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(&text, fmt) {
            return SampleTime::Instant(t.and_utc());
        }
    }
    SampleTime::Period(text)
}

fn normalize_sample(raw: &RawWeatherRecord, position: usize) -> FieldResult<WeatherSample> {
    let station_id = Fields::optional_text(&raw.station_id);
    let fields = Fields {
        record: RecordRef::new(Dataset::Weather, position, station_id.clone()),
    };

    let latitude = fields.required_number(&raw.latitude, "latitude")?;
    fields.in_range("latitude", latitude, -90.0, 90.0)?;
    let longitude = fields.required_number(&raw.longitude, "longitude")?;
    fields.in_range("longitude", longitude, -180.0, 180.0)?;

    let intensity = fields.required_number(&raw.intensity, "intensity")?;
    fields.constraint(intensity >= 0.0, "intensity", "non-negative", intensity)?;

    let time = parse_sample_time(fields.required(&raw.time, "time")?);

    let wind_direction_deg = fields.optional_number(&raw.wind_direction_deg, "wind_direction_deg")?;
    if let Some(wd) = wind_direction_deg {
        fields.in_range("wind_direction_deg", wd, 0.0, 360.0)?;
    }
    let temperature_c = fields.optional_number(&raw.temperature_c, "temperature_c")?;
    let humidity_pct = fields.optional_number(&raw.humidity_pct, "humidity_pct")?;
    if let Some(hm) = humidity_pct {
        fields.in_range("humidity_pct", hm, 0.0, 100.0)?;
    }

    Ok(WeatherSample {
        latitude,
        longitude,
        intensity,
        time,
        station_id,
        wind_direction_deg,
        temperature_c,
        humidity_pct,
    })
}

/// Validate and normalize weather records.
///
/// Samples only need valid geographic coordinates; they may lie outside the
/// facility region and simply never be selected.
pub fn load_weather(records: &[RawWeatherRecord]) -> Result<Vec<WeatherSample>, ValidationError> {
    let samples = records
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_sample(raw, index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    info!(count = samples.len(), "Loaded weather samples");
    Ok(samples)
}
