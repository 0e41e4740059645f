//! Raw, loosely typed input records.
//!
//! A [`RawRow`] is whatever one line/object of a dataset contained, keyed by
//! lowercased column name. The raw record structs pick the known columns out
//! of a row (accepting a few aliases, including the ASOS hourly export
//! names) without interpreting their values yet.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A single scalar cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Blank text and nulls count as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The value as display text, as it would appear in the source.
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Null => String::new(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{:.0}", n),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// One dataset row keyed by lowercased column name.
pub type RawRow = BTreeMap<String, RawValue>;

/// Return the first non-blank value among the given column aliases.
fn pick(row: &RawRow, aliases: &[&str]) -> Option<RawValue> {
    aliases
        .iter()
        .filter_map(|alias| row.get(*alias))
        .find(|v| !v.is_blank())
        .cloned()
}

/// A facility record before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFacilityRecord {
    pub id: Option<RawValue>,
    pub name: Option<RawValue>,
    pub latitude: Option<RawValue>,
    pub longitude: Option<RawValue>,
    pub capacity_mw: Option<RawValue>,
    pub annual_generation_mwh: Option<RawValue>,
    pub status: Option<RawValue>,
    pub operator: Option<RawValue>,
    pub hub_height_m: Option<RawValue>,
    pub turbine_count: Option<RawValue>,
    pub commissioned_year: Option<RawValue>,
}

impl RawFacilityRecord {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            id: pick(row, &["id", "facility_id", "code"]),
            name: pick(row, &["name", "facility_name"]),
            latitude: pick(row, &["latitude", "lat"]),
            longitude: pick(row, &["longitude", "lon", "lng"]),
            capacity_mw: pick(row, &["capacity_mw", "capacity", "installed_capacity"]),
            annual_generation_mwh: pick(
                row,
                &["annual_generation_mwh", "annual_generation", "generation", "gen"],
            ),
            status: pick(row, &["status"]),
            operator: pick(row, &["operator"]),
            hub_height_m: pick(row, &["hub_height_m", "hub_height"]),
            turbine_count: pick(row, &["turbine_count", "turbines"]),
            commissioned_year: pick(row, &["commissioned_year", "commissioned"]),
        }
    }
}

/// A weather record before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWeatherRecord {
    pub latitude: Option<RawValue>,
    pub longitude: Option<RawValue>,
    pub intensity: Option<RawValue>,
    pub time: Option<RawValue>,
    pub station_id: Option<RawValue>,
    pub wind_direction_deg: Option<RawValue>,
    pub temperature_c: Option<RawValue>,
    pub humidity_pct: Option<RawValue>,
}

impl RawWeatherRecord {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            latitude: pick(row, &["latitude", "lat"]),
            longitude: pick(row, &["longitude", "lon", "lng"]),
            intensity: pick(row, &["intensity", "wind_speed", "ws"]),
            time: pick(row, &["time", "timestamp", "tm", "period"]),
            station_id: pick(row, &["station_id", "station", "stnid", "stn_id"]),
            wind_direction_deg: pick(row, &["wind_direction_deg", "wind_direction", "wd"]),
            temperature_c: pick(row, &["temperature_c", "temperature", "ta"]),
            humidity_pct: pick(row, &["humidity_pct", "humidity", "hm"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, RawValue)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_integral_number_as_text() {
        assert_eq!(RawValue::Number(7.0).as_text(), "7");
        assert_eq!(RawValue::Number(7.5).as_text(), "7.5");
        assert_eq!(RawValue::Text("  WF-1 ".to_string()).as_text(), "WF-1");
    }

    #[test]
    fn test_asos_aliases() {
        let r = row(&[
            ("tm", "2024-01-01 01:00".into()),
            ("ws", "3.4".into()),
            ("wd", "270".into()),
            ("stnid", "108".into()),
            ("lat", RawValue::Number(37.57)),
            ("lon", RawValue::Number(126.97)),
        ]);
        let rec = RawWeatherRecord::from_row(&r);
        assert_eq!(rec.intensity, Some(RawValue::Text("3.4".to_string())));
        assert_eq!(rec.station_id, Some(RawValue::Text("108".to_string())));
        assert_eq!(rec.latitude, Some(RawValue::Number(37.57)));
        assert!(rec.humidity_pct.is_none());
    }

    #[test]
    fn test_blank_alias_falls_through() {
        let r = row(&[("capacity_mw", "".into()), ("capacity", "12".into())]);
        let rec = RawFacilityRecord::from_row(&r);
        assert_eq!(rec.capacity_mw, Some(RawValue::Text("12".to_string())));
    }

    #[test]
    fn test_json_scalars_deserialize() {
        let parsed: RawRow =
            serde_json::from_str(r#"{"id": 3, "name": "A", "ok": true, "op": null}"#).unwrap();
        assert_eq!(parsed["id"], RawValue::Number(3.0));
        assert_eq!(parsed["ok"], RawValue::Bool(true));
        assert!(parsed["op"].is_blank());
    }
}
