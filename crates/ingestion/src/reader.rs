//! Dataset file readers.
//!
//! The format is chosen by file extension. CSV is read cell-by-cell as text
//! so identifiers like "007" survive untouched; JSON and YAML keep their own
//! scalar types. Column names are lowercased and a leading UTF-8 BOM (as
//! written by spreadsheet exports) is stripped.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{IngestionError, Result};
use crate::raw::{RawFacilityRecord, RawRow, RawValue, RawWeatherRecord};

/// Supported dataset encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
    Yaml,
}

impl DataFormat {
    /// Detect format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn normalize_row(row: RawRow) -> RawRow {
    row.into_iter().map(|(k, v)| (normalize_key(&k), v)).collect()
}

/// Parse CSV text with a header row into rows.
pub fn parse_csv(content: &str, path: &str) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestionError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?
        .iter()
        .map(normalize_key)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestionError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.clone(), RawValue::Text(cell.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Parse a JSON array of objects into rows.
pub fn parse_json(content: &str, path: &str) -> Result<Vec<RawRow>> {
    let rows: Vec<RawRow> = serde_json::from_str(content).map_err(|e| IngestionError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    Ok(rows.into_iter().map(normalize_row).collect())
}

/// Parse a YAML sequence of mappings into rows.
pub fn parse_yaml(content: &str, path: &str) -> Result<Vec<RawRow>> {
    let rows: Vec<RawRow> = serde_yaml::from_str(content).map_err(|e| IngestionError::Parse {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    Ok(rows.into_iter().map(normalize_row).collect())
}

/// Read every row of a dataset file.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let format = DataFormat::from_path(path)
        .ok_or_else(|| IngestionError::UnsupportedFormat(shown.clone()))?;

    let content = fs::read_to_string(path).map_err(|e| IngestionError::FileRead {
        path: shown.clone(),
        message: e.to_string(),
    })?;

    let rows = match format {
        DataFormat::Csv => parse_csv(&content, &shown)?,
        DataFormat::Json => parse_json(&content, &shown)?,
        DataFormat::Yaml => parse_yaml(&content, &shown)?,
    };

    debug!(path = %shown, ?format, rows = rows.len(), "Parsed dataset");
    Ok(rows)
}

/// Read a facility dataset into raw records.
pub fn read_facility_records(path: impl AsRef<Path>) -> Result<Vec<RawFacilityRecord>> {
    let path = path.as_ref();
    let records: Vec<RawFacilityRecord> = read_rows(path)?
        .iter()
        .map(RawFacilityRecord::from_row)
        .collect();
    info!(path = %path.display(), records = records.len(), "Read facility dataset");
    Ok(records)
}

/// Read a weather dataset into raw records.
pub fn read_weather_records(path: impl AsRef<Path>) -> Result<Vec<RawWeatherRecord>> {
    let path = path.as_ref();
    let records: Vec<RawWeatherRecord> = read_rows(path)?
        .iter()
        .map(RawWeatherRecord::from_row)
        .collect();
    info!(path = %path.display(), records = records.len(), "Read weather dataset");
    Ok(records)
}
