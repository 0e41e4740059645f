//! Error types for the wind atlas pipeline.
//!
//! Every failure is fatal for the run: nothing is retried, since the inputs
//! are a static snapshot and a retry would reproduce the same error.

use std::fmt;
use thiserror::Error;

/// Result type alias using AtlasError.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Which input dataset a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Facilities,
    Weather,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Facilities => write!(f, "facility"),
            Dataset::Weather => write!(f, "weather"),
        }
    }
}

/// Identifies a single raw input record.
///
/// `position` is 1-based so it lines up with what a person sees when they
/// open the dataset (ignoring any header row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    pub dataset: Dataset,
    pub position: usize,
    pub id: Option<String>,
}

impl RecordRef {
    pub fn new(dataset: Dataset, position: usize, id: Option<String>) -> Self {
        Self {
            dataset,
            position,
            id,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} record #{} (id '{}')", self.dataset, self.position, id),
            None => write!(f, "{} record #{}", self.dataset, self.position),
        }
    }
}

/// Malformed, out-of-range or duplicate input records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{record}: missing required field '{field}'")]
    MissingField { record: RecordRef, field: &'static str },

    #[error("{record}: field '{field}' is not a number: '{value}'")]
    NotANumber {
        record: RecordRef,
        field: &'static str,
        value: String,
    },

    #[error("{record}: field '{field}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        record: RecordRef,
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{record}: field '{field}' must be {constraint}, got {value}")]
    Constraint {
        record: RecordRef,
        field: &'static str,
        constraint: &'static str,
        value: f64,
    },

    #[error("{record}: field '{field}' has unrecognized value '{value}'")]
    InvalidValue {
        record: RecordRef,
        field: &'static str,
        value: String,
    },

    #[error("{record}: duplicate facility id (first seen at record #{first_position})")]
    DuplicateId {
        record: RecordRef,
        first_position: usize,
    },
}

impl ValidationError {
    /// The record that triggered this error.
    pub fn record(&self) -> &RecordRef {
        match self {
            ValidationError::MissingField { record, .. }
            | ValidationError::NotANumber { record, .. }
            | ValidationError::OutOfRange { record, .. }
            | ValidationError::Constraint { record, .. }
            | ValidationError::InvalidValue { record, .. }
            | ValidationError::DuplicateId { record, .. } => record,
        }
    }

    /// The field whose constraint failed. Duplicates always point at `id`.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Constraint { field, .. }
            | ValidationError::InvalidValue { field, .. } => field,
            ValidationError::DuplicateId { .. } => "id",
        }
    }
}

/// A configuration value that cannot be used, e.g. N <= 0.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid parameter value for '{param}': {message}")]
pub struct InvalidParameterError {
    pub param: String,
    pub message: String,
}

impl InvalidParameterError {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Failures while building the map artifact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmissionError {
    #[error("no layers to emit")]
    EmptyLayers,

    #[error("unexpected layer set: expected {expected:?}, got {actual:?}")]
    UnexpectedLayers {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("layer '{layer}' element '{element}' at ({lat}, {lon}) is outside the valid coordinate range")]
    OutOfBounds {
        layer: String,
        element: String,
        lat: f64,
        lon: f64,
    },

    #[error("invalid base map: {0}")]
    InvalidBaseMap(String),

    #[error("failed to serialize map data: {0}")]
    Serialization(String),

    #[error("failed to write artifact: {0}")]
    Write(String),
}

impl From<serde_json::Error> for EmissionError {
    fn from(err: serde_json::Error) -> Self {
        EmissionError::Serialization(err.to_string())
    }
}

/// Umbrella error for a whole pipeline run.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameterError),

    #[error(transparent)]
    Emission(#[from] EmissionError),

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl AtlasError {
    /// Short category name used in logs and exit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AtlasError::Validation(_) => "ValidationError",
            AtlasError::InvalidParameter(_) => "InvalidParameterError",
            AtlasError::Emission(_) => "EmissionError",
            AtlasError::Read { .. } => "ReadError",
            AtlasError::Config(_) => "ConfigError",
        }
    }
}
