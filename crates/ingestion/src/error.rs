//! Error types for the ingestion crate.

use atlas_common::{AtlasError, ValidationError};
use thiserror::Error;

/// Errors that can occur while reading or validating datasets.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read {path}: {message}")]
    FileRead { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<IngestionError> for AtlasError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::Validation(e) => AtlasError::Validation(e),
            IngestionError::FileRead { path, message } | IngestionError::Parse { path, message } => {
                AtlasError::Read { path, message }
            }
            IngestionError::UnsupportedFormat(path) => AtlasError::Read {
                path,
                message: "unsupported format (expected .csv, .json, .yaml or .yml)".to_string(),
            },
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
