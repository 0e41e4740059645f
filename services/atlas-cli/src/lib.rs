//! Wind atlas batch pipeline.
//!
//! Loads facility and weather datasets, ranks facilities, binds nearby
//! weather to each facility and writes one interactive HTML map.

pub mod config;
pub mod pipeline;

pub use config::{AtlasConfig, ConfigOverrides, LogFormat};
pub use pipeline::{run, PipelineSummary};
