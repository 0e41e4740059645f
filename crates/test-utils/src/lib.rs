//! Shared test utilities for the wind atlas workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Facility and weather fixtures
//! - Deterministic data generators
//! - Temporary dataset files
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod datasets;
pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use datasets::*;
pub use fixtures::*;
pub use generators::*;
