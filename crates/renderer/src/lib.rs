//! Map rendering for the wind atlas.
//!
//! Two stages:
//! - [`composer`] turns rankings and proximity bindings into declarative layers
//! - [`artifact`] serializes those layers into one self-contained HTML page

pub mod artifact;
pub mod composer;

pub use artifact::{emit_document, write_artifact, BaseMapConfig, KNOWN_OVERLAYS};
pub use composer::{ComposedMap, LayerComposer};
