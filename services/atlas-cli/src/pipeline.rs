//! One end-to-end run: load, rank and bind, compose, emit.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use analysis::{rank_facilities, ProximityAggregator};
use atlas_common::{AtlasResult, Facility, FacilityStatus};
use ingestion::{load_facilities, load_weather, read_facility_records, read_weather_records};
use renderer::{emit_document, write_artifact, LayerComposer};

use crate::config::AtlasConfig;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub facilities: usize,
    pub samples: usize,
    pub ranked: usize,
    /// Facilities with no weather sample in range.
    pub without_data: usize,
    pub layers: Vec<String>,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Run the pipeline and write the artifact to `output`.
///
/// Configuration is validated before any input is read. Any failure
/// aborts the run without touching `output`.
pub fn run(
    config: &AtlasConfig,
    facilities_path: &Path,
    weather_path: &Path,
    output: &Path,
) -> AtlasResult<PipelineSummary> {
    let start = Instant::now();

    config.validate()?;
    let n = config.ranking_size()?;
    let aggregator = ProximityAggregator::new(config.proximity_policy()?, config.reducer)?
        .with_weibull(config.fit_weibull);
    let region = config.region.to_bbox();

    let raw = read_facility_records(facilities_path)?;
    let facilities = load_facilities(&raw, &region)?;
    let raw = read_weather_records(weather_path)?;
    let samples = load_weather(&raw)?;
    info!(
        facilities = facilities.len(),
        samples = samples.len(),
        "Loaded datasets"
    );

    let rankable: Vec<Facility> = if config.rank_operating_only {
        facilities
            .iter()
            .filter(|f| f.status == FacilityStatus::Operating)
            .cloned()
            .collect()
    } else {
        facilities.clone()
    };
    debug!(
        rankable = rankable.len(),
        operating_only = config.rank_operating_only,
        "Selected facilities for ranking"
    );

    let (rankings, bindings) = rayon::join(
        || rank_facilities(&rankable, config.ranking_metric, n),
        || aggregator.bind(&facilities, &samples),
    );
    let rankings = rankings?;

    let map = LayerComposer::new(config.styles.clone(), config.heat.clone())
        .with_candidates(config.include_candidates)
        .compose(&rankings, &bindings, &facilities, config.reducer);
    let document = emit_document(&config.base_map(), &map)?;
    write_artifact(output, &document)?;

    let summary = PipelineSummary {
        facilities: facilities.len(),
        samples: samples.len(),
        ranked: rankable.len(),
        without_data: bindings.iter().filter(|b| b.aggregate.is_no_data()).count(),
        layers: map.layer_ids().into_iter().map(String::from).collect(),
        output: output.to_path_buf(),
        bytes: document.len(),
    };

    info!(
        output = %output.display(),
        bytes = summary.bytes,
        layers = ?summary.layers,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Wind atlas written"
    );

    Ok(summary)
}
