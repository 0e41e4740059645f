//! Wind atlas command-line driver.
//!
//! Reads a facility dataset and a weather dataset, and writes a single
//! self-contained HTML map ranking the facilities and showing nearby wind
//! intensity.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use atlas_cli::config::parse_level;
use atlas_cli::{AtlasConfig, ConfigOverrides, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "windatlas")]
#[command(about = "Build an interactive wind facility map from tabular datasets")]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, env = "WINDATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Facility dataset (.csv, .json, .yaml)
    #[arg(short, long)]
    facilities: PathBuf,

    /// Weather dataset (.csv, .json, .yaml)
    #[arg(short, long)]
    weather: PathBuf,

    /// Output HTML file
    #[arg(short, long, default_value = "wind_atlas.html")]
    output: PathBuf,

    /// Size of the top-N and bottom-N sets
    #[arg(long = "top-n", env = "WINDATLAS_RANKING_N", allow_negative_numbers = true)]
    ranking_n: Option<i64>,

    /// Ranking metric: annual_generation, installed_capacity, capacity_factor
    #[arg(long, env = "WINDATLAS_RANKING_METRIC")]
    metric: Option<String>,

    /// Intensity reducer: mean, median, min, max, power_density
    #[arg(long, env = "WINDATLAS_REDUCER")]
    reducer: Option<String>,

    /// Bind every sample within this many kilometers
    #[arg(long, env = "WINDATLAS_RADIUS_KM", allow_negative_numbers = true)]
    radius_km: Option<f64>,

    /// Bind the K nearest samples
    #[arg(long, env = "WINDATLAS_NEAREST_K", allow_negative_numbers = true)]
    nearest_k: Option<i64>,

    /// Add the candidate sites layer
    #[arg(long, env = "WINDATLAS_INCLUDE_CANDIDATES")]
    include_candidates: Option<bool>,

    /// Valid region as "minlon,minlat,maxlon,maxlat"
    #[arg(long, env = "WINDATLAS_REGION", allow_hyphen_values = true)]
    region: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WINDATLAS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            ranking_n: self.ranking_n,
            ranking_metric: self.metric.clone(),
            reducer: self.reducer.clone(),
            radius_km: self.radius_km,
            nearest_k: self.nearest_k,
            include_candidates: self.include_candidates,
            region: self.region.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn init_tracing(config: &AtlasConfig, json: bool) -> Result<()> {
    let level = parse_level(&config.logging.level).unwrap_or(tracing::Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json || config.logging.format == LogFormat::Json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AtlasConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AtlasConfig::default(),
    };
    config
        .apply_overrides(&args.overrides())
        .context("Invalid command-line override")?;

    init_tracing(&config, args.json_logs)?;
    info!(
        facilities = %args.facilities.display(),
        weather = %args.weather.display(),
        output = %args.output.display(),
        "Starting wind atlas build"
    );

    match atlas_cli::run(&config, &args.facilities, &args.weather, &args.output) {
        Ok(summary) => {
            info!(
                facilities = summary.facilities,
                samples = summary.samples,
                without_data = summary.without_data,
                "Done"
            );
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Wind atlas build failed");
            Err(anyhow::Error::new(e).context(format!("{} not written", args.output.display())))
        }
    }
}
