//! Pipeline configuration.
//!
//! Loaded from YAML with `${VAR}` / `${VAR:-default}` substitution, then
//! layered with command-line and environment overrides. Everything is
//! validated before any dataset is opened.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use analysis::{ProximityPolicy, RankingMetric, Reducer};
use atlas_common::{
    AtlasError, AtlasResult, BoundingBox, HeatStyle, InvalidParameterError, TierStyles,
};
use renderer::BaseMapConfig;

// ============================================================================
// Configuration types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Size of the top-N and bottom-N sets.
    #[serde(default = "default_ranking_n")]
    pub ranking_n: i64,

    #[serde(default)]
    pub ranking_metric: RankingMetric,

    /// Exactly one of `radius_km` / `nearest_k` must be set.
    #[serde(default)]
    pub proximity: ProximityConfig,

    #[serde(default)]
    pub reducer: Reducer,

    #[serde(default = "default_true")]
    pub fit_weibull: bool,

    /// Facilities outside this box are rejected at load time.
    #[serde(default)]
    pub region: RegionConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub include_candidates: bool,

    /// Rank only facilities with status `operating`.
    #[serde(default = "default_true")]
    pub rank_operating_only: bool,

    #[serde(default)]
    pub styles: TierStyles,

    #[serde(default)]
    pub heat: HeatStyle,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProximityConfig {
    pub radius_km: Option<f64>,
    pub nearest_k: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial view center as [lat, lon]; defaults to the region center.
    #[serde(default)]
    pub center: Option<[f64; 2]>,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    #[serde(default = "default_attribution")]
    pub attribution: String,

    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values that take precedence over the configuration file.
///
/// Filled from command-line flags or their `WINDATLAS_*` environment
/// variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ranking_n: Option<i64>,
    pub ranking_metric: Option<String>,
    pub reducer: Option<String>,
    pub radius_km: Option<f64>,
    pub nearest_k: Option<i64>,
    pub include_candidates: Option<bool>,
    /// "minlon,minlat,maxlon,maxlat"
    pub region: Option<String>,
    pub log_level: Option<String>,
}

fn default_ranking_n() -> i64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_zoom() -> u8 {
    7
}

fn default_tile_url() -> String {
    "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_attribution() -> String {
    "&copy; OpenStreetMap contributors".to_string()
}

fn default_title() -> String {
    "Wind Atlas".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::from_bbox(&BoundingBox::WORLD)
    }
}

impl RegionConfig {
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self {
            min_lon: bbox.min_x,
            min_lat: bbox.min_y,
            max_lon: bbox.max_x,
            max_lat: bbox.max_y,
        }
    }

    pub fn to_bbox(&self) -> BoundingBox {
        BoundingBox::new(self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: None,
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            title: default_title(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            ranking_n: default_ranking_n(),
            ranking_metric: RankingMetric::default(),
            proximity: ProximityConfig::default(),
            reducer: Reducer::default(),
            fit_weibull: true,
            region: RegionConfig::default(),
            map: MapConfig::default(),
            include_candidates: false,
            rank_operating_only: true,
            styles: TierStyles::default(),
            heat: HeatStyle::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AtlasConfig {
    /// Read a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AtlasError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> AtlasResult<Self> {
        let expanded = expand_env_vars(content)?;
        serde_yaml::from_str(&expanded)
            .map_err(|e| AtlasError::Config(format!("invalid configuration YAML: {}", e)))
    }

    /// Apply overrides on top of the loaded values.
    ///
    /// Choosing one proximity policy clears the other, so a flag can switch
    /// a radius configuration to nearest-K. Passing both is still rejected
    /// by [`AtlasConfig::validate`].
    pub fn apply_overrides(&mut self, o: &ConfigOverrides) -> Result<(), InvalidParameterError> {
        if let Some(n) = o.ranking_n {
            self.ranking_n = n;
        }
        if let Some(metric) = &o.ranking_metric {
            self.ranking_metric = RankingMetric::from_str(metric).ok_or_else(|| {
                InvalidParameterError::new("ranking_metric", format!("unknown metric '{}'", metric))
            })?;
        }
        if let Some(reducer) = &o.reducer {
            self.reducer = Reducer::from_str(reducer).ok_or_else(|| {
                InvalidParameterError::new("reducer", format!("unknown reducer '{}'", reducer))
            })?;
        }
        if o.radius_km.is_some() || o.nearest_k.is_some() {
            self.proximity = ProximityConfig {
                radius_km: o.radius_km,
                nearest_k: o.nearest_k,
            };
        }
        if let Some(include) = o.include_candidates {
            self.include_candidates = include;
        }
        if let Some(region) = &o.region {
            let bbox = BoundingBox::parse(region)
                .map_err(|e| InvalidParameterError::new("region", e.to_string()))?;
            self.region = RegionConfig::from_bbox(&bbox);
        }
        if let Some(level) = &o.log_level {
            self.logging.level = level.clone();
        }
        Ok(())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check every parameter. Runs before any input is read.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        self.ranking_size()?;
        self.proximity_policy()?;

        let region = self.region.to_bbox();
        region
            .validate()
            .map_err(|e| InvalidParameterError::new("region", e.to_string()))?;

        let (lat, lon) = self.map_center();
        if !region.contains_point(lon, lat) {
            return Err(InvalidParameterError::new(
                "map.center",
                format!("[{}, {}] lies outside the region {}", lat, lon, region),
            ));
        }

        self.base_map()
            .validate()
            .map_err(|e| InvalidParameterError::new("map", e.to_string()))?;

        self.styles
            .validate()
            .map_err(|e| InvalidParameterError::new("styles", e))?;
        self.heat
            .validate()
            .map_err(|e| InvalidParameterError::new("heat", e))?;

        parse_level(&self.logging.level).ok_or_else(|| {
            InvalidParameterError::new(
                "logging.level",
                format!("unknown level '{}'", self.logging.level),
            )
        })?;

        Ok(())
    }

    /// `ranking_n` as a count.
    pub fn ranking_size(&self) -> Result<usize, InvalidParameterError> {
        if self.ranking_n <= 0 {
            return Err(InvalidParameterError::new(
                "ranking_n",
                format!("must be > 0, got {}", self.ranking_n),
            ));
        }
        Ok(self.ranking_n as usize)
    }

    /// The configured proximity policy. There is no default: exactly one of
    /// `radius_km` and `nearest_k` must be given.
    pub fn proximity_policy(&self) -> Result<ProximityPolicy, InvalidParameterError> {
        let policy = match (self.proximity.radius_km, self.proximity.nearest_k) {
            (Some(radius_km), None) => ProximityPolicy::Radius { radius_km },
            (None, Some(k)) if k <= 0 => {
                return Err(InvalidParameterError::new(
                    "proximity.nearest_k",
                    format!("must be > 0, got {}", k),
                ))
            }
            (None, Some(k)) => ProximityPolicy::Nearest { k: k as usize },
            (Some(_), Some(_)) => {
                return Err(InvalidParameterError::new(
                    "proximity",
                    "set only one of radius_km and nearest_k",
                ))
            }
            (None, None) => {
                return Err(InvalidParameterError::new(
                    "proximity",
                    "one of radius_km or nearest_k is required",
                ))
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Initial map center as (lat, lon).
    pub fn map_center(&self) -> (f64, f64) {
        match self.map.center {
            Some([lat, lon]) => (lat, lon),
            None => self.region.to_bbox().center(),
        }
    }

    pub fn base_map(&self) -> BaseMapConfig {
        BaseMapConfig {
            title: self.map.title.clone(),
            center: self.map_center(),
            zoom: self.map.zoom,
            tile_url: self.map.tile_url.clone(),
            attribution: self.map.attribution.clone(),
            valid_bounds: self.region.to_bbox(),
        }
    }
}

/// Map a level name to a tracing level.
pub fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Some(tracing::Level::TRACE),
        "debug" => Some(tracing::Level::DEBUG),
        "info" => Some(tracing::Level::INFO),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "error" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

// ============================================================================
// Environment substitution
// ============================================================================

/// Replace `${VAR}` and `${VAR:-default}` with environment values.
fn expand_env_vars(content: &str) -> AtlasResult<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => var_expr.push(c),
                    None => {
                        return Err(AtlasError::Config(format!(
                            "unclosed variable substitution: ${{{}",
                            var_expr
                        )))
                    }
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> AtlasResult<String> {
    if let Some((name, default)) = expr.split_once(":-") {
        match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim())
            .map_err(|_| AtlasError::Config(format!("environment variable {} not set", expr)))
    }
}
