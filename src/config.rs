use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub clustering: ClusteringSettings,
    #[serde(default)]
    pub proximity: ProximitySettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClusteringSettings {
    #[serde(default = "default_radius_px")]
    pub radius_px: f64,
    #[serde(default = "default_min_points")]
    pub min_points: usize,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            radius_px: default_radius_px(),
            min_points: default_min_points(),
            max_zoom: default_max_zoom(),
        }
    }
}

fn default_radius_px() -> f64 { 40.0 }
fn default_min_points() -> usize { 2 }
fn default_max_zoom() -> u8 { 16 }

#[derive(Debug, Clone, Deserialize)]
pub struct ProximitySettings {
    /// Search radius in the units of the configured metric (degrees for the
    /// default planar metric).
    #[serde(default = "default_proximity_radius")]
    pub radius: f64,
    #[serde(default = "default_proximity_max_results")]
    pub max_results: usize,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            radius: default_proximity_radius(),
            max_results: default_proximity_max_results(),
        }
    }
}

fn default_proximity_radius() -> f64 { 0.05 }
fn default_proximity_max_results() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_search_limit() -> usize { 20 }
fn default_max_limit() -> usize { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_query_bonus")]
    pub query_bonus: f64,
    #[serde(default = "default_per_filter")]
    pub per_filter: f64,
    #[serde(default = "default_price_range_bonus")]
    pub price_range_bonus: f64,
    #[serde(default = "default_proximity_bonus")]
    pub proximity_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            query_bonus: default_query_bonus(),
            per_filter: default_per_filter(),
            price_range_bonus: default_price_range_bonus(),
            proximity_bonus: default_proximity_bonus(),
        }
    }
}

fn default_query_bonus() -> f64 { 10.0 }
fn default_per_filter() -> f64 { 5.0 }
fn default_price_range_bonus() -> f64 { 15.0 }
fn default_proximity_bonus() -> f64 { 20.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl EngineSettings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with GIDA_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with GIDA_)
            // e.g., GIDA_CLUSTERING__RADIUS_PX -> clustering.radius_px
            .add_source(
                Environment::with_prefix("GIDA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GIDA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
