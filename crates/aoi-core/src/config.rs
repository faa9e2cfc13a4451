use crate::error::{AoiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Upper bound on the nearest-neighbour limit, whatever the configuration says
pub const NEAREST_LIMIT_HARD_CAP: usize = 25;

/// Tunables of the spatial query engine
///
/// Every default the engine applies lives here rather than in the query code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Result count of a nearest query that does not pass `limit`
    pub nearest_default_limit: usize,
    /// Largest accepted `limit` for nearest queries
    pub nearest_max_limit: usize,
    /// Candidates kept per requested result by the planar nearest pre-filter
    pub nearest_prefilter_factor: usize,
    /// Degrees added on every side of the query bbox in the intersects pre-filter
    pub intersects_margin_deg: f64,
    /// Whether inactive and archived AOIs are returned when the caller does not choose
    pub include_inactive_by_default: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nearest_default_limit: 5,
            nearest_max_limit: NEAREST_LIMIT_HARD_CAP,
            nearest_prefilter_factor: 4,
            intersects_margin_deg: 1.0,
            include_inactive_by_default: false,
        }
    }
}

impl EngineConfig {
    /// Check internal consistency of the values
    pub fn validate(&self) -> Result<()> {
        if self.nearest_max_limit == 0 || self.nearest_max_limit > NEAREST_LIMIT_HARD_CAP {
            return Err(AoiError::ConfigInvalid {
                key: "nearest_max_limit".to_string(),
                reason: format!("must be between 1 and {}", NEAREST_LIMIT_HARD_CAP),
            });
        }

        if self.nearest_default_limit == 0 || self.nearest_default_limit > self.nearest_max_limit {
            return Err(AoiError::ConfigInvalid {
                key: "nearest_default_limit".to_string(),
                reason: format!("must be between 1 and {}", self.nearest_max_limit),
            });
        }

        if self.nearest_prefilter_factor == 0 {
            return Err(AoiError::ConfigInvalid {
                key: "nearest_prefilter_factor".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.intersects_margin_deg.is_finite() || self.intersects_margin_deg < 0.0 {
            return Err(AoiError::ConfigInvalid {
                key: "intersects_margin_deg".to_string(),
                reason: "must be a finite, non-negative number of degrees".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Set programmatically by the embedding application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the spatial query engine
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub nearest_default_limit: ConfigValue<usize>,
    pub nearest_max_limit: ConfigValue<usize>,
    pub nearest_prefilter_factor: ConfigValue<usize>,
    pub intersects_margin_deg: ConfigValue<f64>,
    pub include_inactive_by_default: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let defaults = EngineConfig::default();
        Self {
            nearest_default_limit: ConfigValue::new(
                defaults.nearest_default_limit,
                ConfigSource::Default,
            ),
            nearest_max_limit: ConfigValue::new(defaults.nearest_max_limit, ConfigSource::Default),
            nearest_prefilter_factor: ConfigValue::new(
                defaults.nearest_prefilter_factor,
                ConfigSource::Default,
            ),
            intersects_margin_deg: ConfigValue::new(
                defaults.intersects_margin_deg,
                ConfigSource::Default,
            ),
            include_inactive_by_default: ConfigValue::new(
                defaults.include_inactive_by_default,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| AoiError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| AoiError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(limit) = file_config.nearest_default_limit {
            self.nearest_default_limit.update(limit, ConfigSource::File);
        }

        if let Some(limit) = file_config.nearest_max_limit {
            self.nearest_max_limit.update(limit, ConfigSource::File);
        }

        if let Some(factor) = file_config.nearest_prefilter_factor {
            self.nearest_prefilter_factor.update(factor, ConfigSource::File);
        }

        if let Some(margin) = file_config.intersects_margin_deg {
            self.intersects_margin_deg.update(margin, ConfigSource::File);
        }

        if let Some(include) = file_config.include_inactive_by_default {
            self.include_inactive_by_default.update(include, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // AOI_NEAREST_DEFAULT_LIMIT
        if let Some(limit) = env_parse::<usize>("AOI_NEAREST_DEFAULT_LIMIT", "positive integer") {
            self.nearest_default_limit.update(limit, ConfigSource::Environment);
        }

        // AOI_NEAREST_MAX_LIMIT
        if let Some(limit) = env_parse::<usize>("AOI_NEAREST_MAX_LIMIT", "positive integer") {
            self.nearest_max_limit.update(limit, ConfigSource::Environment);
        }

        // AOI_NEAREST_PREFILTER_FACTOR
        if let Some(factor) = env_parse::<usize>("AOI_NEAREST_PREFILTER_FACTOR", "positive integer")
        {
            self.nearest_prefilter_factor.update(factor, ConfigSource::Environment);
        }

        // AOI_INTERSECTS_MARGIN_DEG
        if let Some(margin) = env_parse::<f64>("AOI_INTERSECTS_MARGIN_DEG", "number of degrees") {
            self.intersects_margin_deg.update(margin, ConfigSource::Environment);
        }

        // AOI_INCLUDE_INACTIVE
        if let Ok(raw) = env::var("AOI_INCLUDE_INACTIVE") {
            match parse_bool(&raw) {
                Ok(include) => {
                    self.include_inactive_by_default.update(include, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid AOI_INCLUDE_INACTIVE value '{}': expected true or false",
                    raw
                ),
            }
        }

        self
    }

    /// Apply programmatic overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(limit) = overrides.nearest_default_limit {
            self.nearest_default_limit.update(limit, ConfigSource::Override);
        }

        if let Some(limit) = overrides.nearest_max_limit {
            self.nearest_max_limit.update(limit, ConfigSource::Override);
        }

        if let Some(factor) = overrides.nearest_prefilter_factor {
            self.nearest_prefilter_factor.update(factor, ConfigSource::Override);
        }

        if let Some(margin) = overrides.intersects_margin_deg {
            self.intersects_margin_deg.update(margin, ConfigSource::Override);
        }

        if let Some(include) = overrides.include_inactive_by_default {
            self.include_inactive_by_default.update(include, ConfigSource::Override);
        }
    }

    /// Resolve the layered values into a validated engine configuration
    pub fn resolve(&self) -> Result<EngineConfig> {
        let config = EngineConfig {
            nearest_default_limit: self.nearest_default_limit.value,
            nearest_max_limit: self.nearest_max_limit.value,
            nearest_prefilter_factor: self.nearest_prefilter_factor.value,
            intersects_margin_deg: self.intersects_margin_deg.value,
            include_inactive_by_default: self.include_inactive_by_default.value,
        };
        config.validate()?;
        Ok(config)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "nearest_default_limit".to_string(),
            (self.nearest_default_limit.value.to_string(), self.nearest_default_limit.source),
        );

        map.insert(
            "nearest_max_limit".to_string(),
            (self.nearest_max_limit.value.to_string(), self.nearest_max_limit.source),
        );

        map.insert(
            "nearest_prefilter_factor".to_string(),
            (self.nearest_prefilter_factor.value.to_string(), self.nearest_prefilter_factor.source),
        );

        map.insert(
            "intersects_margin_deg".to_string(),
            (self.intersects_margin_deg.value.to_string(), self.intersects_margin_deg.source),
        );

        map.insert(
            "include_inactive_by_default".to_string(),
            (
                self.include_inactive_by_default.value.to_string(),
                self.include_inactive_by_default.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    nearest_default_limit: Option<usize>,
    nearest_max_limit: Option<usize>,
    nearest_prefilter_factor: Option<usize>,
    intersects_margin_deg: Option<f64>,
    include_inactive_by_default: Option<bool>,
}

/// Programmatic configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub nearest_default_limit: Option<usize>,
    pub nearest_max_limit: Option<usize>,
    pub nearest_prefilter_factor: Option<usize>,
    pub intersects_margin_deg: Option<f64>,
    pub include_inactive_by_default: Option<bool>,
}

fn env_parse<T: std::str::FromStr>(key: &str, expected: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected {}", key, raw, expected);
            None
        }
    }
}

/// Parse a boolean flag from string
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AoiError::ConfigInvalid {
            key: "bool".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}
