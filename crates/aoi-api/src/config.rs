use std::env;
use std::path::PathBuf;

use aoi_core::config::{EngineConfig, LayeredConfig};
use aoi_core::error::{AoiError, Result};

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Optional TOML file layered under the `AOI_*` engine variables
    pub engine_config_path: Option<PathBuf>,
    /// Optional JSON array of AOI rows loaded into the in-memory store
    pub seed_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            engine_config_path: None,
            seed_path: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("AOI_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(defaults.port);

        let cors_origin = env::var("AOI_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        Self {
            port,
            cors_origin,
            engine_config_path: env::var("AOI_CONFIG_PATH").ok().map(PathBuf::from),
            seed_path: env::var("AOI_SEED_PATH").ok().map(PathBuf::from),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Resolve the engine configuration: defaults, then the optional file,
    /// then environment variables
    pub fn load_engine_config(&self) -> Result<EngineConfig> {
        let mut layered = LayeredConfig::with_defaults();

        if let Some(path) = &self.engine_config_path {
            if !path.exists() {
                return Err(AoiError::ConfigFileNotFound { path: path.clone() });
            }
            layered = layered.load_from_file(path)?;
        }

        let layered = layered.load_from_env();
        for (key, (value, source)) in layered.to_inspection_map() {
            tracing::debug!(key = %key, value = %value, source = ?source, "Engine setting");
        }

        layered.resolve()
    }
}
