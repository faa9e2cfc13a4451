//! Error types for the AOI engine

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AoiError {
    // Request errors
    #[error("Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Stored record errors. Query paths log and skip these instead of returning them.
    #[error("Stored geometry of AOI {aoi_id} is unparsable: {reason}")]
    RecordGeometryUnparsable { aoi_id: String, reason: String },

    // Lookup errors
    #[error("Area of interest not found: {id}")]
    NotFound { id: String },

    // Lifecycle errors
    #[error("Area of interest {id} is referenced by {count} campaign(s) and cannot be deleted")]
    ReferencedByCampaigns { id: String, count: u32 },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AoiError {
    pub fn invalid_parameters(reason: impl Into<String>) -> Self {
        AoiError::InvalidParameters { reason: reason.into() }
    }

    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        AoiError::InvalidGeometry { reason: reason.into() }
    }

    pub fn not_found(id: impl ToString) -> Self {
        AoiError::NotFound { id: id.to_string() }
    }
}

impl From<serde_json::Error> for AoiError {
    fn from(err: serde_json::Error) -> Self {
        AoiError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AoiError>;
