//! AOI Core - Domain models, errors, and configuration
//!
//! This crate contains the domain types shared by the AOI spatial query engine:
//! area of interest records, the GeoJSON geometry model, principals and their
//! access scope, and the layered engine configuration.

pub mod config;
pub mod error;
pub mod models;

pub use config::{EngineConfig, LayeredConfig};
pub use error::{AoiError, Result};
