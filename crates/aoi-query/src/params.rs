//! Conversion of raw request values into validated query inputs.
//!
//! Query-string values arrive as optional strings so that a missing or
//! malformed value is reported as [`AoiError::InvalidParameters`] naming the
//! parameter, instead of as a generic deserialization failure.

use aoi_core::config::EngineConfig;
use aoi_core::error::{AoiError, Result};
use aoi_core::models::{AoiStatus, Geometry};
use serde_json::Value;

use crate::models::QueryOptions;

/// Parse a required numeric parameter
pub fn parse_number(name: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw.ok_or_else(|| {
        AoiError::invalid_parameters(format!("missing required parameter '{}'", name))
    })?;

    raw.trim().parse::<f64>().map_err(|_| {
        AoiError::invalid_parameters(format!("parameter '{}' must be a number, got '{}'", name, raw))
    })
}

/// Parse the optional nearest `limit`; range checks happen in the query constructor
pub fn parse_limit(raw: Option<&str>) -> Result<Option<usize>> {
    raw.map(|raw| {
        raw.trim().parse::<usize>().map_err(|_| {
            AoiError::invalid_parameters(format!(
                "parameter 'limit' must be a positive integer, got '{}'",
                raw
            ))
        })
    })
    .transpose()
}

/// Extract the geometry from an intersects/within request body
///
/// The body must be an object with a `geometry` member holding a GeoJSON
/// geometry.
pub fn parse_geometry_body(body: &Value) -> Result<Geometry> {
    let geometry = body
        .get("geometry")
        .ok_or_else(|| AoiError::invalid_geometry("request body must contain a 'geometry' member"))?;
    Geometry::from_geojson(geometry)
}

/// Status filter from the optional `status` parameter
///
/// Accepts a comma-separated list of statuses or `all`. Without the
/// parameter the configured default applies.
pub fn parse_status(raw: Option<&str>, config: &EngineConfig) -> Result<QueryOptions> {
    let Some(raw) = raw else {
        return Ok(QueryOptions::from_config(config));
    };

    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(QueryOptions::all_statuses());
    }

    let mut statuses = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let status: AoiStatus = part.parse()?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }

    if statuses.is_empty() {
        return Err(AoiError::invalid_parameters("parameter 'status' must not be empty"));
    }

    Ok(QueryOptions::with_statuses(statuses))
}
