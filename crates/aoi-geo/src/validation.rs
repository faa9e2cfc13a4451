use aoi_core::error::{AoiError, Result};
use aoi_core::models::{Geometry, Position, Ring};

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.location), error.reason);
        }
    }

    /// Human-readable summary of every error
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.location, e.reason))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn is_valid_lon(lon: f64) -> bool {
    lon.is_finite() && (-180.0..=180.0).contains(&lon)
}

pub fn is_valid_lat(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

/// Validate a geometry against the AOI invariants
///
/// Polygons need at least one ring; every ring needs four or more positions
/// and must be closed; every coordinate must be finite and inside
/// [-180, 180] × [-90, 90].
pub fn validate_geometry(geometry: &Geometry) -> ValidationResult {
    match geometry {
        Geometry::Point { coordinates } => validate_position("Point", coordinates),
        Geometry::Polygon { coordinates } => validate_polygon(coordinates),
        Geometry::MultiPolygon { coordinates } => validate_multipolygon(coordinates),
    }
}

/// Validate and convert failures into [`AoiError::InvalidGeometry`]
pub fn ensure_valid(geometry: &Geometry) -> Result<()> {
    let result = validate_geometry(geometry);
    if result.is_valid {
        Ok(())
    } else {
        Err(AoiError::invalid_geometry(result.summary()))
    }
}

fn validate_position(location: &str, position: &Position) -> ValidationResult {
    let mut result = ValidationResult::valid();
    let [lon, lat] = *position;

    if !is_valid_lon(lon) || !is_valid_lat(lat) {
        result.add_error(
            location.to_string(),
            format!("coordinate ({}, {}) is outside [-180,180]x[-90,90]", lon, lat),
        );
    }

    result
}

fn validate_ring(location: &str, ring: &Ring) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if ring.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("ring must have at least 4 positions, found {}", ring.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                location.to_string(),
                "ring must be closed (first position == last position)".to_string(),
            );
        }
    }

    for (i, position) in ring.iter().enumerate() {
        result.absorb(location, validate_position(&format!("[{}]", i), position));
    }

    result
}

fn validate_polygon(rings: &[Ring]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if rings.is_empty() {
        result.add_error("Polygon".to_string(), "polygon has no rings".to_string());
        return result;
    }

    for (i, ring) in rings.iter().enumerate() {
        let location = if i == 0 { "exterior".to_string() } else { format!("interior[{}]", i - 1) };
        result.absorb("Polygon", validate_ring(&location, ring));
    }

    result
}

fn validate_multipolygon(polygons: &[Vec<Ring>]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if polygons.is_empty() {
        result.add_error("MultiPolygon".to_string(), "multipolygon has no polygons".to_string());
        return result;
    }

    for (i, polygon) in polygons.iter().enumerate() {
        result.absorb(&format!("MultiPolygon[{}]", i), validate_polygon(polygon));
    }

    result
}
