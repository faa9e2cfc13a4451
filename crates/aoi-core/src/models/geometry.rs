//! Canonical geometry types used across all aoi crates.
//!
//! AOI geometry arrives as loosely typed GeoJSON. It is narrowed here, at the
//! parse boundary, into a closed set of shapes so that the geometric
//! algorithms never see an ambiguous payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{AoiError, Result};

/// A `[longitude, latitude]` pair in degrees
pub type Position = [f64; 2];

/// An ordered list of positions. The first and last position may or may not repeat.
pub type Ring = Vec<Position>;

/// EPSG code of the conventional AOI coordinate system
pub const WGS84_EPSG: u32 = 4326;

/// Geometry type tag stored alongside every AOI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GeometryType {
    Point,
    #[default]
    Polygon,
    MultiPolygon,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryType {
    type Err = AoiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Point" => Ok(GeometryType::Point),
            "Polygon" => Ok(GeometryType::Polygon),
            "MultiPolygon" => Ok(GeometryType::MultiPolygon),
            other => Err(AoiError::invalid_geometry(format!(
                "unsupported geometry type '{}': expected Point, Polygon or MultiPolygon",
                other
            ))),
        }
    }
}

/// GeoJSON-compatible geometry representation
///
/// Serializes to the same `{"type": ..., "coordinates": ...}` shape it was
/// parsed from. Deserialization always goes through [`Geometry::from_geojson`],
/// so a `Geometry` obtained from serde has a valid type tag and nesting depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point { coordinates: [lon, lat] }
    }

    /// Create a Polygon geometry. The first ring is the outer ring.
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon geometry
    pub fn multi_polygon(polygons: Vec<Vec<Ring>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Outer rings of every polygon. Holes are not yielded; a Point has no rings.
    pub fn outer_rings(&self) -> Vec<&[Position]> {
        match self {
            Geometry::Point { .. } => Vec::new(),
            Geometry::Polygon { coordinates } => {
                coordinates.first().map(|ring| ring.as_slice()).into_iter().collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|polygon| polygon.first())
                .map(|ring| ring.as_slice())
                .collect(),
        }
    }

    /// Parse a GeoJSON geometry object
    ///
    /// Fails with [`AoiError::InvalidGeometry`] when `type` is missing or not one
    /// of Point/Polygon/MultiPolygon, when `coordinates` is missing, or when the
    /// coordinate nesting depth does not match the declared type.
    pub fn from_geojson(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AoiError::invalid_geometry("geometry must be a JSON object"))?;

        let type_name = match object.get("type") {
            Some(Value::String(name)) => name.as_str(),
            Some(_) => return Err(AoiError::invalid_geometry("'type' must be a string")),
            None => return Err(AoiError::invalid_geometry("missing 'type' field")),
        };
        let geometry_type: GeometryType = type_name.parse()?;

        let coordinates = object
            .get("coordinates")
            .ok_or_else(|| AoiError::invalid_geometry("missing 'coordinates' field"))?;

        match geometry_type {
            GeometryType::Point => serde_json::from_value::<Position>(coordinates.clone())
                .map(|coordinates| Geometry::Point { coordinates })
                .map_err(|_| depth_error(geometry_type, "[lon, lat]")),
            GeometryType::Polygon => serde_json::from_value::<Vec<Ring>>(coordinates.clone())
                .map(|coordinates| Geometry::Polygon { coordinates })
                .map_err(|_| depth_error(geometry_type, "[ring][point][lon, lat]")),
            GeometryType::MultiPolygon => {
                serde_json::from_value::<Vec<Vec<Ring>>>(coordinates.clone())
                    .map(|coordinates| Geometry::MultiPolygon { coordinates })
                    .map_err(|_| depth_error(geometry_type, "[polygon][ring][point][lon, lat]"))
            }
        }
    }

    /// Parse a geometry from its stored JSON text
    pub fn parse_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| AoiError::invalid_geometry(format!("geometry is not valid JSON: {}", e)))?;
        Self::from_geojson(&value)
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Render as compact JSON text, the stored representation
    pub fn to_json_string(&self) -> String {
        self.to_geojson().to_string()
    }
}

fn depth_error(geometry_type: GeometryType, expected: &str) -> AoiError {
    AoiError::invalid_geometry(format!(
        "coordinates do not match {}: expected {}",
        geometry_type, expected
    ))
}

impl<'de> Deserialize<'de> for Geometry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Geometry::from_geojson(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rectangle() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0], [0.0, 0.0]]]
        })
    }

    #[test]
    fn test_parse_polygon() {
        let geometry = Geometry::from_geojson(&rectangle()).unwrap();
        assert_eq!(geometry.geometry_type(), GeometryType::Polygon);
        assert_eq!(geometry.outer_rings().len(), 1);
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let err = Geometry::from_geojson(&json!({ "coordinates": [1.0, 2.0] })).unwrap_err();
        assert!(matches!(err, AoiError::InvalidGeometry { .. }));
        assert!(err.to_string().contains("missing 'type'"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Geometry::from_geojson(&json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0]]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unsupported geometry type 'LineString'"));
    }

    #[test]
    fn test_missing_coordinates_is_rejected() {
        let err = Geometry::from_geojson(&json!({ "type": "Point" })).unwrap_err();
        assert!(err.to_string().contains("missing 'coordinates'"));
    }

    #[test]
    fn test_wrong_nesting_depth_is_rejected() {
        // Polygon coordinates given at Point depth
        let err = Geometry::from_geojson(&json!({
            "type": "Polygon",
            "coordinates": [1.0, 2.0]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("expected [ring][point][lon, lat]"));

        // MultiPolygon coordinates given at Polygon depth
        let err = Geometry::from_geojson(&json!({
            "type": "MultiPolygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }))
        .unwrap_err();
        assert!(matches!(err, AoiError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_point_with_three_numbers_is_rejected() {
        let result = Geometry::from_geojson(&json!({ "type": "Point", "coordinates": [1.0, 2.0, 3.0] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_str_rejects_non_json() {
        let err = Geometry::parse_str("not json").unwrap_err();
        assert!(matches!(err, AoiError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let parsed: std::result::Result<Geometry, _> =
            serde_json::from_value(json!({ "type": "Circle", "coordinates": [0.0, 0.0] }));
        assert!(parsed.is_err());

        let parsed: Geometry = serde_json::from_value(rectangle()).unwrap();
        assert_eq!(parsed.to_geojson(), rectangle());
    }

    #[test]
    fn test_multipolygon_outer_rings_skip_holes() {
        let geometry = Geometry::multi_polygon(vec![
            vec![
                vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                vec![[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 3.0], [2.0, 2.0]],
            ],
            vec![vec![[20.0, 20.0], [21.0, 20.0], [21.0, 21.0], [20.0, 21.0], [20.0, 20.0]]],
        ]);

        let rings = geometry.outer_rings();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], [10.0, 0.0]);
        assert_eq!(rings[1][0], [20.0, 20.0]);
    }
}
