use aoi_core::config::EngineConfig;
use aoi_core::error::{AoiError, Result};
use aoi_core::models::{AoiStatus, AreaOfInterest, Geometry};
use aoi_geo::{compute_bbox, ensure_valid, is_valid_lat, is_valid_lon, BoundingBox};
use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// The five supported query shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    BBox,
    Point,
    Intersects,
    Within,
    Nearest,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::BBox => "bbox",
            QueryKind::Point => "point",
            QueryKind::Intersects => "intersects",
            QueryKind::Within => "within",
            QueryKind::Nearest => "nearest",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated spatial query
///
/// Instances only come out of the checked constructors, so the dispatcher
/// never sees inverted boxes, out-of-range coordinates or invalid bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialQuery {
    /// AOIs whose centroid lies inside the box
    BBox(BoundingBox),
    /// AOIs whose geometry contains the point
    Point { lon: f64, lat: f64 },
    /// AOIs whose bbox overlaps the bbox of the geometry
    Intersects { geometry: Geometry, bbox: BoundingBox },
    /// AOIs whose centroid falls inside the container geometry
    Within { geometry: Geometry, bbox: BoundingBox },
    /// The `limit` AOIs closest to the point
    Nearest { lon: f64, lat: f64, limit: usize },
}

impl SpatialQuery {
    pub fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        check_lon("minLon", min_lon)?;
        check_lat("minLat", min_lat)?;
        check_lon("maxLon", max_lon)?;
        check_lat("maxLat", max_lat)?;

        if min_lon >= max_lon {
            return Err(AoiError::invalid_parameters(format!(
                "minLon ({}) must be less than maxLon ({})",
                min_lon, max_lon
            )));
        }
        if min_lat >= max_lat {
            return Err(AoiError::invalid_parameters(format!(
                "minLat ({}) must be less than maxLat ({})",
                min_lat, max_lat
            )));
        }

        Ok(SpatialQuery::BBox(BoundingBox::new(min_lon, min_lat, max_lon, max_lat)))
    }

    pub fn point(lon: f64, lat: f64) -> Result<Self> {
        check_lon("lon", lon)?;
        check_lat("lat", lat)?;
        Ok(SpatialQuery::Point { lon, lat })
    }

    pub fn intersects(geometry: Geometry) -> Result<Self> {
        let bbox = query_bbox(&geometry)?;
        Ok(SpatialQuery::Intersects { geometry, bbox })
    }

    pub fn within(geometry: Geometry) -> Result<Self> {
        let bbox = query_bbox(&geometry)?;
        Ok(SpatialQuery::Within { geometry, bbox })
    }

    /// Nearest query; `limit` falls back to the configured default and must
    /// lie in `1..=nearest_max_limit`
    pub fn nearest(lon: f64, lat: f64, limit: Option<usize>, config: &EngineConfig) -> Result<Self> {
        check_lon("lon", lon)?;
        check_lat("lat", lat)?;

        let limit = limit.unwrap_or(config.nearest_default_limit);
        if limit == 0 || limit > config.nearest_max_limit {
            return Err(AoiError::invalid_parameters(format!(
                "limit must be between 1 and {}, got {}",
                config.nearest_max_limit, limit
            )));
        }

        Ok(SpatialQuery::Nearest { lon, lat, limit })
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            SpatialQuery::BBox(_) => QueryKind::BBox,
            SpatialQuery::Point { .. } => QueryKind::Point,
            SpatialQuery::Intersects { .. } => QueryKind::Intersects,
            SpatialQuery::Within { .. } => QueryKind::Within,
            SpatialQuery::Nearest { .. } => QueryKind::Nearest,
        }
    }

    /// Echo of the effective parameters, as reported in response metadata
    pub fn parameters(&self) -> Map<String, Value> {
        let value = match self {
            SpatialQuery::BBox(bbox) => json!({
                "minLon": bbox.min_lon(),
                "minLat": bbox.min_lat(),
                "maxLon": bbox.max_lon(),
                "maxLat": bbox.max_lat(),
            }),
            SpatialQuery::Point { lon, lat } => json!({ "lon": lon, "lat": lat }),
            SpatialQuery::Intersects { geometry, bbox } | SpatialQuery::Within { geometry, bbox } => {
                json!({
                    "geometry_type": geometry.geometry_type().as_str(),
                    "bbox": bbox.to_array(),
                })
            }
            SpatialQuery::Nearest { lon, lat, limit } => {
                json!({ "lon": lon, "lat": lat, "limit": limit })
            }
        };

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn check_lon(name: &str, value: f64) -> Result<()> {
    if !is_valid_lon(value) {
        return Err(AoiError::invalid_parameters(format!(
            "{} must be a finite longitude in [-180, 180], got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_lat(name: &str, value: f64) -> Result<()> {
    if !is_valid_lat(value) {
        return Err(AoiError::invalid_parameters(format!(
            "{} must be a finite latitude in [-90, 90], got {}",
            name, value
        )));
    }
    Ok(())
}

fn query_bbox(geometry: &Geometry) -> Result<BoundingBox> {
    ensure_valid(geometry)?;
    compute_bbox(geometry).ok_or_else(|| AoiError::invalid_geometry("geometry has no coordinates"))
}

/// Per-request options that are not part of the query shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Statuses a candidate must have to be returned
    pub statuses: Vec<AoiStatus>,
}

impl QueryOptions {
    /// Defaults derived from engine configuration: active only, unless the
    /// deployment includes inactive AOIs by default
    pub fn from_config(config: &EngineConfig) -> Self {
        if config.include_inactive_by_default {
            Self::all_statuses()
        } else {
            Self::active_only()
        }
    }

    pub fn active_only() -> Self {
        Self { statuses: vec![AoiStatus::Active] }
    }

    pub fn all_statuses() -> Self {
        Self { statuses: AoiStatus::ALL.to_vec() }
    }

    pub fn with_statuses(statuses: Vec<AoiStatus>) -> Self {
        Self { statuses }
    }

    pub fn permits(&self, status: AoiStatus) -> bool {
        self.statuses.contains(&status)
    }

    pub fn status_labels(&self) -> Vec<&'static str> {
        self.statuses.iter().map(AoiStatus::as_str).collect()
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::active_only()
    }
}

/// One AOI that matched a query, with its parsed geometry
#[derive(Debug, Clone)]
pub struct AoiMatch {
    pub record: AreaOfInterest,
    pub geometry: Geometry,
    pub bbox: BoundingBox,
    pub centroid: Point,
    /// Haversine distance from the query point, nearest queries only
    pub distance_km: Option<f64>,
}

/// Counts collected while a query runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    /// Candidates left after the scope filter
    pub in_scope: usize,
    /// Candidates left after the status filter
    pub status_matched: usize,
    /// Candidates dropped because their stored geometry would not parse
    pub unparsable: usize,
    /// Candidates returned
    pub returned: usize,
}

/// Ordered result of a spatial query
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub kind: QueryKind,
    pub parameters: Map<String, Value>,
    pub matches: Vec<AoiMatch>,
    pub stats: QueryStats,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.record.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_rejects_inverted_bounds() {
        assert!(SpatialQuery::bbox(19.5, 64.0, 20.0, 65.0).is_ok());

        let err = SpatialQuery::bbox(20.0, 64.0, 19.5, 65.0).unwrap_err();
        assert!(err.to_string().contains("minLon"));

        let err = SpatialQuery::bbox(19.5, 65.0, 20.0, 65.0).unwrap_err();
        assert!(err.to_string().contains("minLat"));
    }

    #[test]
    fn test_bbox_rejects_out_of_range_and_non_finite() {
        assert!(SpatialQuery::bbox(-181.0, 0.0, 10.0, 10.0).is_err());
        assert!(SpatialQuery::bbox(0.0, 0.0, 10.0, 91.0).is_err());
        assert!(SpatialQuery::bbox(f64::NAN, 0.0, 10.0, 10.0).is_err());
        assert!(SpatialQuery::bbox(0.0, 0.0, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_point_range() {
        assert!(SpatialQuery::point(180.0, -90.0).is_ok());
        assert!(matches!(
            SpatialQuery::point(0.0, 90.5),
            Err(AoiError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn test_nearest_limit_defaults_and_bounds() {
        let config = EngineConfig::default();

        let query = SpatialQuery::nearest(0.0, 0.0, None, &config).unwrap();
        assert_eq!(query, SpatialQuery::Nearest { lon: 0.0, lat: 0.0, limit: 5 });

        assert!(SpatialQuery::nearest(0.0, 0.0, Some(25), &config).is_ok());
        assert!(SpatialQuery::nearest(0.0, 0.0, Some(26), &config).is_err());
        assert!(SpatialQuery::nearest(0.0, 0.0, Some(0), &config).is_err());
    }

    #[test]
    fn test_body_geometry_is_validated() {
        let open_ring = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
        assert!(matches!(
            SpatialQuery::within(open_ring),
            Err(AoiError::InvalidGeometry { .. })
        ));

        let query = SpatialQuery::intersects(Geometry::point(10.0, 20.0)).unwrap();
        assert_eq!(query.kind(), QueryKind::Intersects);
        assert_eq!(query.parameters()["bbox"], json!([10.0, 20.0, 10.0, 20.0]));
    }

    #[test]
    fn test_parameters_echo() {
        let params = SpatialQuery::bbox(1.0, 2.0, 3.0, 4.0).unwrap().parameters();
        assert_eq!(params["minLon"], json!(1.0));
        assert_eq!(params["maxLat"], json!(4.0));

        let config = EngineConfig::default();
        let params = SpatialQuery::nearest(1.0, 2.0, Some(3), &config).unwrap().parameters();
        assert_eq!(params["limit"], json!(3));
    }

    #[test]
    fn test_options_follow_config() {
        let mut config = EngineConfig::default();
        assert_eq!(QueryOptions::from_config(&config), QueryOptions::active_only());

        config.include_inactive_by_default = true;
        let options = QueryOptions::from_config(&config);
        assert!(options.permits(AoiStatus::Archived));
        assert_eq!(options.status_labels(), vec!["active", "inactive", "archived"]);
    }
}
