use aoi_core::config::EngineConfig;
use aoi_core::error::Result;
use aoi_query::{parse_limit, parse_number, SpatialQuery};
use serde::Deserialize;
use serde_json::Value;

/// Query string of the bbox query
///
/// Values stay strings until [`BBoxParams::to_query`] so a bad number is
/// reported against the parameter it came from.
#[derive(Debug, Default, Deserialize)]
pub struct BBoxParams {
    #[serde(rename = "minLon", alias = "west")]
    pub min_lon: Option<String>,
    #[serde(rename = "minLat", alias = "south")]
    pub min_lat: Option<String>,
    #[serde(rename = "maxLon", alias = "east")]
    pub max_lon: Option<String>,
    #[serde(rename = "maxLat", alias = "north")]
    pub max_lat: Option<String>,
    pub status: Option<String>,
}

impl BBoxParams {
    pub fn to_query(&self) -> Result<SpatialQuery> {
        SpatialQuery::bbox(
            parse_number("minLon", self.min_lon.as_deref())?,
            parse_number("minLat", self.min_lat.as_deref())?,
            parse_number("maxLon", self.max_lon.as_deref())?,
            parse_number("maxLat", self.max_lat.as_deref())?,
        )
    }
}

/// Query string of the point query
#[derive(Debug, Default, Deserialize)]
pub struct PointParams {
    #[serde(alias = "longitude")]
    pub lon: Option<String>,
    #[serde(alias = "latitude")]
    pub lat: Option<String>,
    pub status: Option<String>,
}

impl PointParams {
    pub fn to_query(&self) -> Result<SpatialQuery> {
        SpatialQuery::point(
            parse_number("lon", self.lon.as_deref())?,
            parse_number("lat", self.lat.as_deref())?,
        )
    }
}

/// Query string of the nearest query
#[derive(Debug, Default, Deserialize)]
pub struct NearestParams {
    #[serde(alias = "longitude")]
    pub lon: Option<String>,
    #[serde(alias = "latitude")]
    pub lat: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

impl NearestParams {
    pub fn to_query(&self, config: &EngineConfig) -> Result<SpatialQuery> {
        SpatialQuery::nearest(
            parse_number("lon", self.lon.as_deref())?,
            parse_number("lat", self.lat.as_deref())?,
            parse_limit(self.limit.as_deref())?,
            config,
        )
    }
}

/// Query string of intersects and within, which take their geometry from the body
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

/// Body of intersects and within queries: `{ "geometry": <GeoJSON> }`
///
/// Kept as raw JSON so the engine reports structural problems as geometry
/// errors rather than as body deserialization failures.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct GeometryRequest(pub Value);

/// Query parameters of single-AOI lookup
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    pub format: Option<String>,
}

impl LookupParams {
    pub fn wants_geojson(&self) -> bool {
        self.format.as_deref().is_some_and(|f| f.eq_ignore_ascii_case("geojson"))
    }
}
