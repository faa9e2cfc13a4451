//! GeoJSON projection of query results.

use aoi_core::models::{AreaOfInterest, Geometry};
use aoi_geo::compute_bbox;
use geojson::{feature::Id, Feature, FeatureCollection, JsonObject, Value as GeoJsonValue};
use serde_json::{json, Value as JsonValue};

use crate::models::{AoiMatch, QueryResult};

/// Convert an engine geometry into a `geojson` geometry
pub fn to_geojson_geometry(geometry: &Geometry) -> geojson::Geometry {
    let value = match geometry {
        Geometry::Point { coordinates } => GeoJsonValue::Point(coordinates.to_vec()),
        Geometry::Polygon { coordinates } => GeoJsonValue::Polygon(rings(coordinates)),
        Geometry::MultiPolygon { coordinates } => {
            GeoJsonValue::MultiPolygon(coordinates.iter().map(|p| rings(p)).collect())
        }
    };
    geojson::Geometry::new(value)
}

fn rings(rings: &[Vec<[f64; 2]>]) -> Vec<Vec<Vec<f64>>> {
    rings.iter().map(|ring| ring.iter().map(|p| p.to_vec()).collect()).collect()
}

/// Feature for a query match
pub fn match_to_feature(aoi_match: &AoiMatch) -> Feature {
    let mut properties = base_properties(&aoi_match.record);
    let center = aoi_match.centroid;
    properties.insert("centroid".to_string(), json!([center.x(), center.y()]));
    if let Some(distance) = aoi_match.distance_km {
        properties.insert("distance_km".to_string(), json!(distance));
    }

    Feature {
        bbox: Some(aoi_match.bbox.to_array().to_vec()),
        geometry: Some(to_geojson_geometry(&aoi_match.geometry)),
        id: Some(Id::String(aoi_match.record.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Feature for a stored record, or `None` when its geometry does not parse
pub fn record_to_feature(aoi: &AreaOfInterest) -> Option<Feature> {
    let geometry = match aoi.parse_geometry() {
        Ok(geometry) => geometry,
        Err(e) => {
            tracing::warn!(aoi_id = %aoi.id, error = %e, "Skipping AOI in GeoJSON projection");
            return None;
        }
    };
    let bbox = compute_bbox(&geometry)?;
    let center = bbox.center();

    let mut properties = base_properties(aoi);
    properties.insert("centroid".to_string(), json!([center.x(), center.y()]));

    Some(Feature {
        bbox: Some(bbox.to_array().to_vec()),
        geometry: Some(to_geojson_geometry(&geometry)),
        id: Some(Id::String(aoi.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Response envelope for a spatial query
///
/// A `FeatureCollection` whose `metadata` foreign member carries the query
/// kind, the effective parameters and the feature count.
pub fn result_to_collection(result: &QueryResult) -> FeatureCollection {
    let features: Vec<Feature> = result.matches.iter().map(match_to_feature).collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert(
        "metadata".to_string(),
        json!({
            "query": result.kind.as_str(),
            "parameters": result.parameters,
            "count": features.len(),
        }),
    );

    FeatureCollection { bbox: None, features, foreign_members: Some(foreign_members) }
}

fn base_properties(aoi: &AreaOfInterest) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(aoi.id));
    properties.insert("name".to_string(), json!(aoi.name));
    properties.insert("normalized_name".to_string(), json!(aoi.normalized_name));
    properties.insert("aoi_type".to_string(), json!(aoi.aoi_type));
    properties.insert("purpose".to_string(), json!(aoi.purpose));
    properties.insert("ecosystem_code".to_string(), json!(aoi.ecosystem_code));
    properties.insert("area_m2".to_string(), json!(aoi.area_m2));
    properties.insert("perimeter_m".to_string(), json!(aoi.perimeter_m));
    properties.insert("status".to_string(), JsonValue::from(aoi.status.as_str()));
    properties.insert("station_id".to_string(), json!(aoi.station_id));
    properties.insert("station_name".to_string(), json!(aoi.station_name));
    properties.insert("platform_id".to_string(), json!(aoi.platform_id));
    properties.insert("platform_name".to_string(), json!(aoi.platform_name));
    properties
}
