//! Round-trip law of the geometry model: parse then render yields the same
//! nested-array payload for every supported geometry type.

use aoi_core::models::{Geometry, GeometryType};
use proptest::prelude::*;
use serde_json::{json, Value};

fn position() -> impl Strategy<Value = [f64; 2]> {
    (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(lon, lat)| [lon, lat])
}

fn ring() -> impl Strategy<Value = Vec<[f64; 2]>> {
    prop::collection::vec(position(), 3..8).prop_map(|mut ring| {
        let first = ring[0];
        ring.push(first);
        ring
    })
}

fn polygon() -> impl Strategy<Value = Vec<Vec<[f64; 2]>>> {
    prop::collection::vec(ring(), 1..3)
}

proptest! {
    #[test]
    fn point_round_trips(p in position()) {
        let payload = json!({ "type": "Point", "coordinates": p });
        let geometry = Geometry::from_geojson(&payload).unwrap();
        prop_assert_eq!(geometry.geometry_type(), GeometryType::Point);
        prop_assert_eq!(geometry.to_geojson(), payload);
    }

    #[test]
    fn polygon_round_trips(rings in polygon()) {
        let payload = json!({ "type": "Polygon", "coordinates": rings });
        let geometry = Geometry::from_geojson(&payload).unwrap();
        prop_assert_eq!(geometry.geometry_type(), GeometryType::Polygon);
        prop_assert_eq!(geometry.to_geojson(), payload);
    }

    #[test]
    fn multipolygon_round_trips(polygons in prop::collection::vec(polygon(), 1..3)) {
        let payload = json!({ "type": "MultiPolygon", "coordinates": polygons });
        let geometry = Geometry::from_geojson(&payload).unwrap();
        prop_assert_eq!(geometry.geometry_type(), GeometryType::MultiPolygon);
        prop_assert_eq!(geometry.to_geojson(), payload);
    }
}

#[test]
fn test_stored_text_round_trip() {
    let text = r#"{"type":"Polygon","coordinates":[[[19.77,64.25],[19.78,64.25],[19.78,64.26],[19.77,64.26],[19.77,64.25]]]}"#;
    let geometry = Geometry::parse_str(text).unwrap();

    let reparsed: Value = serde_json::from_str(&geometry.to_json_string()).unwrap();
    let original: Value = serde_json::from_str(text).unwrap();
    assert_eq!(reparsed, original);
}
