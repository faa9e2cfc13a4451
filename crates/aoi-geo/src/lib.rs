//! AOI Geo - Planar geometry algorithms for the spatial query engine
//!
//! Bounding boxes and centroids, ray-casting containment, bbox overlap,
//! haversine ranking, and validation of the AOI geometry invariants.

pub mod bbox;
pub mod containment;
pub mod distance;
pub mod validation;

pub use bbox::{compute_bbox, overlaps, BoundingBox};
pub use containment::{contains_point, point_in_ring};
pub use distance::{
    equirectangular_distance_sq, haversine_km, latitude_gap_km, EARTH_RADIUS_KM,
};
pub use validation::{
    ensure_valid, is_valid_lat, is_valid_lon, validate_geometry, ValidationError, ValidationResult,
};
