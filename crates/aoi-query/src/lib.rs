//! AOI Query - Spatial query dispatch over AOI candidates
//!
//! Validates query parameters, narrows candidates to the caller's scope and
//! status filter, evaluates bbox, point, intersects, within and nearest
//! queries, and projects the results to GeoJSON.

pub mod dispatcher;
pub mod models;
pub mod params;
pub mod projection;
pub mod scope;

pub use dispatcher::SpatialQueryEngine;
pub use models::{AoiMatch, QueryKind, QueryOptions, QueryResult, QueryStats, SpatialQuery};
pub use params::{parse_geometry_body, parse_limit, parse_number, parse_status};
pub use projection::{match_to_feature, record_to_feature, result_to_collection};
pub use scope::apply_scope;
