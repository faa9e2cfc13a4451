mod aois;
mod health;
mod spatial;

pub use aois::{create_aoi, delete_aoi, get_aoi, update_aoi};
pub use health::health_check;
pub use spatial::{bbox_query, intersects_query, nearest_query, point_query, within_query};
