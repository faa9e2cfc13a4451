pub mod aoi;
pub mod geometry;
pub mod principal;

pub use aoi::{
    normalize_name, AoiId, AoiSource, AoiStatus, AoiUpdate, AreaOfInterest, NewAreaOfInterest,
    PlatformId, StationId,
};
pub use geometry::{Geometry, GeometryType, Position, Ring, WGS84_EPSG};
pub use principal::{AccessScope, Principal, Role};
