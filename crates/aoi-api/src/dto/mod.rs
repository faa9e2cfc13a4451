mod request;
mod response;

pub use request::{
    BBoxParams, GeometryRequest, LookupParams, NearestParams, PointParams, StatusParams,
};
pub use response::{DeleteResponse, HealthResponse};
