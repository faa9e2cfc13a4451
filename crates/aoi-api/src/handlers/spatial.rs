use std::sync::Arc;

use aoi_core::models::{Geometry, Principal};
use aoi_query::{parse_geometry_body, parse_status, result_to_collection, SpatialQuery};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use geojson::FeatureCollection;

use crate::dto::{BBoxParams, GeometryRequest, NearestParams, PointParams, StatusParams};
use crate::error::ApiError;
use crate::principal::Caller;
use crate::state::AppState;

type SpatialResponse = Result<Json<FeatureCollection>, ApiError>;

pub async fn bbox_query(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    params: Result<Query<BBoxParams>, QueryRejection>,
) -> SpatialResponse {
    let Query(params) = params?;
    let query = params.to_query()?;
    run(&state, &principal, &query, params.status.as_deref()).await
}

pub async fn point_query(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    params: Result<Query<PointParams>, QueryRejection>,
) -> SpatialResponse {
    let Query(params) = params?;
    let query = params.to_query()?;
    run(&state, &principal, &query, params.status.as_deref()).await
}

pub async fn nearest_query(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    params: Result<Query<NearestParams>, QueryRejection>,
) -> SpatialResponse {
    let Query(params) = params?;
    let query = params.to_query(state.engine.config())?;
    run(&state, &principal, &query, params.status.as_deref()).await
}

pub async fn intersects_query(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    params: Result<Query<StatusParams>, QueryRejection>,
    body: Result<Json<GeometryRequest>, JsonRejection>,
) -> SpatialResponse {
    let Query(params) = params?;
    let query = SpatialQuery::intersects(geometry_from_body(body)?)?;
    run(&state, &principal, &query, params.status.as_deref()).await
}

pub async fn within_query(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    params: Result<Query<StatusParams>, QueryRejection>,
    body: Result<Json<GeometryRequest>, JsonRejection>,
) -> SpatialResponse {
    let Query(params) = params?;
    let query = SpatialQuery::within(geometry_from_body(body)?)?;
    run(&state, &principal, &query, params.status.as_deref()).await
}

fn geometry_from_body(
    body: Result<Json<GeometryRequest>, JsonRejection>,
) -> Result<Geometry, ApiError> {
    let Json(GeometryRequest(value)) = body?;
    Ok(parse_geometry_body(&value)?)
}

async fn run(
    state: &AppState,
    principal: &Principal,
    query: &SpatialQuery,
    status: Option<&str>,
) -> SpatialResponse {
    let options = parse_status(status, state.engine.config())?;

    let result = state
        .engine
        .execute(state.repository.as_ref(), principal, query, &options)
        .await?;

    Ok(Json(result_to_collection(&result)))
}
