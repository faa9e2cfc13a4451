use std::sync::Arc;

use aoi_core::error::AoiError;
use aoi_core::models::{AoiId, AoiUpdate, AreaOfInterest, NewAreaOfInterest, Principal};
use aoi_query::record_to_feature;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::dto::{DeleteResponse, LookupParams};
use crate::error::ApiError;
use crate::principal::Caller;
use crate::state::AppState;

pub async fn get_aoi(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    Path(id): Path<String>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let aoi = lookup(&state, &principal, &id).await?;

    if !params.wants_geojson() {
        return Ok(Json(aoi).into_response());
    }

    // Surfaces the parse failure instead of answering with an empty feature.
    aoi.parse_geometry()?;
    let feature = record_to_feature(&aoi)
        .ok_or_else(|| ApiError::internal("Failed to project area of interest"))?;
    Ok(Json(feature).into_response())
}

pub async fn create_aoi(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    body: Result<Json<NewAreaOfInterest>, JsonRejection>,
) -> Result<(StatusCode, Json<AreaOfInterest>), ApiError> {
    let Json(input) = body?;

    if !principal.can_write_station(input.station_id) {
        return Err(ApiError::forbidden("Not allowed to create AOIs for this station"));
    }

    let aoi = state.repository.create(input).await?;
    tracing::info!(aoi_id = %aoi.id, subject = %principal.subject, "Created area of interest");

    Ok((StatusCode::CREATED, Json(aoi)))
}

pub async fn update_aoi(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    Path(id): Path<String>,
    body: Result<Json<AoiUpdate>, JsonRejection>,
) -> Result<Json<AreaOfInterest>, ApiError> {
    let Json(update) = body?;

    let existing = lookup(&state, &principal, &id).await?;
    if !principal.can_write_station(existing.station_id) {
        return Err(ApiError::forbidden("Not allowed to modify this area of interest"));
    }

    let geometry_changed = update.touches_geometry();
    let aoi = state.repository.update(existing.id, update).await?;
    tracing::info!(
        aoi_id = %aoi.id,
        subject = %principal.subject,
        geometry_changed,
        "Updated area of interest"
    );

    Ok(Json(aoi))
}

pub async fn delete_aoi(
    State(state): State<Arc<AppState>>,
    Caller(principal): Caller,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let existing = lookup(&state, &principal, &id).await?;
    if !principal.can_write_station(existing.station_id) {
        return Err(ApiError::forbidden("Not allowed to delete this area of interest"));
    }

    state.repository.delete(existing.id).await?;
    tracing::info!(aoi_id = %existing.id, subject = %principal.subject, "Deleted area of interest");

    Ok(Json(DeleteResponse { deleted: true, id: existing.id.to_string() }))
}

async fn lookup(
    state: &AppState,
    principal: &Principal,
    raw_id: &str,
) -> Result<AreaOfInterest, ApiError> {
    let id: AoiId = raw_id
        .parse()
        .map_err(|_| AoiError::invalid_parameters(format!("'{}' is not a valid AOI id", raw_id)))?;

    Ok(state.engine.lookup(state.repository.as_ref(), principal, id).await?)
}
