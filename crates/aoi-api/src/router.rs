use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Spatial queries
        .route("/api/v1/aois/spatial/bbox", get(handlers::bbox_query))
        .route("/api/v1/aois/spatial/point", get(handlers::point_query))
        .route("/api/v1/aois/spatial/nearest", get(handlers::nearest_query))
        .route("/api/v1/aois/spatial/intersects", post(handlers::intersects_query))
        .route("/api/v1/aois/spatial/within", post(handlers::within_query))

        // AOI lifecycle
        .route("/api/v1/aois", post(handlers::create_aoi))
        .route(
            "/api/v1/aois/{id}",
            get(handlers::get_aoi).patch(handlers::update_aoi).delete(handlers::delete_aoi),
        )

        .with_state(state)
}
