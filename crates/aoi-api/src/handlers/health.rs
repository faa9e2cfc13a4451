use axum::Json;

use crate::dto::HealthResponse;

/// Liveness probe; does not touch the repository
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
