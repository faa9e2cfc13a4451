use aoi_core::error::AoiError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<AoiError> for ApiError {
    fn from(err: AoiError) -> Self {
        match &err {
            AoiError::InvalidParameters { reason } => {
                Self::bad_request("Invalid parameters").with_details(reason.clone())
            }
            AoiError::InvalidGeometry { reason } => {
                Self::bad_request("Invalid geometry").with_details(reason.clone())
            }
            AoiError::NotFound { .. } => {
                Self::not_found("Area of interest not found").with_details(err.to_string())
            }
            AoiError::ReferencedByCampaigns { .. } => {
                Self::conflict("Area of interest is in use").with_details(err.to_string())
            }
            _ => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("Internal error").with_details(err.to_string())
            }
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query string").with_details(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}
