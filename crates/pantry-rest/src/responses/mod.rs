//! API response types.
//!
//! Every body, success or failure, uses the same envelope:
//! `{"code": <http status>, "message": "...", "data": ..., "meta": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pantry_core::{ErrorResponse, PageMeta, PantryError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// HTTP status code.
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata, present on list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    /// Creates a response carrying `data`.
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data: Some(data),
            meta: None,
        }
    }

    /// Attaches pagination metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub PantryError);

impl From<PantryError> for AppError {
    fn from(err: PantryError) -> Self {
        Self(err)
    }
}

impl AppError {
    /// Builds the error response with an explicit status and details.
    pub(crate) fn response(status: StatusCode, error: ErrorResponse) -> Response {
        let body = ApiResponse {
            code: status.as_u16(),
            message: error.message.clone(),
            data: Some(error),
            meta: None,
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        Self::response(status, ErrorResponse::from_error(&self.0))
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success (200) response.
pub fn ok<T: Serialize>(data: T, message: &str) -> ApiResult<T> {
    Ok(Json(ApiResponse::new(StatusCode::OK, message, data)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED, message, data)),
    )
}
