//! REST error rendering.
//!
//! Wraps the shared tool error taxonomy and renders it as the uniform
//! `{ "error": { "code", "message", "details" } }` body with the matching
//! HTTP status. Rate-limit rejections additionally carry a `Retry-After`
//! header.

use axum::{
    Json,
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::db::DbError;
use crate::tools::ToolError;

pub struct ApiError(ToolError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ToolError::Authentication => StatusCode::UNAUTHORIZED,
            ToolError::Validation(_) | ToolError::UnknownTool(_) => StatusCode::BAD_REQUEST,
            ToolError::NotFound { .. } => StatusCode::NOT_FOUND,
            ToolError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ToolError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(self.0.to_body());

        if let ToolError::RateLimited { retry_after_secs } = &self.0 {
            return (
                status,
                [(RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        Self(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        let err = ToolError::from(e);
        if let ToolError::Database(detail) = &err {
            error!(%detail, "store operation failed");
        }
        Self(err)
    }
}
