//! Credential extraction for REST handlers.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use crate::tools::ToolError;

/// The authenticated subject, extracted from the `Authorization` header.
///
/// Missing, malformed, and expired credentials all produce the same
/// authentication error.
pub struct AuthSubject(pub Uuid);

impl FromRequestParts<AppState> for AuthSubject {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(ToolError::authentication)?;

        let subject = state.validator.verify(header)?;
        Ok(Self(subject))
    }
}
