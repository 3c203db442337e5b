//! `AuthConsumer` extractor: pulls the bearer token from the Authorization
//! header, validates it, and injects the consumer context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use printq_core::error::AppError;
use printq_service::ConsumerContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated consumer available in handlers.
#[derive(Debug, Clone)]
pub struct AuthConsumer(pub ConsumerContext);

impl std::ops::Deref for AuthConsumer {
    type Target = ConsumerContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthConsumer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // No credential at all is 401; a bad one is 403.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Missing bearer token"))?;

        let claims = state.jwt_decoder.decode_token(token)?;
        Ok(AuthConsumer(claims.into()))
    }
}
