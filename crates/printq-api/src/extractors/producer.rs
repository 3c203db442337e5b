//! `Producer` extractor: checks the `x-api-key` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the producer key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Marker proving the request came from a trusted producer.
#[derive(Debug, Clone, Copy)]
pub struct Producer;

impl FromRequestParts<AppState> for Producer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        state.api_key.verify(presented)?;
        Ok(Producer)
    }
}
