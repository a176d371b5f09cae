//! Client identification
//!
//! Saved analyses are partitioned by a caller-supplied `X-Client-Id`
//! header. It identifies, it does not authenticate.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the client label
pub const CLIENT_ID_HEADER: &str = "x-client-id";
/// Label used when no client ID is supplied
pub const ANONYMOUS_CLIENT_ID: &str = "anon";

const MAX_CLIENT_ID_BYTES: usize = 128;

/// Extractor for the requesting client's ID
///
/// # Usage
/// ```ignore
/// async fn handler(ClientId(client_id): ClientId) -> impl IntoResponse {
///     format!("Records of {client_id}")
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(CLIENT_ID_HEADER) else {
            return Ok(ClientId(ANONYMOUS_CLIENT_ID.to_string()));
        };

        let value = value
            .to_str()
            .map_err(|_| AppError::Validation("X-Client-Id must be visible ASCII".to_string()))?;

        if value.is_empty() {
            return Ok(ClientId(ANONYMOUS_CLIENT_ID.to_string()));
        }

        if value.len() > MAX_CLIENT_ID_BYTES {
            return Err(AppError::Validation(format!(
                "X-Client-Id must be at most {MAX_CLIENT_ID_BYTES} bytes"
            )));
        }

        Ok(ClientId(value.to_string()))
    }
}
