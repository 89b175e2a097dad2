//! Credential extraction for route endpoints.
//!
//! Accepts either a bearer token or an issued API key:
//!
//! - `Authorization: Bearer <jwt>` is verified by the token service.
//! - `X-Api-Key: <key>` is resolved by the key issuer, which also counts
//!   the use against the key's quota.
//!
//! Rejection happens during extraction, before the handler body runs.

use super::shared_types::ApiError;
use crate::app_state::AppState;
use crate::domain::{authorize, Operation, Role, ServiceError};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// Header carrying an issued API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The authenticated identity behind a request.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Username for tokens, the key itself for API keys.
    pub identity: String,
    pub role: Role,
}

impl Caller {
    // ---
    /// Applies the access policy for `operation`.
    pub fn require(&self, operation: Operation) -> Result<(), ApiError> {
        // ---
        authorize(self.role, operation).map_err(|err| {
            tracing::debug!(identity = %self.identity, role = %self.role, ?operation, "access denied");
            ApiError::from(err)
        })
    }
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::from(ServiceError::Unauthorized(message.to_string()))
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // ---
        if let Some(value) = parts.headers.get(AUTHORIZATION) {
            let header = value.to_str().map_err(|_| {
                tracing::debug!("Invalid Authorization header encoding");
                unauthorized("Invalid Authorization header.")
            })?;

            let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                tracing::debug!("Authorization header missing Bearer prefix");
                unauthorized("Invalid Authorization header format.")
            })?;

            let verified = state.tokens().verify(token.trim())?;
            return Ok(Caller {
                identity: verified.username,
                role: verified.role,
            });
        }

        if let Some(value) = parts.headers.get(API_KEY_HEADER) {
            let key = value
                .to_str()
                .map_err(|_| unauthorized("Invalid API key header."))?;

            let role = state.key_issuer().is_authorized(key).map_err(|err| {
                tracing::debug!("API key rejected: {}", err);
                ApiError::from(err)
            })?;

            return Ok(Caller {
                identity: key.to_string(),
                role,
            });
        }

        tracing::debug!("Request carried no credentials");
        Err(unauthorized("Missing credentials."))
    }
}
