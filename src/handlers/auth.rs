//! `POST /api/auth/login`: exchanges a username and password for a bearer token.

use super::shared_types::ApiError;
use crate::app_state::AppState;
use crate::domain::ServiceError;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expiration: DateTime<Utc>,
}

/// Handler for user login.
///
/// - `200 OK` with `{ token, expiration }` for a known username/password.
/// - `401 Unauthorized` otherwise.
#[tracing::instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // ---
    let user = state
        .users()
        .authenticate(&request.username, &request.password)
        .ok_or_else(|| {
            tracing::debug!("Login rejected for {}", request.username);
            ApiError::from(ServiceError::Unauthorized(
                "Invalid username or password.".to_string(),
            ))
        })?;

    let issued = state.tokens().issue(&user).map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        ApiError::internal()
    })?;

    tracing::info!("Issued token for {} ({})", user.username, user.role);

    Ok(Json(LoginResponse {
        token: issued.token,
        expiration: issued.expires_at,
    }))
}
