//! `POST /api/users/getapikey`: cadet and captain API key issuance.

use super::shared_types::ApiError;
use crate::app_state::AppState;
use crate::domain::ServiceError;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Role arrives as a plain string so an unknown value becomes a 400 with a
/// readable message instead of a body rejection.
#[derive(Debug, Deserialize)]
pub struct ApiKeyRequest {
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: String,
}

/// Handler for API key issuance.
///
/// - cadet: a fresh key, at most five per identity per half hour.
/// - captain: the captain's own key, if the username is on the allow-list.
///
/// Responds `200 OK` with `{ apiKey }`, `401 Unauthorized` when rate-limited
/// or for an unknown captain, `400 Bad Request` for an unknown role.
#[tracing::instrument(skip(state, request))]
pub async fn get_api_key(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    // ---
    match state.key_issuer().request_key(&request.username, &request.role) {
        Ok(record) => {
            state.metrics().record_api_key_issued(record.role.as_str());
            Ok(Json(ApiKeyResponse {
                api_key: record.key,
            }))
        }
        Err(err) => {
            let reason = match &err {
                ServiceError::RateLimited => "rate_limited",
                ServiceError::InvalidRole(_) => "invalid_role",
                _ => "unauthorized",
            };
            tracing::info!("API key denied for {}: {}", request.username, err);
            state.metrics().record_api_key_denied(reason);

            Err(match err {
                ServiceError::InvalidRole(_) => {
                    ApiError::new(axum::http::StatusCode::BAD_REQUEST, "Invalid user role.")
                }
                other => ApiError::from(other),
            })
        }
    }
}
