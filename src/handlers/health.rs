use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    routes: Option<usize>,
}

#[derive(Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the server.
///
/// - By default, a light check confirming the web server is running.
/// - With `mode=full`, also reports how many routes the store holds.
///
/// # Examples
/// - `GET /health` → `{ "status": "ok" }`
/// - `GET /health?mode=full` → `{ "status": "ok", "routes": 3 }`
pub async fn health_check(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    // ---
    let routes = match params.mode.as_deref() {
        Some("full") => Some(state.routes().count().await),
        _ => None,
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            routes,
        }),
    )
}
