//! Route CRUD handlers under `/api/routes`.
//!
//! Every handler takes a [`Caller`], so requests without valid credentials
//! are rejected before the store is touched. Writes additionally require
//! the captain role.

use super::caller::Caller;
use super::shared_types::ApiError;
use crate::app_state::AppState;
use crate::domain::{Operation, Route};
use axum::{
    extract::{Path, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    Json,
};

/// Handler for listing routes (GET /api/routes).
///
/// Any authenticated caller. Routes are returned in insertion order.
#[tracing::instrument(skip(state, caller), fields(identity = %caller.identity))]
pub async fn list_routes(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<Route>>, ApiError> {
    // ---
    caller.require(Operation::ReadRoutes)?;

    Ok(Json(state.routes().list().await))
}

/// Handler for fetching one route (GET /api/routes/{name}).
///
/// The name is matched case-insensitively against the first stored route.
/// Responds `404 Not Found` when nothing matches.
#[tracing::instrument(skip(state, caller))]
pub async fn get_route(
    caller: Caller,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Route>, ApiError> {
    // ---
    caller.require(Operation::ReadRoutes)?;

    let route = state.routes().get(&name).await?;
    Ok(Json(route))
}

/// Handler for adding a route (POST /api/routes). Captain only.
///
/// Duplicate names are accepted. Responds `201 Created` with the stored
/// record and a `Location` header pointing at it.
#[tracing::instrument(skip(state, caller, route))]
pub async fn create_route(
    caller: Caller,
    State(state): State<AppState>,
    Json(route): Json<Route>,
) -> Result<(StatusCode, HeaderMap, Json<Route>), ApiError> {
    // ---
    caller.require(Operation::WriteRoutes)?;

    let created = state.routes().create(route).await;
    state.metrics().record_route_created();
    tracing::info!("{} created route {}", caller.identity, created.name);

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&route_location(&created.name)) {
        headers.insert(LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(created)))
}

/// Handler for replacing a route (PUT /api/routes/{name}). Captain only.
///
/// Every field of the first match is overwritten, including its name.
/// Responds `204 No Content`, or `404 Not Found` when nothing matches.
#[tracing::instrument(skip(state, caller, route))]
pub async fn update_route(
    caller: Caller,
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(route): Json<Route>,
) -> Result<StatusCode, ApiError> {
    // ---
    caller.require(Operation::WriteRoutes)?;

    state.routes().update(&name, route).await?;
    tracing::info!("{} updated route {}", caller.identity, name);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for removing a route (DELETE /api/routes/{name}). Captain only.
///
/// Responds `204 No Content`, or `404 Not Found` when nothing matches.
#[tracing::instrument(skip(state, caller))]
pub async fn delete_route(
    caller: Caller,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    // ---
    caller.require(Operation::WriteRoutes)?;

    state.routes().delete(&name).await?;
    tracing::info!("{} deleted route {}", caller.identity, name);

    Ok(StatusCode::NO_CONTENT)
}

/// Path of a route, with spaces escaped for use in a header.
fn route_location(name: &str) -> String {
    format!("/api/routes/{}", name.replace(' ', "%20"))
}
