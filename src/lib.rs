// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use handlers::*;

// Public exports (visible outside this module)
pub mod domain;
pub mod key_issuer;
pub mod token;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

pub use config::*;
pub use handlers::API_KEY_HEADER;
pub use key_issuer::{ApiKeyRecord, KeyIssuer};
pub use token::TokenService;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_route_store, // ---
    create_noop_metrics,
    create_prom_metrics,
    create_static_directory,
    load_seed_routes,
    InMemoryRouteStore,
    StaticUserDirectory,
};

/// Build the HTTP router from environment configuration.
pub fn create_router() -> Result<Router> {
    // ---
    let config = AppConfig::from_env()?;
    create_router_with_config(config)
}

/// Build the HTTP router from an explicit configuration.
///
/// Seed loading never fails the build: a missing or malformed route
/// document leaves the store empty.
pub fn create_router_with_config(config: AppConfig) -> Result<Router> {
    // ---
    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    let metrics = if config.server.metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    let routes = create_memory_route_store(&config.routes.seed_path);

    let cadet_key_ttl = config
        .keys
        .cadet_key_ttl_minutes
        .and_then(chrono::Duration::try_minutes);
    let key_issuer = Arc::new(KeyIssuer::new(
        config.keys.captain_keys.iter().cloned(),
        cadet_key_ttl,
    ));

    tracing::info!(
        captains = config.keys.captain_keys.len(),
        jwt = ?config.jwt,
        metrics = %config.server.metrics_type,
        "Building router"
    );
    let tokens = Arc::new(TokenService::new(config.jwt));

    let app_state = AppState::new(
        metrics,
        routes,
        key_issuer,
        tokens,
        create_static_directory(),
    );

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/auth/login", post(login))
        .route("/api/users/getapikey", post(get_api_key))
        .route("/api/routes", get(list_routes).post(create_route))
        .route(
            "/api/routes/{name}",
            get(get_route).put(update_route).delete(delete_route),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_requests,
        ))
        .with_state(app_state);

    Ok(router)
}
