//! Application state management.
//!
//! `AppState` is handed to every Axum handler through the `State` extractor.
//! It owns the route store, the key issuer, the token service, the login
//! directory and the metrics backend. Cloning is cheap: every member is
//! behind an `Arc`.

use crate::domain::{MetricsPtr, RouteStorePtr, UserDirectoryPtr};
use crate::key_issuer::KeyIssuer;
use crate::token::TokenService;
use std::sync::Arc;

/// Shared application state passed to all Axum handlers.
///
/// Built once in `create_router_with_config()` and never replaced. All
/// mutable domain state (routes, key counters) lives behind the locks of
/// the individual components, not in this struct.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Metrics implementation, Prometheus-backed or no-op.
    metrics: MetricsPtr,

    /// Route records, seeded once at startup.
    routes: RouteStorePtr,

    /// Cadet/captain key issuance and per-key authorization.
    key_issuer: Arc<KeyIssuer>,

    /// Bearer token signing and verification.
    tokens: Arc<TokenService>,

    /// Login identities for `POST /api/auth/login`.
    users: UserDirectoryPtr,
}

impl AppState {
    // ---

    pub fn new(
        metrics: MetricsPtr,
        routes: RouteStorePtr,
        key_issuer: Arc<KeyIssuer>,
        tokens: Arc<TokenService>,
        users: UserDirectoryPtr,
    ) -> Self {
        // ---
        AppState {
            metrics,
            routes,
            key_issuer,
            tokens,
            users,
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the route store.
    pub(crate) fn routes(&self) -> &RouteStorePtr {
        // ---
        &self.routes
    }

    /// Get a reference to the key issuer.
    pub(crate) fn key_issuer(&self) -> &KeyIssuer {
        // ---
        &self.key_issuer
    }

    /// Get a reference to the token service.
    pub(crate) fn tokens(&self) -> &TokenService {
        // ---
        &self.tokens
    }

    /// Get a reference to the login directory.
    pub(crate) fn users(&self) -> &UserDirectoryPtr {
        // ---
        &self.users
    }
}
