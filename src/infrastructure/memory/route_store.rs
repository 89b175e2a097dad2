use crate::domain::{Route, RouteStore, RouteStorePtr, ServiceError};
use crate::infrastructure::load_seed_routes;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Builds a store populated from the seed document at `seed_path`.
///
/// Never fails: an unreadable, blank or malformed document is logged and
/// the store starts empty.
pub fn create_memory_route_store(seed_path: &Path) -> RouteStorePtr {
    // ---
    let routes = match load_seed_routes(seed_path) {
        Ok(routes) => {
            tracing::info!(count = routes.len(), path = %seed_path.display(), "Loaded seed routes");
            routes
        }
        Err(err) => {
            tracing::warn!("Starting with no routes: {}", err);
            Vec::new()
        }
    };

    Arc::new(InMemoryRouteStore::new(routes))
}

/// Route store backed by an ordered vector.
///
/// Every mutation holds the write lock for its whole find-and-modify step,
/// so readers never see a half-applied update.
#[derive(Debug, Default)]
pub struct InMemoryRouteStore {
    // ---
    routes: RwLock<Vec<Route>>,
}

impl InMemoryRouteStore {
    // ---
    pub fn new(routes: Vec<Route>) -> Self {
        // ---
        Self {
            routes: RwLock::new(routes),
        }
    }
}

fn not_found(name: &str) -> ServiceError {
    ServiceError::NotFound(name.to_string())
}

#[async_trait::async_trait]
impl RouteStore for InMemoryRouteStore {
    // ---
    async fn list(&self) -> Vec<Route> {
        self.routes.read().await.clone()
    }

    async fn get(&self, name: &str) -> Result<Route, ServiceError> {
        // ---
        self.routes
            .read()
            .await
            .iter()
            .find(|r| r.matches_name(name))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn create(&self, route: Route) -> Route {
        // ---
        self.routes.write().await.push(route.clone());
        route
    }

    async fn update(&self, name: &str, route: Route) -> Result<Route, ServiceError> {
        // ---
        let mut routes = self.routes.write().await;
        let existing = routes
            .iter_mut()
            .find(|r| r.matches_name(name))
            .ok_or_else(|| not_found(name))?;

        *existing = route.clone();
        Ok(route)
    }

    async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        // ---
        let mut routes = self.routes.write().await;
        let index = routes
            .iter()
            .position(|r| r.matches_name(name))
            .ok_or_else(|| not_found(name))?;

        routes.remove(index);
        Ok(())
    }

    async fn count(&self) -> usize {
        self.routes.read().await.len()
    }
}
