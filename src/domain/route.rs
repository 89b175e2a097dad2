use super::ServiceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A travel path between two locations.
///
/// `name` is the lookup key and is compared case-insensitively. Every other
/// field is optional on input and defaults to empty. PascalCase aliases let
/// documents produced by .NET tooling load unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(alias = "Name")]
    pub name: String,

    #[serde(default, alias = "Start")]
    pub start: String,

    #[serde(default, alias = "End")]
    pub end: String,

    /// Ordered waypoints between `start` and `end`.
    #[serde(default, alias = "NavigationPoints")]
    pub navigation_points: Vec<String>,

    #[serde(default, alias = "Duration")]
    pub duration: String,

    /// Hazard descriptions along the route.
    #[serde(default, alias = "Dangers")]
    pub dangers: Vec<String>,

    #[serde(default, alias = "FuelUsage")]
    pub fuel_usage: String,

    #[serde(default, alias = "Description")]
    pub description: String,
}

impl Route {
    // ---
    /// Case-insensitive name comparison used by every lookup.
    pub fn matches_name(&self, name: &str) -> bool {
        // ---
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Abstraction over route storage.
///
/// Lookups resolve to the first record whose name matches case-insensitively.
/// Name uniqueness is not enforced on `create`.
#[async_trait::async_trait]
pub trait RouteStore: Send + Sync {
    // ---
    /// Snapshot of all routes in insertion order.
    async fn list(&self) -> Vec<Route>;

    /// First route matching `name`.
    async fn get(&self, name: &str) -> Result<Route, ServiceError>;

    /// Append a route and return the stored record.
    async fn create(&self, route: Route) -> Route;

    /// Replace every field of the first match, including its name.
    async fn update(&self, name: &str, route: Route) -> Result<Route, ServiceError>;

    /// Remove the first match.
    async fn delete(&self, name: &str) -> Result<(), ServiceError>;

    /// Number of stored routes.
    async fn count(&self) -> usize;
}

/// Type alias for any backend that implements RouteStore.
pub type RouteStorePtr = Arc<dyn RouteStore>;
