mod directory;
mod memory;
pub mod metrics;

// Re-export the factory functions for easy access
pub use directory::{create_static_directory, StaticUserDirectory};
pub use memory::{create_memory_route_store, load_seed_routes, InMemoryRouteStore};
pub use metrics::{create_noop_metrics, create_prom_metrics};
