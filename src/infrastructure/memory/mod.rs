mod route_store;
mod seed;

pub use route_store::{create_memory_route_store, InMemoryRouteStore};
pub use seed::load_seed_routes;
