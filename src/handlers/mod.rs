// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod api_keys;
mod auth;
mod caller;
mod health;
mod metrics;
mod root;
mod routes;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_requests};
pub use root::root_handler;

// Authentication and key issuance
pub use api_keys::get_api_key;
pub use auth::login;
pub use caller::API_KEY_HEADER;

// Route CRUD handlers
pub use routes::{create_route, delete_route, get_route, list_routes, update_route};
