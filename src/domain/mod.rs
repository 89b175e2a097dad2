mod access;
mod error;
mod metrics;
mod role;
mod route;
mod user;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Access control and credential model
pub use access::{authorize, Operation};
pub use error::{ConfigurationError, ServiceError};
pub use role::Role;

// Route records and their storage abstraction
pub use route::{Route, RouteStore, RouteStorePtr};

// Login directory abstraction
pub use user::{User, UserDirectory, UserDirectoryPtr};
