//! Error kinds surfaced by the access, key issuance and route components.

use std::path::PathBuf;

/// Outcome of a rejected operation.
///
/// Every variant is terminal: the caller reports it, nothing retries it.
/// The HTTP layer maps each variant onto a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    // ---
    /// Missing or bad credential, unknown captain, or denied key.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the role may not perform the operation.
    #[error("{0}")]
    Forbidden(String),

    /// Cadet issuance quota exhausted for the current window.
    #[error("Maximum cadet API keys reached for the half-hour period.")]
    RateLimited,

    /// Role string is neither `cadet` nor `captain`.
    #[error("Invalid user role: {0}")]
    InvalidRole(String),

    /// No route matched the requested name.
    #[error("Route not found: {0}")]
    NotFound(String),
}

/// Failure while loading the startup route document.
///
/// Always recovered by the caller: logged, then treated as an empty dataset.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    // ---
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed file {0} is empty")]
    Empty(PathBuf),
}
