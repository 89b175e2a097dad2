//! One-time loading of the startup route document.

use crate::domain::{ConfigurationError, Route};
use serde::Deserialize;
use std::path::Path;

/// Accepted document shapes: `{ "routes": [...] }` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedDocument {
    // ---
    Named {
        #[serde(alias = "Routes")]
        routes: Vec<Route>,
    },
    Bare(Vec<Route>),
}

/// Reads the route document at `path`.
///
/// # Errors
/// Returns a [`ConfigurationError`] if the file is unreadable, blank or not
/// a valid route document. Callers treat every error as an empty dataset.
pub fn load_seed_routes(path: &Path) -> Result<Vec<Route>, ConfigurationError> {
    // ---
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if raw.trim().is_empty() {
        return Err(ConfigurationError::Empty(path.to_path_buf()));
    }

    let document: SeedDocument =
        serde_json::from_str(&raw).map_err(|source| ConfigurationError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(match document {
        SeedDocument::Named { routes } => routes,
        SeedDocument::Bare(routes) => routes,
    })
}
