// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Required values are validated eagerly; a missing one is a deployment
//! error, not a recoverable runtime condition.

use anyhow::Result;
use std::path::PathBuf;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// Fails fast with a human-readable error if the variable is missing.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

/// Reads an optional string environment variable with a default.
macro_rules! optional_env {
    // ---
    ($key:literal, $default:expr) => {
        std::env::var($key).unwrap_or_else(|_| $default.to_string())
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub jwt: jwt::JwtConfig,
    pub keys: keys::KeyConfig,
    pub routes: routes::RoutesConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env(),
            jwt: jwt::JwtConfig::from_env()?,
            keys: keys::KeyConfig::from_env(),
            routes: routes::RoutesConfig::from_env(),
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---

    /// Listener and observability settings.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Socket address to bind. Defaults to `127.0.0.1:8080`.
        pub bind_addr: String,

        /// Metrics backend, `prom` or `noop`. Defaults to `noop`.
        pub metrics_type: String,
    }

    impl ServerConfig {
        pub fn from_env() -> Self {
            // ---
            Self {
                bind_addr: optional_env!("SPACE_BIND_ADDR", "127.0.0.1:8080"),
                metrics_type: optional_env!("SPACE_METRICS_TYPE", "noop"),
            }
        }
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            // ---
            Self {
                bind_addr: "127.0.0.1:8080".to_string(),
                metrics_type: "noop".to_string(),
            }
        }
    }
}
pub use server::ServerConfig;

// ============================================================
// JWT configuration
// ============================================================

mod jwt {
    // ---
    use super::*;

    /// Longest accepted token lifetime: one year.
    pub const MAX_EXPIRES_IN_HOURS: i64 = 8_760;

    /// Bearer token signing configuration.
    #[derive(Clone)]
    pub struct JwtConfig {
        /// HMAC-SHA256 secret. Required.
        pub secret: String,

        /// `iss` claim. Defaults to `SpaceTravel`.
        pub issuer: String,

        /// `aud` claim. Defaults to `SpaceTravelClients`.
        pub audience: String,

        /// Token lifetime, `1..=MAX_EXPIRES_IN_HOURS`. Defaults to 1 hour.
        pub expires_in_hours: i64,
    }

    // Keeps the secret out of logs.
    impl std::fmt::Debug for JwtConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("JwtConfig")
                .field("secret", &"[hidden]")
                .field("issuer", &self.issuer)
                .field("audience", &self.audience)
                .field("expires_in_hours", &self.expires_in_hours)
                .finish()
        }
    }

    impl JwtConfig {
        /// Builds a [`JwtConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if `SPACE_JWT_SECRET` is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let secret = required_env!("SPACE_JWT_SECRET");
            let issuer = optional_env!("SPACE_JWT_ISSUER", "SpaceTravel");
            let audience = optional_env!("SPACE_JWT_AUDIENCE", "SpaceTravelClients");
            let expires_in_hours = Some(optional_env_parse!("SPACE_JWT_EXPIRES_IN_HOURS", i64, 1))
                .filter(|hours| (1..=MAX_EXPIRES_IN_HOURS).contains(hours))
                .unwrap_or(1);

            Ok(Self {
                secret,
                issuer,
                audience,
                expires_in_hours,
            })
        }
    }
}
pub use jwt::JwtConfig;

// ============================================================
// API key configuration
// ============================================================

mod keys {
    // ---

    /// Longest accepted cadet key lifetime: one year.
    pub const MAX_CADET_KEY_TTL_MINUTES: i64 = 525_600;

    /// Captain allow-list and cadet key lifetime.
    #[derive(Debug, Clone)]
    pub struct KeyConfig {
        /// Captain identities; each is also that captain's key.
        pub captain_keys: Vec<String>,

        /// Expiry applied to newly issued cadet keys. `None` disables expiry;
        /// values outside `1..=MAX_CADET_KEY_TTL_MINUTES` are ignored.
        pub cadet_key_ttl_minutes: Option<i64>,
    }

    impl KeyConfig {
        pub fn from_env() -> Self {
            // ---
            let captain_keys = std::env::var("SPACE_CAPTAIN_KEYS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|k| !k.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_else(|_| Self::default().captain_keys);

            let cadet_key_ttl_minutes = std::env::var("SPACE_CADET_KEY_TTL_MIN")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|minutes| (1..=MAX_CADET_KEY_TTL_MINUTES).contains(minutes));

            Self {
                captain_keys,
                cadet_key_ttl_minutes,
            }
        }
    }

    impl Default for KeyConfig {
        fn default() -> Self {
            // ---
            Self {
                captain_keys: vec!["captainApiKey1".to_string(), "captainApiKey2".to_string()],
                cadet_key_ttl_minutes: None,
            }
        }
    }
}
pub use keys::KeyConfig;

// ============================================================
// Route seed configuration
// ============================================================

mod routes {
    // ---
    use super::*;

    /// Location of the optional startup route document.
    #[derive(Debug, Clone)]
    pub struct RoutesConfig {
        /// Defaults to `data/routes.json`, relative to the working directory.
        pub seed_path: PathBuf,
    }

    impl RoutesConfig {
        pub fn from_env() -> Self {
            // ---
            Self {
                seed_path: PathBuf::from(optional_env!(
                    "SPACE_ROUTES_SEED_PATH",
                    "data/routes.json"
                )),
            }
        }
    }

    impl Default for RoutesConfig {
        fn default() -> Self {
            // ---
            Self {
                seed_path: PathBuf::from("data/routes.json"),
            }
        }
    }
}
pub use routes::RoutesConfig;

// ============================================================
// Tests
// ============================================================
