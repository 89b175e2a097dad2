//! Bearer token signing and verification.
//!
//! Tokens are HS256 JWTs carrying the username (`sub`) and role (`role`).
//! Lifetime, issuer, audience and secret come from [`JwtConfig`].

use crate::config::JwtConfig;
use crate::domain::{Role, ServiceError, User};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// Role name; rejected on verification unless it is a known [`Role`].
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// A signed token and the moment it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity and role recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub username: String,
    pub role: Role,
}

// ---

pub struct TokenService {
    // ---
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .field("expires_in_hours", &self.config.expires_in_hours)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    // ---
    pub fn new(config: JwtConfig) -> Self {
        // ---
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Signs a token for `user` valid for the configured number of hours.
    ///
    /// # Errors
    /// Returns an error if the configured lifetime does not fit the
    /// calendar or the claims cannot be encoded.
    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        // ---
        let now = Utc::now();
        let expires_at = Duration::try_hours(self.config.expires_in_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "token lifetime of {} hours is out of range",
                    self.config.expires_in_hours
                )
            })?;

        let claims = Claims {
            sub: user.username.clone(),
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature, expiry, issuer and audience, then resolves the role.
    ///
    /// # Errors
    /// Returns [`ServiceError::Unauthorized`] for any invalid token, including
    /// one whose role claim is not a known role.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, ServiceError> {
        // ---
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            // ---
            tracing::debug!("Rejected bearer token: {}", e);
            ServiceError::Unauthorized("Invalid or expired token.".to_string())
        })?;

        let role = data.claims.role.parse::<Role>().map_err(|_| {
            // ---
            tracing::debug!("Bearer token carries unknown role: {}", data.claims.role);
            ServiceError::Unauthorized("Invalid or expired token.".to_string())
        })?;

        Ok(VerifiedToken {
            username: data.claims.sub,
            role,
        })
    }
}
