use super::Role;
use std::sync::Arc;

/// A login identity known to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl User {
    // ---
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        // ---
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// Source of login identities for `POST /api/auth/login`.
pub trait UserDirectory: Send + Sync {
    // ---
    /// Returns the user whose username and password both match exactly.
    fn authenticate(&self, username: &str, password: &str) -> Option<User>;
}

/// Type alias for any backend that implements UserDirectory.
pub type UserDirectoryPtr = Arc<dyn UserDirectory>;
