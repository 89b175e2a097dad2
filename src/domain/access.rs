//! Role gate for route operations.
//!
//! Authentication happens before this point (token verification or API key
//! lookup). This module only answers whether an already-resolved role may
//! perform an operation.

use super::{Role, ServiceError};

/// Operations guarded by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // ---
    /// List routes or fetch one by name.
    ReadRoutes,
    /// Create, update or delete a route.
    WriteRoutes,
}

/// Applies the role table:
///
/// | Operation   | Required role |
/// |-------------|---------------|
/// | ReadRoutes  | any           |
/// | WriteRoutes | captain       |
pub fn authorize(role: Role, operation: Operation) -> Result<(), ServiceError> {
    // ---
    match (operation, role) {
        (Operation::ReadRoutes, _) => Ok(()),
        (Operation::WriteRoutes, Role::Captain) => Ok(()),
        (Operation::WriteRoutes, other) => Err(ServiceError::Forbidden(format!(
            "role '{other}' may not modify routes"
        ))),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn any_role_can_read() {
        assert!(authorize(Role::Cadet, Operation::ReadRoutes).is_ok());
        assert!(authorize(Role::Captain, Operation::ReadRoutes).is_ok());
    }

    #[test]
    fn only_captain_can_write() {
        // ---
        assert!(authorize(Role::Captain, Operation::WriteRoutes).is_ok());

        let err = authorize(Role::Cadet, Operation::WriteRoutes).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
