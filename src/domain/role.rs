use super::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two roles known to the service.
///
/// Unrecognised role strings are rejected with [`ServiceError::InvalidRole`],
/// never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    // ---
    Cadet,
    Captain,
}

impl Role {
    // ---
    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            Role::Cadet => "cadet",
            Role::Captain => "captain",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        match s {
            "cadet" => Ok(Role::Cadet),
            "captain" => Ok(Role::Captain),
            other => Err(ServiceError::InvalidRole(other.to_string())),
        }
    }
}
