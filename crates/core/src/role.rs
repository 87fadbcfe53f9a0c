// Role domain type
//
// The role is the only authorization axis of the platform. There are no
// fine-grained permissions: every route either needs no role, any
// authenticated role, DJ (or above) or ADMIN.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// User role.
/// - `LISTENER`: default role for every new account
/// - `DJ`: can publish mixes and request upload signatures
/// - `ADMIN`: full access to the admin routes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Listener,
    Dj,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Listener => "LISTENER",
            Role::Dj => "DJ",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse a role string exactly as stored (`"LISTENER"`, `"DJ"`, `"ADMIN"`).
    /// Anything else, including lowercase variants, is not a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LISTENER" => Some(Role::Listener),
            "DJ" => Some(Role::Dj),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether a caller holding `self` may access a route requiring `required`.
    ///
    /// ADMIN is only satisfied by ADMIN. DJ is satisfied by DJ and ADMIN.
    /// LISTENER is satisfied by any role.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Admin => *self == Role::Admin,
            Role::Dj => matches!(self, Role::Dj | Role::Admin),
            Role::Listener => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("DJ"), Some(Role::Dj));
        assert_eq!(Role::parse("LISTENER"), Some(Role::Listener));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
        assert!("SUPERUSER".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_requires_exact_admin() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(!Role::Dj.satisfies(Role::Admin));
        assert!(!Role::Listener.satisfies(Role::Admin));
    }

    #[test]
    fn test_dj_and_listener_requirements() {
        assert!(Role::Dj.satisfies(Role::Dj));
        assert!(Role::Admin.satisfies(Role::Dj));
        assert!(!Role::Listener.satisfies(Role::Dj));
        assert!(Role::Listener.satisfies(Role::Listener));
    }

    #[test]
    fn test_role_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Dj).unwrap(), "\"DJ\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(Role::Listener.to_string(), "LISTENER");
    }
}
