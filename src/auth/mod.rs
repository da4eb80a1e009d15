//! Authentication and authorization module
//!
//! Resolves the acting user from a JWT bearer token and decides whether that
//! user may edit a feature.

mod jwt;
mod middleware;
mod permissions;

pub use jwt::{decode_token, Claims};
pub use middleware::auth_middleware;
pub use permissions::{FeatureEditPermission, PermissionCheck};

use serde::{Deserialize, Serialize};

/// Site-wide user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can edit the features they own or collaborate on
    User,
    /// Can edit any feature
    Editor,
    /// Can edit any feature and administer the site
    Admin,
}

impl Role {
    pub fn can_edit_any_feature(&self) -> bool {
        matches!(self, Role::Editor | Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Editor => write!(f, "editor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated user an operation runs on behalf of
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    /// Whether the actor's account belongs to one of `domains`
    pub fn in_domains(&self, domains: &[String]) -> bool {
        let email = self.email.to_ascii_lowercase();
        domains.iter().any(|domain| {
            let domain = domain.trim_start_matches('@').to_ascii_lowercase();
            email.ends_with(&format!("@{}", domain))
        })
    }
}

impl From<Claims> for Actor {
    fn from(claims: Claims) -> Self {
        Actor::new(claims.sub, claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_domains_matches_whole_domain() {
        let domains = vec!["chromium.org".to_string(), "@google.com".to_string()];

        assert!(Actor::new("dev@chromium.org", Role::User).in_domains(&domains));
        assert!(Actor::new("Dev@Google.com", Role::User).in_domains(&domains));
        assert!(!Actor::new("dev@notchromium.org", Role::User).in_domains(&domains));
        assert!(!Actor::new("dev@chromium.org.evil", Role::User).in_domains(&domains));
    }

    #[test]
    fn test_role_capabilities() {
        assert!(!Role::User.can_edit_any_feature());
        assert!(Role::Editor.can_edit_any_feature());
        assert!(Role::Admin.can_edit_any_feature());
        assert_eq!(Role::default(), Role::User);
    }
}
