//! Feature edit permission
//!
//! Site editors and admins may edit any feature; everybody else needs to be
//! the feature's creator, one of its owners or one of its editors.

use crate::auth::Actor;
use crate::error::AppError;
use crate::models::Feature;

pub trait PermissionCheck: Send + Sync {
    fn validate_edit_permission(&self, actor: &Actor, feature: &Feature) -> Result<(), AppError>;
}

/// Default edit permission rules
pub struct FeatureEditPermission;

impl PermissionCheck for FeatureEditPermission {
    fn validate_edit_permission(&self, actor: &Actor, feature: &Feature) -> Result<(), AppError> {
        if actor.role.can_edit_any_feature() || feature.is_collaborator(&actor.email) {
            return Ok(());
        }

        Err(AppError::PermissionDenied(format!(
            "{} may not edit feature {}",
            actor.email, feature.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn feature() -> Feature {
        Feature {
            id: 42,
            owner_emails: vec!["owner@example.com".to_string()],
            ..Feature::new("Feature", 0)
        }
    }

    #[test]
    fn test_owner_may_edit() {
        let actor = Actor::new("owner@example.com", Role::User);
        assert!(FeatureEditPermission.validate_edit_permission(&actor, &feature()).is_ok());
    }

    #[test]
    fn test_site_editor_may_edit_any_feature() {
        let actor = Actor::new("someone@example.com", Role::Editor);
        assert!(FeatureEditPermission.validate_edit_permission(&actor, &feature()).is_ok());
    }

    #[test]
    fn test_stranger_is_denied() {
        let actor = Actor::new("stranger@example.com", Role::User);
        let err = FeatureEditPermission
            .validate_edit_permission(&actor, &feature())
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied(_)));
    }
}
