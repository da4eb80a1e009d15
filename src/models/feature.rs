//! Feature model
//!
//! Features own stages. Only the attributes needed for edit permission and
//! gate policy are modelled here.

use crate::models::Stage;
use serde::{Deserialize, Serialize};

/// Parent entity of a stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feature {
    pub id: i64,
    pub name: String,
    /// Selects the process (and therefore the gates) the feature goes through
    pub feature_type: i32,
    pub creator_email: Option<String>,
    pub owner_emails: Vec<String>,
    pub editor_emails: Vec<String>,
}

impl Feature {
    pub fn new(name: impl Into<String>, feature_type: i32) -> Self {
        Self {
            name: name.into(),
            feature_type,
            ..Default::default()
        }
    }

    /// Key of the cached representation of a feature
    pub fn cache_key(namespace: &str, feature_id: i64) -> String {
        format!("{}|{}", namespace, feature_id)
    }

    /// Whether `email` is the creator, an owner or an editor of this feature
    pub fn is_collaborator(&self, email: &str) -> bool {
        let matches = |candidate: &String| candidate.eq_ignore_ascii_case(email);
        self.creator_email.as_ref().is_some_and(matches)
            || self.owner_emails.iter().any(matches)
            || self.editor_emails.iter().any(matches)
    }
}

/// Feature together with its live stages, as served and cached
#[derive(Debug, Clone, Serialize)]
pub struct FeatureView {
    #[serde(flatten)]
    pub feature: Feature,
    pub stages: Vec<Stage>,
}
