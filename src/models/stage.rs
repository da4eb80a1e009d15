//! Stage models
//!
//! A stage is one process step of a feature. Which of its fields are
//! meaningful depends on `stage_type`; the field registry in
//! `crate::stages::schema` decides which ones callers may write.

use serde::{Deserialize, Serialize};

/// Milestone markers of a stage, embedded in the stage record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilestoneSet {
    pub desktop_first: Option<i64>,
    pub desktop_last: Option<i64>,
    pub android_first: Option<i64>,
    pub android_last: Option<i64>,
    pub ios_first: Option<i64>,
    pub ios_last: Option<i64>,
    pub webview_first: Option<i64>,
    pub webview_last: Option<i64>,
}

/// Stored stage record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    /// Zero until the store assigns an id
    pub id: i64,
    pub feature_id: i64,
    pub stage_type: i32,
    pub archived: bool,

    pub display_name: Option<String>,
    /// Origin trial stage this stage extends
    pub ot_stage_id: Option<i64>,
    pub pm_emails: Vec<String>,
    pub tl_emails: Vec<String>,
    pub ux_emails: Vec<String>,
    pub te_emails: Vec<String>,
    pub intent_thread_url: Option<String>,
    pub announcement_url: Option<String>,

    pub experiment_goals: Option<String>,
    pub experiment_risks: Option<String>,
    pub experiment_extension_reason: Option<String>,

    pub origin_trial_id: Option<String>,
    pub origin_trial_feedback_url: Option<String>,
    pub ot_action_requested: bool,
    pub ot_approval_buganizer_component: Option<i64>,
    pub ot_approval_criteria_url: Option<String>,
    pub ot_approval_group_email: Option<String>,
    pub ot_chromium_trial_name: Option<String>,
    pub ot_description: Option<String>,
    pub ot_display_name: Option<String>,
    pub ot_documentation_url: Option<String>,
    pub ot_emails: Vec<String>,
    pub ot_feedback_submission_url: Option<String>,
    pub ot_has_third_party_support: bool,
    pub ot_is_critical_trial: bool,
    pub ot_is_deprecation_trial: bool,
    pub ot_owner_email: Option<String>,
    pub ot_require_approvals: bool,
    pub ot_request_note: Option<String>,
    pub ot_webfeature_use_counter: Option<String>,

    pub rollout_milestone: Option<i64>,
    pub rollout_platforms: Vec<String>,
    pub rollout_details: Option<String>,
    pub rollout_impact: Option<i64>,
    pub enterprise_policies: Vec<String>,

    pub milestones: Option<MilestoneSet>,
}

impl Stage {
    pub fn new(feature_id: i64, stage_type: i32) -> Self {
        Self {
            feature_id,
            stage_type,
            ..Default::default()
        }
    }
}

/// Externally visible representation of a stage
#[derive(Debug, Clone, Serialize)]
pub struct StageView {
    #[serde(flatten)]
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<Stage>>,
}

impl StageView {
    /// Builds the view, leaving `extensions` out when there are none
    pub fn new(stage: Stage, extensions: Vec<Stage>) -> Self {
        Self {
            stage,
            extensions: (!extensions.is_empty()).then_some(extensions),
        }
    }
}
