//! Notification delivery
//!
//! Delivery itself belongs to the mail subsystem; the default notifier
//! records what would be sent in the log.

use crate::error::AppError;
use crate::models::{Feature, Stage};
use crate::stages::ChangedField;
use tracing::info;

pub trait Notifier: Send + Sync {
    /// Tell the feature's subscribers which fields changed
    fn notify_subscribers(&self, feature: &Feature, changes: &[ChangedField]) -> Result<(), AppError>;

    /// Acknowledge an origin trial action request on `stage`
    fn notify_trial_action_requested(&self, stage: &Stage) -> Result<(), AppError>;
}

/// Notifier that writes notifications to the tracing log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_subscribers(&self, feature: &Feature, changes: &[ChangedField]) -> Result<(), AppError> {
        if changes.is_empty() {
            return Ok(());
        }

        let fields: Vec<&str> = changes.iter().map(|c| c.form_field_name.as_str()).collect();
        info!(
            feature_id = feature.id,
            feature = %feature.name,
            fields = ?fields,
            "📧 Notifying subscribers of feature changes"
        );
        Ok(())
    }

    fn notify_trial_action_requested(&self, stage: &Stage) -> Result<(), AppError> {
        info!(
            feature_id = stage.feature_id,
            stage_id = stage.id,
            trial = stage.ot_display_name.as_deref().unwrap_or(""),
            "📧 Origin trial action requested"
        );
        Ok(())
    }
}
