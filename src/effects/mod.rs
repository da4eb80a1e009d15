//! Post-commit side effects
//!
//! Notifications and cache invalidation run after a stage write has been
//! persisted. Operations enqueue them before returning; a background worker
//! applies them in order. A failing effect is logged and never reported back
//! to the operation that enqueued it.

mod cache;
mod notifier;

pub use cache::FeatureCache;
pub use notifier::{LogNotifier, Notifier};

use crate::error::AppError;
use crate::models::{Feature, Stage};
use crate::stages::ChangedField;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    InvalidateFeatureCache { key: String },
    NotifySubscribers { feature: Feature, changes: Vec<ChangedField> },
    TrialActionRequested { stage: Stage },
}

impl SideEffect {
    pub fn kind(&self) -> &'static str {
        match self {
            SideEffect::InvalidateFeatureCache { .. } => "invalidate_feature_cache",
            SideEffect::NotifySubscribers { .. } => "notify_subscribers",
            SideEffect::TrialActionRequested { .. } => "trial_action_requested",
        }
    }
}

pub trait SideEffectQueue: Send + Sync {
    fn enqueue(&self, effect: SideEffect) -> Result<(), AppError>;
}

struct Envelope {
    id: Uuid,
    enqueued_at: DateTime<Utc>,
    effect: SideEffect,
}

/// Channel-backed queue drained by a background worker
pub struct SideEffectDispatcher {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl SideEffectDispatcher {
    /// Start the worker. It exits once every dispatcher handle is dropped and
    /// the queue is drained.
    pub fn spawn(cache: Arc<FeatureCache>, notifier: Arc<dyn Notifier>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(rx, cache, notifier));
        (Self { tx }, worker)
    }
}

impl SideEffectQueue for SideEffectDispatcher {
    fn enqueue(&self, effect: SideEffect) -> Result<(), AppError> {
        let envelope = Envelope {
            id: Uuid::new_v4(),
            enqueued_at: Utc::now(),
            effect,
        };
        self.tx
            .send(envelope)
            .map_err(|e| AppError::Internal(format!("Side effect worker stopped, dropped {}", e.0.effect.kind())))
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Envelope>,
    cache: Arc<FeatureCache>,
    notifier: Arc<dyn Notifier>,
) {
    while let Some(envelope) = rx.recv().await {
        let result = match &envelope.effect {
            SideEffect::InvalidateFeatureCache { key } => {
                cache.invalidate(key).await;
                Ok(())
            }
            SideEffect::NotifySubscribers { feature, changes } => {
                notifier.notify_subscribers(feature, changes)
            }
            SideEffect::TrialActionRequested { stage } => notifier.notify_trial_action_requested(stage),
        };

        match result {
            Ok(()) => debug!(
                effect_id = %envelope.id,
                waited_ms = (Utc::now() - envelope.enqueued_at).num_milliseconds(),
                "Applied {}",
                envelope.effect.kind()
            ),
            Err(e) => warn!(
                effect_id = %envelope.id,
                "⚠️  {} failed: {}",
                envelope.effect.kind(),
                e
            ),
        }
    }
    debug!("Side effect worker stopped");
}

/// Queue that records effects instead of applying them
#[cfg(test)]
#[derive(Default)]
pub struct RecordingQueue {
    effects: std::sync::Mutex<Vec<SideEffect>>,
}

#[cfg(test)]
impl RecordingQueue {
    pub fn effects(&self) -> Vec<SideEffect> {
        self.effects.lock().unwrap().clone()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.effects().iter().filter(|e| e.kind() == kind).count()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<SideEffect> {
        std::mem::take(&mut *self.effects.lock().unwrap())
    }
}

#[cfg(test)]
impl SideEffectQueue for RecordingQueue {
    fn enqueue(&self, effect: SideEffect) -> Result<(), AppError> {
        self.effects.lock().unwrap().push(effect);
        Ok(())
    }
}
