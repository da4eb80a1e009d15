//! Stage lifecycle
//!
//! Create, read, update and archive operations on stages. Every operation
//! receives the acting user explicitly; nothing is looked up from ambient
//! request state.

use crate::auth::{Actor, PermissionCheck};
use crate::effects::{SideEffect, SideEffectQueue};
use crate::error::{invalid_input, AppError};
use crate::models::{Feature, Gate, Stage, StageView};
use crate::stages::mutation::{self, apply_changes, ChangePayload, MutationOutcome};
use crate::stages::policy::GatePolicy;
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Body of a create request: the stage type plus optional initial values
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NewStage {
    pub stage_type: Option<Value>,
    pub fields: ChangePayload,
}

impl From<Map<String, Value>> for NewStage {
    fn from(mut body: Map<String, Value>) -> Self {
        let stage_type = body.remove("stage_type");
        Self {
            stage_type,
            fields: ChangePayload::from(body),
        }
    }
}

impl NewStage {
    fn parse_stage_type(&self) -> Result<i32, AppError> {
        let raw = self
            .stage_type
            .as_ref()
            .filter(|v| !v.is_null())
            .ok_or_else(|| invalid_input("Stage type not specified."))?;

        let parsed = match raw {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| invalid_input(format!("Invalid stage type: {}", raw)))
    }
}

/// Result of a create operation
#[derive(Debug, Clone, Serialize)]
pub struct CreatedStage {
    pub stage: Stage,
    pub gate: Option<Gate>,
}

pub struct StageService<S> {
    store: S,
    policy: GatePolicy,
    permissions: Arc<dyn PermissionCheck>,
    effects: Arc<dyn SideEffectQueue>,
    trusted_domains: Vec<String>,
    cache_namespace: String,
}

impl<S: EntityStore> StageService<S> {
    pub fn new(
        store: S,
        policy: GatePolicy,
        permissions: Arc<dyn PermissionCheck>,
        effects: Arc<dyn SideEffectQueue>,
    ) -> Self {
        Self {
            store,
            policy,
            permissions,
            effects,
            trusted_domains: Vec::new(),
            cache_namespace: "featureentry".to_string(),
        }
    }

    /// Account domains whose users may request trial actions without edit access
    pub fn with_trusted_domains(mut self, domains: Vec<String>) -> Self {
        self.trusted_domains = domains;
        self
    }

    pub fn with_cache_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.cache_namespace = namespace.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache_key(&self, feature_id: i64) -> String {
        Feature::cache_key(&self.cache_namespace, feature_id)
    }

    /// Create a stage on `feature_id`, and its gate when the policy asks for one
    pub async fn create(
        &self,
        actor: &Actor,
        feature_id: i64,
        request: NewStage,
    ) -> Result<CreatedStage, AppError> {
        debug!("Creating stage on feature {}", feature_id);

        let feature = self
            .store
            .get_feature(feature_id)
            .await?
            .ok_or(AppError::FeatureNotFound(feature_id))?;

        self.permissions.validate_edit_permission(actor, &feature)?;

        let stage_type = request.parse_stage_type()?;
        let mut stage = Stage::new(feature.id, stage_type);
        // Initial values are part of the first write, not an audited change
        apply_changes(&mut stage, &request.fields)?;

        let gate_type = self.policy.resolve(feature.feature_type, stage.stage_type);
        let (stage, gate) = self.store.create_stage(stage, gate_type).await?;

        info!(
            "Stage {} created on feature {} (type {}, gate {:?})",
            stage.id,
            feature.id,
            stage.stage_type,
            gate.as_ref().map(|g| g.gate_type)
        );

        self.dispatch(SideEffect::InvalidateFeatureCache {
            key: self.cache_key(feature.id),
        });

        Ok(CreatedStage { stage, gate })
    }

    /// Stage view including its extension stages
    pub async fn get(&self, stage_id: i64) -> Result<StageView, AppError> {
        let stage = self.load_stage(stage_id).await?;
        let extensions = self.store.extensions_for_stage(stage.id).await?;
        Ok(StageView::new(stage, extensions))
    }

    /// Apply `payload` to the stage; returns what changed
    pub async fn update(
        &self,
        actor: &Actor,
        stage_id: i64,
        payload: &ChangePayload,
    ) -> Result<MutationOutcome, AppError> {
        debug!("Updating stage {}", stage_id);

        let stage = self.load_stage(stage_id).await?;
        let feature = self.load_owning_feature(&stage).await?;

        // Trial action requests from trusted accounts skip the edit check
        let trusted_trial_request =
            payload.requests_trial_action() && actor.in_domains(&self.trusted_domains);
        if !trusted_trial_request {
            self.permissions.validate_edit_permission(actor, &feature)?;
        }

        let (stage, outcome) = mutation::apply_and_persist(&self.store, stage, payload).await?;

        if outcome.updated {
            info!(
                "Stage {} updated by {} ({} fields)",
                stage.id,
                actor.email,
                outcome.changes.len()
            );
            self.dispatch(SideEffect::NotifySubscribers {
                feature: feature.clone(),
                changes: outcome.changes.clone(),
            });
            self.dispatch(SideEffect::InvalidateFeatureCache {
                key: self.cache_key(feature.id),
            });
        }

        if outcome.ot_action_requested {
            self.dispatch(SideEffect::TrialActionRequested { stage });
        }

        Ok(outcome)
    }

    /// Soft-delete a stage
    pub async fn archive(&self, actor: &Actor, stage_id: i64) -> Result<(), AppError> {
        debug!("Archiving stage {}", stage_id);

        let mut stage = self.load_stage(stage_id).await?;
        let feature = self.load_owning_feature(&stage).await?;
        self.permissions.validate_edit_permission(actor, &feature)?;

        stage.archived = true;
        let stage = self.store.put_stage(stage).await?;

        info!("Stage {} archived by {}", stage.id, actor.email);
        Ok(())
    }

    async fn load_stage(&self, stage_id: i64) -> Result<Stage, AppError> {
        if stage_id == 0 {
            return Err(AppError::MissingStageId);
        }
        self.store
            .get_stage(stage_id)
            .await?
            .ok_or(AppError::StageNotFound(stage_id))
    }

    async fn load_owning_feature(&self, stage: &Stage) -> Result<Feature, AppError> {
        self.store
            .get_feature(stage.feature_id)
            .await?
            .ok_or(AppError::InconsistentReference {
                stage_id: stage.id,
                feature_id: stage.feature_id,
            })
    }

    fn dispatch(&self, effect: SideEffect) {
        let kind = effect.kind();
        if let Err(e) = self.effects.enqueue(effect) {
            warn!("⚠️  Could not enqueue {}: {}", kind, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{FeatureEditPermission, Role};
    use crate::effects::RecordingQueue;
    use crate::models::GateState;
    use crate::stages::policy::{feature_types, gate_types, stage_types};
    use crate::stages::ChangedField;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const OWNER: &str = "owner@example.com";

    struct Harness {
        service: StageService<MemoryStore>,
        effects: Arc<RecordingQueue>,
    }

    fn harness_with_policy(policy: GatePolicy) -> Harness {
        let effects = Arc::new(RecordingQueue::default());
        let service = StageService::new(
            MemoryStore::new(),
            policy,
            Arc::new(FeatureEditPermission),
            effects.clone(),
        )
        .with_trusted_domains(vec!["chromium.org".to_string(), "google.com".to_string()]);
        Harness { service, effects }
    }

    fn harness() -> Harness {
        harness_with_policy(GatePolicy::standard())
    }

    fn owner() -> Actor {
        Actor::new(OWNER, Role::User)
    }

    async fn seed_feature(h: &Harness, id: i64, feature_type: i32) -> Feature {
        let feature = Feature {
            id,
            owner_emails: vec![OWNER.to_string()],
            ..Feature::new("Feature", feature_type)
        };
        h.service.store().put_feature(feature).await.unwrap()
    }

    fn new_stage(body: Value) -> NewStage {
        serde_json::from_value(body).unwrap()
    }

    fn payload(body: Value) -> ChangePayload {
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_create_with_policy_gate() {
        let h = harness_with_policy(GatePolicy::from_entries([(1, 2, 5)]));
        seed_feature(&h, 42, 1).await;

        let created = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 2})))
            .await
            .unwrap();

        assert_eq!(created.stage.feature_id, 42);
        assert_eq!(created.stage.stage_type, 2);
        assert!(!created.stage.archived);

        let gate = created.gate.expect("policy maps (1, 2) to a gate");
        assert_eq!(gate.feature_id, 42);
        assert_eq!(gate.stage_id, created.stage.id);
        assert_eq!(gate.gate_type, 5);
        assert_eq!(gate.state, GateState::Preparing);

        let stored = h.service.store().gates_for_stage(created.stage.id).await.unwrap();
        assert_eq!(stored, vec![gate]);
    }

    #[tokio::test]
    async fn test_create_every_standard_mapping_yields_one_gate() {
        let h = harness();
        let cases = [
            (feature_types::INCUBATE, stage_types::BLINK_PROTOTYPE, gate_types::API_PROTOTYPE),
            (feature_types::EXISTING, stage_types::FAST_ORIGIN_TRIAL, gate_types::API_ORIGIN_TRIAL),
            (feature_types::CODE_CHANGE, stage_types::PSA_SHIPPING, gate_types::API_SHIP),
            (feature_types::DEPRECATION, stage_types::DEP_PLAN, gate_types::API_PLAN),
        ];

        for (i, (feature_type, stage_type, gate_type)) in cases.into_iter().enumerate() {
            let feature = seed_feature(&h, 100 + i as i64, feature_type).await;
            let created = h
                .service
                .create(&owner(), feature.id, new_stage(json!({"stage_type": stage_type})))
                .await
                .unwrap();

            let gates = h.service.store().gates_for_stage(created.stage.id).await.unwrap();
            assert_eq!(gates.len(), 1);
            assert_eq!(gates[0].gate_type, gate_type);
            assert_eq!(gates[0].feature_id, feature.id);
        }
    }

    #[tokio::test]
    async fn test_create_without_policy_gate() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;

        // Dev trial stages have no gate
        let created = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": "130"})))
            .await
            .unwrap();

        assert!(created.gate.is_none());
        assert!(h
            .service
            .store()
            .gates_for_stage(created.stage.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_create_invalidates_feature_cache() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;

        h.service
            .create(&owner(), 42, new_stage(json!({"stage_type": 160})))
            .await
            .unwrap();

        assert_eq!(
            h.effects.effects(),
            vec![SideEffect::InvalidateFeatureCache {
                key: "featureentry|42".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_create_requires_feature() {
        let h = harness();
        let err = h
            .service
            .create(&owner(), 404, new_stage(json!({"stage_type": 160})))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FeatureNotFound(404)));
    }

    #[tokio::test]
    async fn test_create_permission_checked_before_stage_type() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stranger = Actor::new("stranger@example.com", Role::User);

        let err = h
            .service
            .create(&stranger, 42, new_stage(json!({})))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(h.effects.effects().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_or_bad_stage_type() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;

        for body in [json!({}), json!({"stage_type": null}), json!({"stage_type": "soon"})] {
            let err = h.service.create(&owner(), 42, new_stage(body)).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_create_then_read_round_trips_fields() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;

        let created = h
            .service
            .create(
                &owner(),
                42,
                new_stage(json!({
                    "stage_type": 150,
                    "display_name": {"form_field_name": "display_name", "value": "First trial"},
                    "ot_emails": ["a@example.com"],
                    "desktop_first": 118,
                    "not_a_field": "ignored",
                })),
            )
            .await
            .unwrap();

        let view = h.service.get(created.stage.id).await.unwrap();

        assert_eq!(view.stage, created.stage);
        assert_eq!(view.stage.display_name.as_deref(), Some("First trial"));
        assert_eq!(view.stage.ot_emails, vec!["a@example.com".to_string()]);
        assert_eq!(view.stage.milestones.as_ref().and_then(|m| m.desktop_first), Some(118));
        assert!(view.extensions.is_none());
    }

    #[tokio::test]
    async fn test_read_includes_extensions() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let trial = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let extension = h
            .service
            .create(
                &owner(),
                42,
                new_stage(json!({"stage_type": 151, "ot_stage_id": trial.id})),
            )
            .await
            .unwrap()
            .stage;

        let view = h.service.get(trial.id).await.unwrap();

        assert_eq!(view.extensions, Some(vec![extension]));
    }

    #[tokio::test]
    async fn test_read_missing_stage() {
        let h = harness();
        assert!(matches!(h.service.get(0).await, Err(AppError::MissingStageId)));
        assert!(matches!(h.service.get(77).await, Err(AppError::StageNotFound(77))));
    }

    #[tokio::test]
    async fn test_update_without_known_fields_is_a_no_op() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let effects_after_create = h.effects.effects().len();

        let outcome = h
            .service
            .update(&owner(), stage.id, &payload(json!({"unknown": {"value": 1}})))
            .await
            .unwrap();

        assert!(!outcome.updated);
        assert_eq!(h.service.get(stage.id).await.unwrap().stage, stage);
        assert_eq!(h.effects.effects().len(), effects_after_create);
    }

    #[tokio::test]
    async fn test_update_notifies_and_invalidates() {
        let h = harness();
        let feature = seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;

        let outcome = h
            .service
            .update(
                &owner(),
                stage.id,
                &payload(json!({
                    "ot_display_name": {"form_field_name": "ot_display_name", "value": "Trial"},
                })),
            )
            .await
            .unwrap();

        assert!(outcome.updated);
        let effects = h.effects.effects();
        assert_eq!(
            effects[1..].to_vec(),
            vec![
                SideEffect::NotifySubscribers {
                    feature,
                    changes: vec![ChangedField {
                        form_field_name: "ot_display_name".to_string(),
                        old_value: Value::Null,
                        new_value: json!("Trial"),
                    }],
                },
                SideEffect::InvalidateFeatureCache {
                    key: "featureentry|42".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_milestone_on_stage_without_milestones() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 160})))
            .await
            .unwrap()
            .stage;
        assert!(stage.milestones.is_none());

        let outcome = h
            .service
            .update(
                &owner(),
                stage.id,
                &payload(json!({"desktop_first": {"form_field_name": "desktop_first", "value": 120}})),
            )
            .await
            .unwrap();

        assert!(outcome.updated);
        assert_eq!(
            outcome.changes,
            vec![ChangedField {
                form_field_name: "desktop_first".to_string(),
                old_value: Value::Null,
                new_value: json!(120),
            }]
        );
        let stored = h.service.get(stage.id).await.unwrap().stage;
        assert_eq!(stored.milestones.and_then(|m| m.desktop_first), Some(120));
    }

    #[tokio::test]
    async fn test_trial_request_sends_exactly_one_dedicated_notification() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;

        h.service
            .update(
                &owner(),
                stage.id,
                &payload(json!({
                    "ot_action_requested": {"form_field_name": "ot_action_requested", "value": true},
                    "ot_display_name": {"form_field_name": "ot_display_name", "value": "Trial"},
                    "ot_owner_email": {"form_field_name": "ot_owner_email", "value": OWNER},
                    "ot_emails": {"form_field_name": "ot_emails", "value": [OWNER]},
                })),
            )
            .await
            .unwrap();

        assert_eq!(h.effects.count("trial_action_requested"), 1);
        assert_eq!(h.effects.count("notify_subscribers"), 1);
    }

    #[tokio::test]
    async fn test_trusted_domain_may_request_trial_without_edit_access() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let trusted = Actor::new("dev@chromium.org", Role::User);

        let outcome = h
            .service
            .update(
                &trusted,
                stage.id,
                &payload(json!({"ot_action_requested": {"form_field_name": "ot_action_requested", "value": true}})),
            )
            .await
            .unwrap();

        assert!(outcome.ot_action_requested);
        assert!(h.service.get(stage.id).await.unwrap().stage.ot_action_requested);
    }

    #[tokio::test]
    async fn test_trusted_domain_needs_edit_access_for_other_updates() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let trusted = Actor::new("dev@google.com", Role::User);

        let err = h
            .service
            .update(&trusted, stage.id, &payload(json!({"display_name": "Renamed"})))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_declined_trial_marker_does_not_skip_edit_check() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let trusted = Actor::new("random@chromium.org", Role::User);
        let before = h.effects.effects().len();

        for marker in [json!(false), Value::Null] {
            let err = h
                .service
                .update(
                    &trusted,
                    stage.id,
                    &payload(json!({"ot_action_requested": marker, "display_name": "hijacked"})),
                )
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::PermissionDenied(_)));
        }

        assert_eq!(h.service.get(stage.id).await.unwrap().stage, stage);
        assert_eq!(h.effects.effects().len(), before);
    }

    #[tokio::test]
    async fn test_owner_declining_trial_action_sends_no_trial_notification() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;

        let outcome = h
            .service
            .update(
                &owner(),
                stage.id,
                &payload(json!({"ot_action_requested": false, "display_name": "Trial"})),
            )
            .await
            .unwrap();

        assert!(outcome.updated);
        assert!(!outcome.ot_action_requested);
        assert_eq!(h.effects.count("trial_action_requested"), 0);
        assert_eq!(h.effects.count("notify_subscribers"), 1);
    }

    #[tokio::test]
    async fn test_untrusted_trial_request_needs_edit_access() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let outsider = Actor::new("dev@example.org", Role::User);

        let err = h
            .service
            .update(
                &outsider,
                stage.id,
                &payload(json!({"ot_action_requested": {"form_field_name": "ot_action_requested", "value": true}})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(!h.service.get(stage.id).await.unwrap().stage.ot_action_requested);
    }

    #[tokio::test]
    async fn test_update_with_dangling_feature_is_inconsistent() {
        let h = harness();
        let orphan = h.service.store().put_stage(Stage::new(999, 150)).await.unwrap();

        let err = h
            .service
            .update(&owner(), orphan.id, &payload(json!({"display_name": "x"})))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::InconsistentReference { feature_id: 999, .. }
        ));
    }

    #[tokio::test]
    async fn test_invalid_value_is_rejected_without_side_effects() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;
        let before = h.effects.effects().len();

        let err = h
            .service
            .update(
                &owner(),
                stage.id,
                &payload(json!({"display_name": "Renamed", "rollout_milestone": "later"})),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFieldValue { .. }));
        assert_eq!(h.service.get(stage.id).await.unwrap().stage, stage);
        assert_eq!(h.effects.effects().len(), before);
    }

    #[tokio::test]
    async fn test_archive_keeps_record_and_is_quiet() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let created = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap();
        let before = h.effects.effects().len();

        h.service.archive(&owner(), created.stage.id).await.unwrap();

        let view = h.service.get(created.stage.id).await.unwrap();
        assert!(view.stage.archived);
        assert_eq!(h.effects.effects().len(), before);
        // The gate is left alone
        let gates = h.service.store().gates_for_stage(created.stage.id).await.unwrap();
        assert_eq!(gates, vec![created.gate.unwrap()]);
    }

    #[tokio::test]
    async fn test_archive_requires_permission() {
        let h = harness();
        seed_feature(&h, 42, feature_types::INCUBATE).await;
        let stage = h
            .service
            .create(&owner(), 42, new_stage(json!({"stage_type": 150})))
            .await
            .unwrap()
            .stage;

        let err = h
            .service
            .archive(&Actor::new("dev@chromium.org", Role::User), stage.id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PermissionDenied(_)));
        assert!(!h.service.get(stage.id).await.unwrap().stage.archived);
    }

    #[tokio::test]
    async fn test_archive_missing_stage() {
        let h = harness();
        assert!(matches!(
            h.service.archive(&owner(), 5).await,
            Err(AppError::StageNotFound(5))
        ));
    }
}
