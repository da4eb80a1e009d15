//! Field mutation engine
//!
//! Applies a partial update payload to a stage and its milestone set,
//! producing the audit log of what changed.

use crate::error::AppError;
use crate::models::{MilestoneSet, Stage};
use crate::stages::schema::{FieldSpec, MILESTONE_FIELDS, OT_ACTION_REQUESTED, STAGE_FIELDS};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Requested change of one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Name recorded in the audit log; defaults to the field name
    pub form_field_name: Option<String>,
    pub value: Value,
}

impl FieldChange {
    /// Reads `{"form_field_name": .., "value": ..}`; anything else is a bare value
    fn from_json(raw: Value) -> Self {
        match raw {
            Value::Object(mut obj) if obj.contains_key("value") => Self {
                form_field_name: obj
                    .remove("form_field_name")
                    .and_then(|name| name.as_str().map(str::to_string)),
                value: obj.remove("value").unwrap_or(Value::Null),
            },
            value => Self {
                form_field_name: None,
                value,
            },
        }
    }

    fn form_field_name<T>(&self, spec: &FieldSpec<T>) -> String {
        self.form_field_name
            .clone()
            .unwrap_or_else(|| spec.form_field_name().to_string())
    }
}

/// Partial update keyed by field name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ChangePayload {
    changes: HashMap<String, FieldChange>,
    trial_action_requested: bool,
}

impl From<Map<String, Value>> for ChangePayload {
    fn from(body: Map<String, Value>) -> Self {
        let trial_action_requested = body.get(OT_ACTION_REQUESTED).is_some_and(is_request);
        Self {
            changes: body
                .into_iter()
                .map(|(field, raw)| (field, FieldChange::from_json(raw)))
                .collect(),
            trial_action_requested,
        }
    }
}

/// A wrapped change always counts as a request; a bare value only when it is true
fn is_request(raw: &Value) -> bool {
    match raw {
        Value::Object(_) => true,
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

impl ChangePayload {
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.changes.get(field)
    }

    /// Whether the payload asks for an origin trial action
    pub fn requests_trial_action(&self) -> bool {
        self.trial_action_requested
    }
}

/// Audit record of one mutated field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangedField {
    pub form_field_name: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// Result of applying a payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationOutcome {
    pub updated: bool,
    pub changes: Vec<ChangedField>,
    /// The trial action marker field was part of the update
    pub ot_action_requested: bool,
}

impl MutationOutcome {
    fn record(&mut self, form_field_name: String, old_value: Value, new_value: Value) {
        self.changes.push(ChangedField {
            form_field_name,
            old_value,
            new_value,
        });
        self.updated = true;
    }
}

/// Apply `payload` to `stage` in memory.
///
/// Only fields declared in the schema are considered; other payload keys are
/// ignored. On error the stage may be partially written and must not be
/// persisted.
pub fn apply_changes(stage: &mut Stage, payload: &ChangePayload) -> Result<MutationOutcome, AppError> {
    let mut outcome = MutationOutcome::default();

    for spec in STAGE_FIELDS.iter() {
        let Some(change) = payload.get(spec.name) else {
            continue;
        };
        let form_field_name = change.form_field_name(spec);
        if form_field_name == OT_ACTION_REQUESTED && payload.requests_trial_action() {
            outcome.ot_action_requested = true;
        }
        let old_value = spec.read(stage);
        let new_value = spec.write(stage, &change.value)?;
        outcome.record(form_field_name, old_value, new_value);
    }

    for spec in MILESTONE_FIELDS.iter() {
        let Some(change) = payload.get(spec.name) else {
            continue;
        };
        let milestones = stage.milestones.get_or_insert_with(MilestoneSet::default);
        let old_value = spec.read(milestones);
        let new_value = spec.write(milestones, &change.value)?;
        outcome.record(change.form_field_name(spec), old_value, new_value);
    }

    Ok(outcome)
}

/// Apply `payload` and persist the stage once if anything changed
pub async fn apply_and_persist<S: EntityStore>(
    store: &S,
    mut stage: Stage,
    payload: &ChangePayload,
) -> Result<(Stage, MutationOutcome), AppError> {
    let outcome = apply_changes(&mut stage, payload)?;
    if outcome.updated {
        stage = store.put_stage(stage).await?;
    }
    Ok((stage, outcome))
}
