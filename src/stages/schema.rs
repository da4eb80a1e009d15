//! Field schema registry
//!
//! Typed tables of the fields callers may write on a stage and on its
//! milestone set. Each entry pairs a declared type with a getter and a setter
//! generated at compile time, so updates never touch attributes by name at
//! runtime.

use crate::error::{invalid_field, AppError};
use crate::models::{MilestoneSet, Stage};
use once_cell::sync::Lazy;
use serde_json::Value;
use validator::{ValidateEmail, ValidateUrl};

/// Form field name that marks an origin trial action request
pub const OT_ACTION_REQUESTED: &str = "ot_action_requested";

/// Declared data type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Str,
    Link,
    Bool,
    Emails,
    SplitStr,
}

impl FieldType {
    /// Coerce a raw payload value into the canonical JSON form of this type.
    ///
    /// `null` (and an empty string for scalar types) clears the field.
    pub fn coerce(&self, field: &str, raw: &Value) -> Result<Value, AppError> {
        match self {
            FieldType::Int => coerce_int(field, raw),
            FieldType::Str => Ok(coerce_text(field, raw)?.map_or(Value::Null, Value::String)),
            FieldType::Link => match coerce_text(field, raw)? {
                Some(link) if !link.validate_url() => {
                    Err(invalid_field(field, format!("'{}' is not a valid URL", link)))
                }
                link => Ok(link.map_or(Value::Null, Value::String)),
            },
            FieldType::Bool => coerce_bool(field, raw),
            FieldType::Emails => {
                let emails = coerce_list(field, raw)?;
                if let Some(bad) = emails.iter().find(|email| !email.validate_email()) {
                    return Err(invalid_field(
                        field,
                        format!("'{}' is not a valid email address", bad),
                    ));
                }
                Ok(Value::from(emails))
            }
            FieldType::SplitStr => Ok(Value::from(coerce_list(field, raw)?)),
        }
    }
}

fn coerce_int(field: &str, raw: &Value) -> Result<Value, AppError> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::Number(n) => n
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| invalid_field(field, format!("{} is not an integer", n))),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Null),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid_field(field, format!("'{}' is not an integer", s))),
        _ => Err(invalid_field(field, "expected an integer")),
    }
}

fn coerce_text(field: &str, raw: &Value) -> Result<Option<String>, AppError> {
    match raw {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(invalid_field(field, "expected a string")),
    }
}

fn coerce_bool(field: &str, raw: &Value) -> Result<Value, AppError> {
    match raw {
        Value::Null => Ok(Value::Bool(false)),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
        _ => Err(invalid_field(field, "expected a boolean")),
    }
}

/// Lists arrive either as JSON arrays or as comma separated strings
fn coerce_list(field: &str, raw: &Value) -> Result<Vec<String>, AppError> {
    let items = match raw {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').map(|item| item.trim().to_string()).collect(),
        Value::Array(values) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|item| item.trim().to_string())
                    .ok_or_else(|| invalid_field(field, "list entries must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(invalid_field(field, "expected a list of strings")),
    };

    Ok(items.into_iter().filter(|item| !item.is_empty()).collect())
}

/// One writable field of `T`
pub struct FieldSpec<T> {
    pub name: &'static str,
    pub field_type: FieldType,
    getter: fn(&T) -> Value,
    setter: fn(&mut T, Value) -> Result<(), serde_json::Error>,
}

impl<T> FieldSpec<T> {
    /// Name used for this field in audit records unless the caller supplies one
    pub fn form_field_name(&self) -> &'static str {
        self.name
    }

    /// Current value in its JSON form
    pub fn read(&self, target: &T) -> Value {
        (self.getter)(target)
    }

    /// Coerce `raw`, store it and return the value actually written
    pub fn write(&self, target: &mut T, raw: &Value) -> Result<Value, AppError> {
        let value = self.field_type.coerce(self.name, raw)?;
        (self.setter)(target, value.clone()).map_err(|e| invalid_field(self.name, e.to_string()))?;
        Ok(value)
    }
}

macro_rules! field {
    ($target:ty, $name:ident, $field_type:ident) => {
        FieldSpec::<$target> {
            name: stringify!($name),
            field_type: FieldType::$field_type,
            getter: |target: &$target| serde_json::to_value(&target.$name).unwrap_or(Value::Null),
            setter: |target: &mut $target, value: Value| -> Result<(), serde_json::Error> {
                target.$name = serde_json::from_value(value)?;
                Ok(())
            },
        }
    };
}

/// Stage-level fields, in update order
pub static STAGE_FIELDS: Lazy<Vec<FieldSpec<Stage>>> = Lazy::new(|| {
    vec![
        field!(Stage, display_name, Str),
        field!(Stage, ot_stage_id, Int),
        field!(Stage, pm_emails, Emails),
        field!(Stage, tl_emails, Emails),
        field!(Stage, ux_emails, Emails),
        field!(Stage, te_emails, Emails),
        field!(Stage, intent_thread_url, Link),
        field!(Stage, announcement_url, Link),
        field!(Stage, experiment_goals, Str),
        field!(Stage, experiment_risks, Str),
        field!(Stage, experiment_extension_reason, Str),
        field!(Stage, origin_trial_id, Str),
        field!(Stage, origin_trial_feedback_url, Link),
        field!(Stage, ot_action_requested, Bool),
        field!(Stage, ot_approval_buganizer_component, Int),
        field!(Stage, ot_approval_criteria_url, Link),
        field!(Stage, ot_approval_group_email, Str),
        field!(Stage, ot_chromium_trial_name, Str),
        field!(Stage, ot_description, Str),
        field!(Stage, ot_display_name, Str),
        field!(Stage, ot_documentation_url, Link),
        field!(Stage, ot_emails, Emails),
        field!(Stage, ot_feedback_submission_url, Link),
        field!(Stage, ot_has_third_party_support, Bool),
        field!(Stage, ot_is_critical_trial, Bool),
        field!(Stage, ot_is_deprecation_trial, Bool),
        field!(Stage, ot_owner_email, Str),
        field!(Stage, ot_require_approvals, Bool),
        field!(Stage, ot_request_note, Str),
        field!(Stage, ot_webfeature_use_counter, Str),
        field!(Stage, rollout_milestone, Int),
        field!(Stage, rollout_platforms, SplitStr),
        field!(Stage, rollout_details, Str),
        field!(Stage, rollout_impact, Int),
        field!(Stage, enterprise_policies, SplitStr),
    ]
});

/// Milestone-set fields, in update order
pub static MILESTONE_FIELDS: Lazy<Vec<FieldSpec<MilestoneSet>>> = Lazy::new(|| {
    vec![
        field!(MilestoneSet, desktop_first, Int),
        field!(MilestoneSet, desktop_last, Int),
        field!(MilestoneSet, android_first, Int),
        field!(MilestoneSet, android_last, Int),
        field!(MilestoneSet, ios_first, Int),
        field!(MilestoneSet, ios_last, Int),
        field!(MilestoneSet, webview_first, Int),
        field!(MilestoneSet, webview_last, Int),
    ]
});
