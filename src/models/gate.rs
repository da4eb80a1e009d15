//! Gate model
//!
//! A gate is the approval workflow record attached to one stage. This service
//! only ever creates gates in their initial state.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Review state of a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// Initial state: the stage owners are still preparing the request
    Preparing,
    ReviewRequested,
    NeedsWork,
    Approved,
    Denied,
    Na,
}

impl Default for GateState {
    fn default() -> Self {
        GateState::Preparing
    }
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Preparing => "PREPARING",
            GateState::ReviewRequested => "REVIEW_REQUESTED",
            GateState::NeedsWork => "NEEDS_WORK",
            GateState::Approved => "APPROVED",
            GateState::Denied => "DENIED",
            GateState::Na => "NA",
        }
    }
}

impl FromStr for GateState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PREPARING" => Ok(GateState::Preparing),
            "REVIEW_REQUESTED" => Ok(GateState::ReviewRequested),
            "NEEDS_WORK" => Ok(GateState::NeedsWork),
            "APPROVED" => Ok(GateState::Approved),
            "DENIED" => Ok(GateState::Denied),
            "NA" => Ok(GateState::Na),
            other => Err(format!("unknown gate state: {}", other)),
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval gate tied to a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: i64,
    pub feature_id: i64,
    pub stage_id: i64,
    pub gate_type: i32,
    pub state: GateState,
}

impl Gate {
    /// New, not yet persisted gate in the `PREPARING` state
    pub fn preparing(feature_id: i64, stage_id: i64, gate_type: i32) -> Self {
        Self {
            id: 0,
            feature_id,
            stage_id,
            gate_type,
            state: GateState::Preparing,
        }
    }
}
