//! Gate policy
//!
//! Decides which approval gate, if any, a new stage of a given feature type
//! receives.

use std::collections::HashMap;

pub mod feature_types {
    pub const INCUBATE: i32 = 0;
    pub const EXISTING: i32 = 1;
    pub const CODE_CHANGE: i32 = 2;
    pub const DEPRECATION: i32 = 3;
}

pub mod stage_types {
    pub const BLINK_PROTOTYPE: i32 = 120;
    pub const BLINK_ORIGIN_TRIAL: i32 = 150;
    pub const BLINK_EXTEND_ORIGIN_TRIAL: i32 = 151;
    pub const BLINK_SHIPPING: i32 = 160;
    pub const FAST_PROTOTYPE: i32 = 220;
    pub const FAST_ORIGIN_TRIAL: i32 = 250;
    pub const FAST_EXTEND_ORIGIN_TRIAL: i32 = 251;
    pub const FAST_SHIPPING: i32 = 260;
    pub const PSA_SHIPPING: i32 = 360;
    pub const DEP_PLAN: i32 = 410;
    pub const DEP_DEPRECATION_TRIAL: i32 = 450;
    pub const DEP_EXTEND_DEPRECATION_TRIAL: i32 = 451;
    pub const DEP_SHIPPING: i32 = 460;
}

pub mod gate_types {
    pub const API_PROTOTYPE: i32 = 1;
    pub const API_ORIGIN_TRIAL: i32 = 2;
    pub const API_EXTEND_ORIGIN_TRIAL: i32 = 3;
    pub const API_SHIP: i32 = 4;
    pub const API_PLAN: i32 = 5;
}

/// (feature type, stage type, gate type)
const STANDARD_GATES: &[(i32, i32, i32)] = {
    use feature_types::*;
    use gate_types::*;
    use stage_types::*;
    &[
        (INCUBATE, BLINK_PROTOTYPE, API_PROTOTYPE),
        (INCUBATE, BLINK_ORIGIN_TRIAL, API_ORIGIN_TRIAL),
        (INCUBATE, BLINK_EXTEND_ORIGIN_TRIAL, API_EXTEND_ORIGIN_TRIAL),
        (INCUBATE, BLINK_SHIPPING, API_SHIP),
        (EXISTING, FAST_PROTOTYPE, API_PROTOTYPE),
        (EXISTING, FAST_ORIGIN_TRIAL, API_ORIGIN_TRIAL),
        (EXISTING, FAST_EXTEND_ORIGIN_TRIAL, API_EXTEND_ORIGIN_TRIAL),
        (EXISTING, FAST_SHIPPING, API_SHIP),
        (CODE_CHANGE, PSA_SHIPPING, API_SHIP),
        (DEPRECATION, DEP_PLAN, API_PLAN),
        (DEPRECATION, DEP_DEPRECATION_TRIAL, API_ORIGIN_TRIAL),
        (DEPRECATION, DEP_EXTEND_DEPRECATION_TRIAL, API_EXTEND_ORIGIN_TRIAL),
        (DEPRECATION, DEP_SHIPPING, API_SHIP),
    ]
};

/// Lookup table from (feature type, stage type) to gate type
#[derive(Debug, Clone)]
pub struct GatePolicy {
    gates: HashMap<(i32, i32), i32>,
}

impl GatePolicy {
    /// The table every feature process uses by default
    pub fn standard() -> Self {
        Self::from_entries(STANDARD_GATES.iter().copied())
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (i32, i32, i32)>) -> Self {
        Self {
            gates: entries
                .into_iter()
                .map(|(feature_type, stage_type, gate_type)| ((feature_type, stage_type), gate_type))
                .collect(),
        }
    }

    /// Gate type for a new stage, or `None` when the stage gets no gate
    pub fn resolve(&self, feature_type: i32, stage_type: i32) -> Option<i32> {
        self.gates.get(&(feature_type, stage_type)).copied()
    }
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::standard()
    }
}
