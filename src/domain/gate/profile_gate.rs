//! ProfileGate - completion check for the profile step.

use crate::domain::profile::ProfileDraft;

use super::step_gate::GateVerdict;

pub struct ProfileGate;

impl ProfileGate {
    /// Fields still unset, in form order.
    pub fn missing_fields(draft: &ProfileDraft) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if draft.display_name().is_empty() {
            missing.push("name");
        }
        if draft.gender.is_none() {
            missing.push("gender");
        }
        if draft.age_range.is_none() {
            missing.push("age");
        }
        missing
    }

    pub fn evaluate(draft: &ProfileDraft) -> GateVerdict {
        let missing = Self::missing_fields(draft);
        if missing.is_empty() {
            GateVerdict::ready("Continue to recommendations")
        } else {
            GateVerdict::blocked(format!("Select: {}", missing.join(", ")))
        }
    }
}
