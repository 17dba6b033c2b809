//! StepGate - decides whether the continue control is usable.
//!
//! Pure: the verdict is a function of the selection and the predicate only.

use crate::domain::selection::SelectionStore;

use super::predicate::{ReadyWording, StepPredicate};

/// State of the continue affordance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateVerdict {
    pub can_advance: bool,
    pub affordance_label: String,
}

impl GateVerdict {
    pub fn ready(label: impl Into<String>) -> Self {
        Self {
            can_advance: true,
            affordance_label: label.into(),
        }
    }

    pub fn blocked(label: impl Into<String>) -> Self {
        Self {
            can_advance: false,
            affordance_label: label.into(),
        }
    }

    /// Affordance shown while a save is in flight.
    pub fn saving() -> Self {
        Self::blocked("Saving selection...")
    }
}

pub struct StepGate;

impl StepGate {
    /// Evaluates `predicate` against the current selection.
    pub fn evaluate(selection: &SelectionStore, predicate: &StepPredicate) -> GateVerdict {
        let count = selection.count(None);
        if !predicate.rule.is_satisfied(count) {
            return GateVerdict::blocked(predicate.prompt);
        }

        let label = match &predicate.ready {
            ReadyWording::Counted { singular, plural } => {
                let noun = if count == 1 { singular } else { plural };
                format!("Next ({} {})", count, noun)
            }
            ReadyWording::Fixed(text) => (*text).to_string(),
            ReadyWording::Named(prefix) => {
                let values = selection.values(None);
                match values.first() {
                    Some(option) => format!("{} ({})", prefix, predicate.label_for(option)),
                    None => (*prefix).to_string(),
                }
            }
        };
        GateVerdict::ready(label)
    }
}
