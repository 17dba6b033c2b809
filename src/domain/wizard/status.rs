//! WizardStatus - submit lifecycle of one step's controller.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of a step controller.
///
/// ```text
/// Idle ──► Editing ──► Submitting ──► Advanced
///             ▲            │
///             └── Failed ◄─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    /// Page loaded, nothing clicked yet.
    #[default]
    Idle,
    /// The user is changing the selection.
    Editing,
    /// A save is in flight; the continue control is disabled.
    Submitting,
    /// The save was acknowledged and navigation fired.
    Advanced,
    /// The save failed; editing resumes immediately.
    Failed,
}

impl WizardStatus {
    /// Returns true if clicks on options are accepted.
    pub fn accepts_mutations(self) -> bool {
        matches!(
            self,
            WizardStatus::Idle | WizardStatus::Editing | WizardStatus::Failed
        )
    }
}

impl StateMachine for WizardStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use WizardStatus::*;
        matches!(
            (self, target),
            (Idle, Editing)
                | (Editing, Submitting)
                | (Submitting, Advanced)
                | (Submitting, Failed)
                | (Failed, Editing)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WizardStatus::*;
        match self {
            Idle => vec![Editing],
            Editing => vec![Submitting],
            Submitting => vec![Advanced, Failed],
            Failed => vec![Editing],
            Advanced => vec![],
        }
    }
}
