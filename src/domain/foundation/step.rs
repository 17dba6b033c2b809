//! StepName - the ordered wizard sequence and per-step vocabulary.
//!
//! # Step Order
//!
//! 1. Brand → 2. Budget → 3. Fuel → 4. Type → 5. Transmission →
//! 6. Recommendations
//!
//! Recommendations is the terminal view; it has no selection and is never saved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// How a step's options react to a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Exclusive: picking an option evicts the group's previous pick.
    Single,
    /// Toggle: picking an option flips its presence.
    Multi,
}

/// One screen in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepName {
    Brand,
    Budget,
    Fuel,
    Type,
    Transmission,
    Recommendations,
}

impl StepName {
    /// The canonical wizard order.
    pub const ORDER: [StepName; 6] = [
        StepName::Brand,
        StepName::Budget,
        StepName::Fuel,
        StepName::Type,
        StepName::Transmission,
        StepName::Recommendations,
    ];

    /// Returns the 0-based position in the sequence.
    pub fn order_index(self) -> usize {
        match self {
            StepName::Brand => 0,
            StepName::Budget => 1,
            StepName::Fuel => 2,
            StepName::Type => 3,
            StepName::Transmission => 4,
            StepName::Recommendations => 5,
        }
    }

    /// Returns the next step, or None at the end.
    pub fn next(self) -> Option<StepName> {
        Self::ORDER.get(self.order_index() + 1).copied()
    }

    /// Returns the previous step, or None at the start.
    pub fn previous(self) -> Option<StepName> {
        self.order_index()
            .checked_sub(1)
            .and_then(|idx| Self::ORDER.get(idx).copied())
    }

    /// Returns true if this step collects a selection that gets saved.
    pub fn collects_selection(self) -> bool {
        self != StepName::Recommendations
    }

    /// Click semantics for the step's options.
    ///
    /// Returns None for the recommendations view.
    pub fn selection_mode(self) -> Option<SelectionMode> {
        match self {
            StepName::Brand | StepName::Type => Some(SelectionMode::Multi),
            StepName::Budget | StepName::Fuel | StepName::Transmission => {
                Some(SelectionMode::Single)
            }
            StepName::Recommendations => None,
        }
    }

    /// Page route the navigator opens for this step.
    pub fn route(self) -> &'static str {
        match self {
            StepName::Brand => "/brands",
            StepName::Budget => "/budget",
            StepName::Fuel => "/fuel",
            StepName::Type => "/type",
            StepName::Transmission => "/transmission",
            StepName::Recommendations => "/recommendations",
        }
    }

    /// Remote endpoint that persists this step's selection.
    pub fn save_path(self) -> Option<&'static str> {
        match self {
            StepName::Brand => Some("/api/save-brands"),
            StepName::Budget => Some("/api/save-budget"),
            StepName::Fuel => Some("/api/save-fuel"),
            StepName::Type => Some("/api/save-types"),
            StepName::Transmission => Some("/api/save-transmission"),
            StepName::Recommendations => None,
        }
    }

    /// JSON key the remote store expects the selection under.
    pub fn payload_key(self) -> Option<&'static str> {
        match self {
            StepName::Brand => Some("brands"),
            StepName::Budget => Some("budget"),
            StepName::Fuel => Some("fuel"),
            StepName::Type => Some("types"),
            StepName::Transmission => Some("transmission"),
            StepName::Recommendations => None,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            StepName::Brand => "brand",
            StepName::Budget => "budget",
            StepName::Fuel => "fuel",
            StepName::Type => "type",
            StepName::Transmission => "transmission",
            StepName::Recommendations => "recommendations",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("step", format!("unknown step '{}'", s)))
    }
}
