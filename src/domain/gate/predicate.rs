//! Step completion predicates and their affordance wording.

use std::collections::BTreeMap;

use crate::domain::foundation::{OptionId, StepName};

/// How many selections a step needs before it may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// One or more selections across all groups.
    AtLeastOne,
    /// Exactly one selection across all groups.
    ExactlyOne,
}

impl SelectionRule {
    /// Returns true if `count` selections satisfy the rule.
    pub fn is_satisfied(self, count: usize) -> bool {
        match self {
            SelectionRule::AtLeastOne => count >= 1,
            SelectionRule::ExactlyOne => count == 1,
        }
    }
}

/// How the continue control describes a satisfied step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyWording {
    /// "Next (3 brands selected)".
    Counted {
        singular: &'static str,
        plural: &'static str,
    },
    /// A fixed label.
    Fixed(&'static str),
    /// A label naming the single selected option, e.g. "See recommendations (Manual)".
    Named(&'static str),
}

/// A step's completion predicate plus the words its affordance uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPredicate {
    pub rule: SelectionRule,
    pub ready: ReadyWording,
    pub prompt: &'static str,
    option_labels: BTreeMap<OptionId, String>,
}

impl StepPredicate {
    /// Predicate for a selection step.
    ///
    /// Returns None for the recommendations view, which has no selection.
    pub fn for_step(step: StepName) -> Option<Self> {
        let (rule, ready, prompt) = match step {
            StepName::Brand => (
                SelectionRule::AtLeastOne,
                ReadyWording::Counted {
                    singular: "brand selected",
                    plural: "brands selected",
                },
                "Select at least one brand",
            ),
            StepName::Budget => (
                SelectionRule::ExactlyOne,
                ReadyWording::Fixed("Continue"),
                "Select a budget range",
            ),
            StepName::Fuel => (
                SelectionRule::ExactlyOne,
                ReadyWording::Fixed("Next"),
                "Select a fuel type",
            ),
            StepName::Type => (
                SelectionRule::AtLeastOne,
                ReadyWording::Counted {
                    singular: "type selected",
                    plural: "types selected",
                },
                "Select at least one type",
            ),
            StepName::Transmission => (
                SelectionRule::ExactlyOne,
                ReadyWording::Named("See recommendations"),
                "Select a transmission",
            ),
            StepName::Recommendations => return None,
        };
        Some(Self {
            rule,
            ready,
            prompt,
            option_labels: BTreeMap::new(),
        })
    }

    /// Attaches display labels used by [`ReadyWording::Named`].
    pub fn with_option_labels<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (OptionId, String)>,
    {
        self.option_labels.extend(labels);
        self
    }

    pub(crate) fn label_for<'a>(&'a self, option: &'a OptionId) -> &'a str {
        self.option_labels
            .get(option)
            .map(String::as_str)
            .unwrap_or_else(|| option.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_match_their_counts() {
        assert!(!SelectionRule::AtLeastOne.is_satisfied(0));
        assert!(SelectionRule::AtLeastOne.is_satisfied(4));
        assert!(!SelectionRule::ExactlyOne.is_satisfied(0));
        assert!(SelectionRule::ExactlyOne.is_satisfied(1));
        assert!(!SelectionRule::ExactlyOne.is_satisfied(2));
    }

    #[test]
    fn every_selection_step_has_a_predicate() {
        for step in StepName::ORDER {
            assert_eq!(
                StepPredicate::for_step(step).is_some(),
                step.collects_selection()
            );
        }
    }

    #[test]
    fn single_select_steps_need_exactly_one() {
        for step in [StepName::Budget, StepName::Fuel, StepName::Transmission] {
            assert_eq!(
                StepPredicate::for_step(step).unwrap().rule,
                SelectionRule::ExactlyOne
            );
        }
    }

    #[test]
    fn label_for_uses_attached_labels() {
        let manual = OptionId::new("manual").unwrap();
        let cvt = OptionId::new("cvt").unwrap();
        let predicate = StepPredicate::for_step(StepName::Transmission)
            .unwrap()
            .with_option_labels([(manual.clone(), "Manual".to_string())]);
        assert_eq!(predicate.label_for(&manual), "Manual");
        assert_eq!(predicate.label_for(&cvt), "cvt");
    }
}
