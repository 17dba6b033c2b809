//! Step catalog - the static options each wizard step offers.
//!
//! The catalog is plain YAML so the option lists can change without a rebuild.
//! A default catalog is embedded in the crate; [`StepCatalog::from_path`] loads
//! an override.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, GroupId, OptionId, StepName};

const DEFAULT_CATALOG: &str = include_str!("default_catalog.yaml");

/// A selectable UI unit. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: OptionId,
    pub group_id: GroupId,
    pub label: String,
}

/// One option as written in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub id: OptionId,
    pub label: String,
}

/// An ordered group of options within a step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionGroup {
    pub id: GroupId,
    pub options: Vec<CatalogEntry>,
}

impl OptionGroup {
    fn find(&self, option_id: &str) -> Option<SelectOption> {
        self.options
            .iter()
            .find(|entry| entry.id.as_str() == option_id)
            .map(|entry| SelectOption {
                id: entry.id.clone(),
                group_id: self.id.clone(),
                label: entry.label.clone(),
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StepOptions {
    groups: Vec<OptionGroup>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    steps: BTreeMap<StepName, StepOptions>,
}

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog has no options for step '{0}'")]
    MissingStep(StepName),

    #[error("catalog step '{step}' repeats group '{group}'")]
    DuplicateGroup { step: StepName, group: GroupId },

    #[error("catalog group '{group}' repeats option '{option}'")]
    DuplicateOption { group: GroupId, option: OptionId },
}

/// Options for every selection step, in page order.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    steps: BTreeMap<StepName, Vec<OptionGroup>>,
}

impl StepCatalog {
    /// Loads the catalog embedded in the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_yaml(DEFAULT_CATALOG)
    }

    /// Loads a catalog from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Parses and validates a YAML catalog.
    ///
    /// Every step that collects a selection must have at least one non-empty
    /// group; group ids are unique per step and option ids unique per group.
    pub fn from_yaml(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(raw)?;
        let mut steps = BTreeMap::new();

        for step in StepName::ORDER.into_iter().filter(|s| s.collects_selection()) {
            let groups = file
                .steps
                .get(&step)
                .map(|s| s.groups.clone())
                .filter(|groups| groups.iter().any(|g| !g.options.is_empty()))
                .ok_or(CatalogError::MissingStep(step))?;

            let mut seen_groups = HashSet::new();
            for group in &groups {
                if !seen_groups.insert(group.id.clone()) {
                    return Err(CatalogError::DuplicateGroup {
                        step,
                        group: group.id.clone(),
                    });
                }
                let mut seen_options = HashSet::new();
                for entry in &group.options {
                    if !seen_options.insert(entry.id.clone()) {
                        return Err(CatalogError::DuplicateOption {
                            group: group.id.clone(),
                            option: entry.id.clone(),
                        });
                    }
                }
            }
            steps.insert(step, groups);
        }

        Ok(Self { steps })
    }

    /// Returns the groups of a step in page order (empty for the results view).
    pub fn groups(&self, step: StepName) -> &[OptionGroup] {
        self.steps.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolves an option within a specific group.
    ///
    /// # Errors
    ///
    /// - `UnknownStep` if the step has no options
    /// - `UnknownGroup` if the group is not part of the step
    /// - `UnknownOption` if the option is not part of the group
    pub fn option(
        &self,
        step: StepName,
        group_id: &GroupId,
        option_id: &OptionId,
    ) -> Result<SelectOption, DomainError> {
        let groups = self.steps.get(&step).ok_or_else(|| {
            DomainError::new(ErrorCode::UnknownStep, format!("Step '{}' has no options", step))
        })?;
        let group = groups.iter().find(|g| &g.id == group_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::UnknownGroup,
                format!("Group '{}' is not part of step '{}'", group_id, step),
            )
        })?;
        group.find(option_id.as_str()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::UnknownOption,
                format!("Option '{}' is not part of group '{}'", option_id, group_id),
            )
            .with_detail("step", step.as_str())
        })
    }

    /// Resolves an option by id anywhere in the step.
    pub fn find_option(&self, step: StepName, option_id: &str) -> Option<SelectOption> {
        self.groups(step).iter().find_map(|g| g.find(option_id))
    }

    /// Display label for an option id, falling back to the id itself.
    pub fn label_for(&self, step: StepName, option_id: &str) -> String {
        self.find_option(step, option_id)
            .map(|o| o.label)
            .unwrap_or_else(|| option_id.to_string())
    }
}
