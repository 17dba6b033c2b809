//! SelectionStore - per-step selection state.
//!
//! Keys are `(group, option)` pairs; presence of a key means "selected".
//! Pure data structure, no I/O.

use std::collections::BTreeSet;

use crate::domain::foundation::{GroupId, OptionId, SelectionMode};

/// Order-insensitive view of the selected keys, used for equality checks.
pub type SelectionSnapshot = BTreeSet<(GroupId, OptionId)>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupSelection {
    group_id: GroupId,
    options: Vec<OptionId>,
}

/// In-memory mapping of `(group, option)` to the chosen value.
///
/// Groups keep the order in which they first received a selection and options
/// keep their click order within a group, so [`SelectionStore::values`] is
/// deterministic for a given click sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    groups: Vec<GroupSelection>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a click on `option_id` within `group_id`.
    ///
    /// `Single` evicts every prior key of the group before inserting, so the
    /// group holds exactly the new option. `Multi` toggles the key.
    pub fn set(
        &mut self,
        group_id: &GroupId,
        option_id: &OptionId,
        mode: SelectionMode,
    ) -> SelectionSnapshot {
        match mode {
            SelectionMode::Single => {
                let group = self.group_entry(group_id);
                group.options.clear();
                group.options.push(option_id.clone());
            }
            SelectionMode::Multi => {
                let group = self.group_entry(group_id);
                if let Some(pos) = group.options.iter().position(|o| o == option_id) {
                    group.options.remove(pos);
                } else {
                    group.options.push(option_id.clone());
                }
            }
        }
        self.groups.retain(|g| !g.options.is_empty());
        self.snapshot()
    }

    /// Returns true if nothing is selected (optionally within one group).
    pub fn is_empty(&self, group_id: Option<&GroupId>) -> bool {
        self.count(group_id) == 0
    }

    /// Number of selected keys (optionally within one group).
    pub fn count(&self, group_id: Option<&GroupId>) -> usize {
        self.scoped(group_id).map(|g| g.options.len()).sum()
    }

    /// Selected option values (optionally within one group).
    pub fn values(&self, group_id: Option<&GroupId>) -> Vec<OptionId> {
        self.scoped(group_id)
            .flat_map(|g| g.options.iter().cloned())
            .collect()
    }

    /// Returns true if the key is selected.
    pub fn contains(&self, group_id: &GroupId, option_id: &OptionId) -> bool {
        self.groups
            .iter()
            .any(|g| &g.group_id == group_id && g.options.contains(option_id))
    }

    /// Removes every selection.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Order-insensitive copy of the selected keys.
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.groups
            .iter()
            .flat_map(|g| g.options.iter().map(|o| (g.group_id.clone(), o.clone())))
            .collect()
    }

    fn scoped<'a>(
        &'a self,
        group_id: Option<&'a GroupId>,
    ) -> impl Iterator<Item = &'a GroupSelection> + 'a {
        self.groups
            .iter()
            .filter(move |g| group_id.map_or(true, |id| &g.group_id == id))
    }

    fn group_entry(&mut self, group_id: &GroupId) -> &mut GroupSelection {
        let pos = match self.groups.iter().position(|g| &g.group_id == group_id) {
            Some(pos) => pos,
            None => {
                self.groups.push(GroupSelection {
                    group_id: group_id.clone(),
                    options: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[pos]
    }
}
