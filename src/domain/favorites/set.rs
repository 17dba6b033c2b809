//! FavoritesSet - liked recommendation items plus the toggles in flight.
//!
//! Membership changes only through [`FavoritesSet::commit`], which the caller
//! invokes after the remote store acknowledged the add or remove. Each item id
//! may have at most one toggle in flight.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::domain::foundation::ItemId;

/// Remote operation a toggle issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOp {
    Add,
    Remove,
}

/// A toggle was requested while another one for the same item is unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a favorite toggle for '{0}' is already in flight")]
pub struct ToggleInFlight(pub ItemId);

/// Ticket for a toggle that has been started but not resolved.
///
/// Consumed by [`FavoritesSet::commit`] or [`FavoritesSet::abandon`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending toggle must be committed or abandoned"]
pub struct PendingToggle {
    item_id: ItemId,
    op: FavoriteOp,
}

impl PendingToggle {
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn op(&self) -> FavoriteOp {
        self.op
    }
}

#[derive(Debug, Clone, Default)]
pub struct FavoritesSet {
    members: HashSet<ItemId>,
    pending: HashMap<ItemId, FavoriteOp>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set already holding `ids`.
    pub fn from_ids<I: IntoIterator<Item = ItemId>>(ids: I) -> Self {
        Self {
            members: ids.into_iter().collect(),
            pending: HashMap::new(),
        }
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.members.contains(item_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true while a toggle for `item_id` awaits its acknowledgment.
    pub fn is_pending(&self, item_id: &ItemId) -> bool {
        self.pending.contains_key(item_id)
    }

    /// Replaces membership with the remote store's list.
    ///
    /// Toggles in flight stay registered; their commit applies on top.
    pub fn hydrate<I: IntoIterator<Item = ItemId>>(&mut self, ids: I) {
        self.members = ids.into_iter().collect();
    }

    /// Registers a toggle for `item_id` and decides which remote call it needs.
    pub fn begin_toggle(&mut self, item_id: &ItemId) -> Result<PendingToggle, ToggleInFlight> {
        if self.pending.contains_key(item_id) {
            return Err(ToggleInFlight(item_id.clone()));
        }
        let op = if self.members.contains(item_id) {
            FavoriteOp::Remove
        } else {
            FavoriteOp::Add
        };
        self.pending.insert(item_id.clone(), op);
        Ok(PendingToggle {
            item_id: item_id.clone(),
            op,
        })
    }

    /// Applies an acknowledged toggle. Returns the item's new membership.
    pub fn commit(&mut self, toggle: PendingToggle) -> bool {
        self.pending.remove(&toggle.item_id);
        match toggle.op {
            FavoriteOp::Add => {
                self.members.insert(toggle.item_id);
                true
            }
            FavoriteOp::Remove => {
                self.members.remove(&toggle.item_id);
                false
            }
        }
    }

    /// Drops a failed toggle, leaving membership untouched.
    pub fn abandon(&mut self, toggle: PendingToggle) {
        self.pending.remove(&toggle.item_id);
    }
}
