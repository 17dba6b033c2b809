//! FavoritesService - pessimistic favorite toggles against the remote store.
//!
//! Membership lives in a [`FavoritesSet`] behind a mutex that is only held for
//! the bookkeeping before and after a request, never across the request.
//! A toggle whose future is dropped before the store answers releases its
//! item again, leaving membership as it was.

use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::domain::favorites::{FavoriteOp, FavoritesSet, PendingToggle, ToggleInFlight};
use crate::domain::foundation::{ErrorCode, ItemId};
use crate::domain::recommendation::RecommendationItem;
use crate::ports::{Notification, Notifier, StoreError, StoreTransport};

use super::responses::{read_ack, read_json};

const ADD_PATH: &str = "/api/add-favorite";
const REMOVE_PATH: &str = "/api/remove-favorite";
const LIST_PATH: &str = "/api/user-favorites";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FavoriteError {
    #[error(transparent)]
    ToggleInFlight(#[from] ToggleInFlight),

    #[error("item '{0}' is not part of the current results")]
    UnknownItem(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FavoriteError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FavoriteError::ToggleInFlight(_) => ErrorCode::ToggleInFlight,
            FavoriteError::UnknownItem(_) => ErrorCode::InvalidSelectionState,
            FavoriteError::Store(err) => err.code(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FavoritesBody {
    #[serde(default)]
    favorites: Vec<Value>,
}

/// Releases an unresolved toggle when dropped.
struct ToggleGuard<'a> {
    set: &'a Mutex<FavoritesSet>,
    pending: Option<PendingToggle>,
}

impl<'a> ToggleGuard<'a> {
    fn lock(&self) -> MutexGuard<'a, FavoritesSet> {
        self.set.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(mut self) -> bool {
        match self.pending.take() {
            Some(pending) => self.lock().commit(pending),
            None => false,
        }
    }

    fn abandon(mut self) {
        if let Some(pending) = self.pending.take() {
            self.lock().abandon(pending);
        }
    }
}

impl Drop for ToggleGuard<'_> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(
                item_id = %pending.item_id(),
                "Favorite toggle dropped before acknowledgment"
            );
            self.lock().abandon(pending);
        }
    }
}

pub struct FavoritesService {
    transport: Arc<dyn StoreTransport>,
    notifier: Arc<dyn Notifier>,
    set: Mutex<FavoritesSet>,
}

impl FavoritesService {
    pub fn new(transport: Arc<dyn StoreTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            set: Mutex::new(FavoritesSet::new()),
        }
    }

    fn set(&self) -> MutexGuard<'_, FavoritesSet> {
        self.set.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current membership, for rendering.
    pub fn snapshot(&self) -> FavoritesSet {
        self.set().clone()
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.set().contains(item_id)
    }

    /// Replaces membership with the remote favorites list.
    ///
    /// Returns the stored items. Entries that cannot be read as items are
    /// skipped.
    pub async fn hydrate(&self) -> Result<Vec<RecommendationItem>, StoreError> {
        let response = self.transport.get(LIST_PATH).await?;
        let body: FavoritesBody = read_json(response)?;

        let items: Vec<RecommendationItem> = body
            .favorites
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable favorite");
                    None
                }
            })
            .collect();

        self.set()
            .hydrate(items.iter().map(|item| item.id.clone()));
        tracing::debug!(count = items.len(), "Favorites hydrated");
        Ok(items)
    }

    /// Adds or removes `item` depending on its current membership.
    ///
    /// Membership changes only after the store acknowledges. Returns the new
    /// membership of the item.
    ///
    /// # Errors
    ///
    /// - `ToggleInFlight` if a toggle for the same item is unresolved
    /// - `Store` if the request failed; membership is unchanged
    pub async fn toggle(&self, item: &RecommendationItem) -> Result<bool, FavoriteError> {
        let pending = self.set().begin_toggle(&item.id).map_err(|e| {
            tracing::debug!(item_id = %item.id, "Favorite toggle already in flight");
            e
        })?;

        let op = pending.op();
        let guard = ToggleGuard {
            set: &self.set,
            pending: Some(pending),
        };
        let result = match op {
            FavoriteOp::Add => self.transport.post(ADD_PATH, json!({ "car": item })).await,
            FavoriteOp::Remove => {
                self.transport
                    .post(REMOVE_PATH, json!({ "carId": item.id }))
                    .await
            }
        }
        .map_err(StoreError::from)
        .and_then(read_ack);

        match result {
            Ok(_) => {
                let is_favorite = guard.commit();
                tracing::info!(item_id = %item.id, ?op, "Favorite updated");
                self.notifier.notify(Notification::success(if is_favorite {
                    "Added to favorites"
                } else {
                    "Removed from favorites"
                }));
                Ok(is_favorite)
            }
            Err(err) => {
                guard.abandon();
                tracing::warn!(item_id = %item.id, ?op, error = %err, "Favorite update failed");
                self.notifier
                    .notify(Notification::error("Could not update favorites"));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{RecordingNotifier, ScriptedTransport};
    use crate::ports::{NotificationLevel, TransportError};
    use std::time::Duration;

    fn corolla() -> RecommendationItem {
        let mut item = RecommendationItem::named(ItemId::new("c1").unwrap(), "Toyota Corolla");
        item.price = Some(25000.0);
        item
    }

    fn service(transport: &ScriptedTransport) -> (FavoritesService, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let service = FavoritesService::new(Arc::new(transport.clone()), Arc::new(notifier.clone()));
        (service, notifier)
    }

    #[tokio::test]
    async fn add_sends_snapshot_and_commits_after_ack() {
        let transport = ScriptedTransport::new();
        let (service, notifier) = service(&transport);

        assert!(service.toggle(&corolla()).await.unwrap());
        assert!(service.contains(&corolla().id));

        let call = &transport.calls()[0];
        assert_eq!(call.path, ADD_PATH);
        let body = call.body.as_ref().unwrap();
        assert_eq!(body["car"]["id"], json!("c1"));
        assert_eq!(body["car"]["name"], json!("Toyota Corolla"));
        assert_eq!(
            notifier.messages(NotificationLevel::Success),
            vec!["Added to favorites"]
        );
    }

    #[tokio::test]
    async fn second_toggle_removes_by_id() {
        let transport = ScriptedTransport::new();
        let (service, notifier) = service(&transport);

        service.toggle(&corolla()).await.unwrap();
        assert!(!service.toggle(&corolla()).await.unwrap());

        assert_eq!(transport.calls()[1].path, REMOVE_PATH);
        assert_eq!(transport.calls()[1].body, Some(json!({"carId": "c1"})));
        assert!(!service.contains(&corolla().id));
        assert_eq!(notifier.messages(NotificationLevel::Success).len(), 2);
    }

    #[tokio::test]
    async fn failure_leaves_membership_and_notifies() {
        let transport = ScriptedTransport::new()
            .with_response(500, json!({"success": false, "error": "db down"}))
            .with_failure(TransportError::Connection("refused".to_string()));
        let (service, notifier) = service(&transport);

        let err = service.toggle(&corolla()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ServerRejected);
        assert!(!service.contains(&corolla().id));

        let err = service.toggle(&corolla()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NetworkUnavailable);
        assert!(!service.snapshot().is_pending(&corolla().id));
        assert_eq!(
            notifier.messages(NotificationLevel::Error),
            vec!["Could not update favorites", "Could not update favorites"]
        );
    }

    #[tokio::test]
    async fn refusal_with_ok_status_is_a_failure() {
        let transport = ScriptedTransport::new()
            .with_response(200, json!({"success": false, "message": "Already in favorites"}));
        let (service, _) = service(&transport);

        assert!(matches!(
            service.toggle(&corolla()).await,
            Err(FavoriteError::Store(StoreError::ServerRejected { status: 200, .. }))
        ));
        assert!(!service.contains(&corolla().id));
    }

    #[tokio::test]
    async fn dropped_toggle_frees_the_item() {
        let transport = ScriptedTransport::new().held();
        let (service, _) = service(&transport);

        let timed_out =
            tokio::time::timeout(Duration::from_millis(20), service.toggle(&corolla())).await;
        assert!(timed_out.is_err());
        assert!(!service.snapshot().is_pending(&corolla().id));
        assert!(!service.contains(&corolla().id));

        transport.release(1);
        assert!(service.toggle(&corolla()).await.unwrap());
        assert!(service.contains(&corolla().id));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn hydrate_replaces_membership() {
        let transport = ScriptedTransport::new().with_response(
            200,
            json!({"favorites": [{"id": "a", "name": "A"}, {"name": "no id"}, {"id": "b"}]}),
        );
        let (service, _) = service(&transport);

        let items = service.hydrate().await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(service.contains(&ItemId::new("a").unwrap()));
        assert!(service.contains(&ItemId::new("b").unwrap()));
        assert_eq!(transport.paths(), vec![LIST_PATH]);
    }
}
