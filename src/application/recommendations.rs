//! RecommendationsView - the results page: scored cards with favorite toggles.

use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;
use crate::domain::recommendation::{CardViewModel, RecommendationItem, RecommendationRenderer};
use crate::ports::{StoreError, StoreTransport};

use super::favorites::{FavoriteError, FavoritesService};
use super::responses::read_json;

const RECOMMENDATIONS_PATH: &str = "/api/recommendations";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecommendationsError {
    /// The store has no saved value for some wizard steps.
    #[error("selections are incomplete: missing {}", .0.join(", "))]
    IncompleteSelections(Vec<String>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecommendationsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RecommendationsError::IncompleteSelections(_) => ErrorCode::ValidationFailed,
            RecommendationsError::Store(err) => err.code(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MissingSelections {
    missing: Vec<String>,
}

pub struct RecommendationsView {
    transport: Arc<dyn StoreTransport>,
    favorites: Arc<FavoritesService>,
    renderer: RecommendationRenderer,
    results: Vec<RecommendationItem>,
}

impl RecommendationsView {
    pub fn new(
        transport: Arc<dyn StoreTransport>,
        favorites: Arc<FavoritesService>,
        renderer: RecommendationRenderer,
    ) -> Self {
        Self {
            transport,
            favorites,
            renderer,
            results: Vec::new(),
        }
    }

    /// Fetches results and favorites concurrently and projects the cards.
    ///
    /// A favorites failure is logged and the cards render without hearts.
    ///
    /// # Errors
    ///
    /// - `IncompleteSelections` when the store reports missing wizard steps
    /// - `Store` for any other failure fetching results
    pub async fn load(&mut self) -> Result<Vec<CardViewModel>, RecommendationsError> {
        let (results, favorites) =
            futures::join!(self.fetch_recommendations(), self.favorites.hydrate());

        if let Err(e) = favorites {
            tracing::warn!(error = %e, "Could not load favorites");
        }
        self.results = results?;
        tracing::info!(count = self.results.len(), "Recommendations loaded");
        Ok(self.cards())
    }

    async fn fetch_recommendations(&self) -> Result<Vec<RecommendationItem>, RecommendationsError> {
        let response = self
            .transport
            .get(RECOMMENDATIONS_PATH)
            .await
            .map_err(StoreError::from)?;

        if response.status == 400 {
            if let Ok(body) = serde_json::from_str::<MissingSelections>(&response.body) {
                return Err(RecommendationsError::IncompleteSelections(body.missing));
            }
        }
        Ok(read_json(response)?)
    }

    pub fn results(&self) -> &[RecommendationItem] {
        &self.results
    }

    /// Current cards, reflecting favorites membership and toggles in flight.
    pub fn cards(&self) -> Vec<CardViewModel> {
        self.renderer
            .project(&self.results, &self.favorites.snapshot())
    }

    /// Toggles the favorite state of a displayed item.
    ///
    /// The add request carries the item exactly as it was received.
    pub async fn toggle_favorite(&self, item_id: &str) -> Result<bool, FavoriteError> {
        let item = self
            .results
            .iter()
            .find(|item| item.id.as_str() == item_id)
            .ok_or_else(|| FavoriteError::UnknownItem(item_id.to_string()))?;
        self.favorites.toggle(item).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{RecordingNotifier, ScriptedTransport};
    use crate::domain::recommendation::FavoriteAction;
    use serde_json::json;

    fn view(transport: &ScriptedTransport) -> RecommendationsView {
        let transport: Arc<dyn StoreTransport> = Arc::new(transport.clone());
        let favorites = Arc::new(FavoritesService::new(
            Arc::clone(&transport),
            Arc::new(RecordingNotifier::new()),
        ));
        RecommendationsView::new(transport, favorites, RecommendationRenderer::default())
    }

    #[tokio::test]
    async fn missing_selections_surface_as_typed_error() {
        let transport = ScriptedTransport::new()
            .with_response(
                400,
                json!({"error": "Missing selection data: fuel", "missing": ["fuel"]}),
            )
            .with_response(200, json!({"favorites": []}));
        let mut view = view(&transport);

        let err = view.load().await.unwrap_err();
        assert_eq!(
            err,
            RecommendationsError::IncompleteSelections(vec!["fuel".to_string()])
        );
    }

    #[tokio::test]
    async fn unknown_item_cannot_be_toggled() {
        let transport = ScriptedTransport::new();
        let view = view(&transport);
        assert!(matches!(
            view.toggle_favorite("ghost").await,
            Err(FavoriteError::UnknownItem(_))
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn toggle_flips_card_label() {
        let transport = ScriptedTransport::new()
            .with_response(200, json!([{"id": "c1", "name": "Corolla", "price": 25000}]))
            .with_response(200, json!({"favorites": []}));
        let mut view = view(&transport);

        let cards = view.load().await.unwrap();
        assert_eq!(cards[0].favorite_action, FavoriteAction::Add);

        view.toggle_favorite("c1").await.unwrap();
        assert_eq!(view.cards()[0].favorite_action, FavoriteAction::Remove);
    }

    #[tokio::test]
    async fn null_fields_render_as_not_specified() {
        let transport = ScriptedTransport::new()
            .with_response(
                200,
                json!([
                    {"id": "car_1", "name": "Kia Rio", "fuel": null, "features": null},
                    {"id": "car_2", "name": "Mazda 3", "fuel": "Gasoline"}
                ]),
            )
            .with_response(200, json!({"favorites": []}));
        let mut view = view(&transport);

        let cards = view.load().await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].details.fuel, "Not specified");
        assert!(cards[0].features.is_empty());
        assert_eq!(cards[1].details.fuel, "Gasoline");
    }
}
