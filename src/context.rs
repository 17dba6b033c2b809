//! WizardContext - builds the shared collaborators from configuration.
//!
//! One context per page session. Controllers created from it share the same
//! transport, cache and favorites ledger.

use std::sync::Arc;
use thiserror::Error;

use crate::adapters::{HttpStoreConfig, JsonFileCache, ReqwestStoreTransport};
use crate::application::{
    FavoritesService, PersistenceClient, ProfileController, RecommendationsView, SessionHydrator,
    SuggestionReader, ThemePreference, WizardController, WizardError,
};
use crate::config::{AppConfig, ValidationError};
use crate::domain::catalog::{CatalogError, StepCatalog};
use crate::domain::foundation::StepName;
use crate::domain::recommendation::RecommendationRenderer;
use crate::ports::{LocalCache, Navigator, Notifier, StoreTransport, TransportError};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("could not load catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("could not create store transport: {0}")]
    Transport(#[from] TransportError),
}

pub struct WizardContext {
    transport: Arc<dyn StoreTransport>,
    cache: Arc<dyn LocalCache>,
    navigator: Arc<dyn Navigator>,
    catalog: Arc<StepCatalog>,
    renderer: RecommendationRenderer,
    favorites: Arc<FavoritesService>,
}

impl WizardContext {
    /// Wires the reqwest transport and the JSON file cache from `config`.
    pub fn from_config(
        config: &AppConfig,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ContextError> {
        config.validate()?;

        let mut http = HttpStoreConfig::new(config.store.base_url.clone())
            .with_timeout(config.store.timeout());
        if let Some(cookie) = &config.store.session_cookie {
            http = http.with_session_secret(cookie.clone());
        }
        let transport: Arc<dyn StoreTransport> = Arc::new(ReqwestStoreTransport::new(http)?);
        let cache: Arc<dyn LocalCache> = Arc::new(JsonFileCache::new(&config.cache.path));
        let catalog = config.catalog.load()?;

        tracing::info!(store = %config.store.base_url, "Wizard context ready");
        Ok(Self::new(
            transport,
            cache,
            navigator,
            notifier,
            catalog,
            RecommendationRenderer::new(config.display.price_format()),
        ))
    }

    /// Wires the context from already-built collaborators.
    pub fn new(
        transport: Arc<dyn StoreTransport>,
        cache: Arc<dyn LocalCache>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        catalog: StepCatalog,
        renderer: RecommendationRenderer,
    ) -> Self {
        let favorites = Arc::new(FavoritesService::new(Arc::clone(&transport), notifier));
        Self {
            transport,
            cache,
            navigator,
            catalog: Arc::new(catalog),
            renderer,
            favorites,
        }
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn favorites(&self) -> Arc<FavoritesService> {
        Arc::clone(&self.favorites)
    }

    fn persistence(&self) -> PersistenceClient {
        PersistenceClient::new(Arc::clone(&self.transport))
    }

    /// Controller for one selection step.
    pub fn wizard(&self, step: StepName) -> Result<WizardController, WizardError> {
        Ok(WizardController::new(
            step,
            Arc::clone(&self.catalog),
            self.persistence(),
            Arc::clone(&self.navigator),
        )?
        .with_cache(Arc::clone(&self.cache)))
    }

    pub fn profile(&self) -> ProfileController {
        ProfileController::new(
            self.persistence(),
            Arc::clone(&self.navigator),
            Arc::clone(&self.cache),
        )
    }

    pub fn session(&self) -> SessionHydrator {
        SessionHydrator::new(Arc::clone(&self.transport), Arc::clone(&self.cache))
    }

    pub fn theme(&self) -> ThemePreference {
        ThemePreference::load(Arc::clone(&self.transport), Arc::clone(&self.cache))
    }

    pub fn suggestions(&self) -> SuggestionReader {
        SuggestionReader::new(Arc::clone(&self.cache))
    }

    pub fn recommendations(&self) -> RecommendationsView {
        RecommendationsView::new(
            Arc::clone(&self.transport),
            self.favorites(),
            self.renderer.clone(),
        )
    }
}
