//! ThemePreference - light/dark theme kept locally and on the remote store.
//!
//! The local value applies immediately on load; the remote value wins once it
//! arrives. Toggling saves to the store in the background.

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::domain::profile::Theme;
use crate::ports::{cache_keys, LocalCache, StoreError, StoreTransport};

use super::responses::{read_ack, read_json};

const FETCH_PATH: &str = "/api/user-theme";
const SAVE_PATH: &str = "/api/save-theme";

#[derive(Debug, Deserialize)]
struct ThemeBody {
    theme: String,
}

pub struct ThemePreference {
    current: Theme,
    transport: Arc<dyn StoreTransport>,
    cache: Arc<dyn LocalCache>,
    pending_save: Option<JoinHandle<()>>,
}

impl ThemePreference {
    /// Creates the preference with the locally cached theme applied.
    pub fn load(transport: Arc<dyn StoreTransport>, cache: Arc<dyn LocalCache>) -> Self {
        let current = match cache.get(cache_keys::THEME) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unknown cached theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read cached theme");
                Theme::default()
            }
        };
        Self {
            current,
            transport,
            cache,
            pending_save: None,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Label of the control that switches theme.
    pub fn toggle_label(&self) -> &'static str {
        self.current.toggle_label()
    }

    /// Adopts the remote theme when it differs from the local one.
    ///
    /// Failures keep the local theme.
    pub async fn reconcile(&mut self) -> Theme {
        match self.fetch_remote().await {
            Ok(remote) if remote != self.current => {
                tracing::debug!(
                    local = self.current.as_str(),
                    remote = remote.as_str(),
                    "Adopting remote theme"
                );
                self.apply_locally(remote);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Could not load remote theme"),
        }
        self.current
    }

    async fn fetch_remote(&self) -> Result<Theme, StoreError> {
        let response = self.transport.get(FETCH_PATH).await?;
        let body: ThemeBody = read_json(response)?;
        body.theme
            .parse::<Theme>()
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }

    /// Switches theme, applies it locally and saves it in the background.
    ///
    /// Saves run one after another in toggle order, so the store ends up with
    /// the last theme chosen. The background save needs a tokio runtime;
    /// without one only the local theme changes.
    pub fn toggle(&mut self) -> Theme {
        let theme = self.current.toggled();
        self.apply_locally(theme);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(theme = theme.as_str(), "No runtime, theme saved locally only");
            return theme;
        };

        let previous = self.pending_save.take();
        let transport = Arc::clone(&self.transport);
        self.pending_save = Some(runtime.spawn(async move {
            if let Some(previous) = previous {
                // Failures were already logged by the earlier task.
                let _ = previous.await;
            }
            let result = transport
                .post(SAVE_PATH, json!({ "theme": theme.as_str() }))
                .await
                .map_err(StoreError::from)
                .and_then(read_ack);
            match result {
                Ok(_) => tracing::debug!(theme = theme.as_str(), "Theme saved"),
                Err(e) => tracing::warn!(error = %e, "Could not save theme"),
            }
        }));
        theme
    }

    /// Waits for every background save started so far.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending_save.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Theme save task failed");
            }
        }
    }

    fn apply_locally(&mut self, theme: Theme) {
        self.current = theme;
        if let Err(e) = self.cache.set(cache_keys::THEME, theme.as_str()) {
            tracing::warn!(error = %e, "Could not cache theme");
        }
    }
}
