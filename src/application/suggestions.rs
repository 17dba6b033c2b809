//! Suggestion hints computed from what the local cache remembers.

use std::sync::Arc;

use crate::domain::foundation::StepName;
use crate::domain::profile::DemographicProfile;
use crate::domain::suggestions::{suggest_transmission, suggest_types, TransmissionHint};
use crate::ports::{cache_keys, LocalCache};

pub struct SuggestionReader {
    cache: Arc<dyn LocalCache>,
}

impl SuggestionReader {
    pub fn new(cache: Arc<dyn LocalCache>) -> Self {
        Self { cache }
    }

    /// Type step hints for the cached profile.
    pub fn type_suggestions(&self) -> Vec<&'static str> {
        suggest_types(&self.cached_profile())
    }

    /// Transmission step hint from the cached profile and earlier steps.
    pub fn transmission_hint(&self) -> Option<TransmissionHint> {
        let types = self.cached_selection(StepName::Type);
        let fuel = self.cached_selection(StepName::Fuel);
        suggest_transmission(
            &types,
            fuel.first().map(String::as_str),
            &self.cached_profile(),
        )
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key, error = %e, "Could not read cache");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| tracing::debug!(key, error = %e, "Ignoring unreadable cache entry"))
            .ok()
    }

    fn cached_profile(&self) -> DemographicProfile {
        self.read(cache_keys::USER_PROFILE).unwrap_or_default()
    }

    fn cached_selection(&self, step: StepName) -> Vec<String> {
        self.read(&cache_keys::selection(step)).unwrap_or_default()
    }
}
