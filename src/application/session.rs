//! SessionHydrator - loads the signed-in user's state for the navbar.
//!
//! Runs on every page load. It never blocks the page: failures are logged
//! and reported as `None`.

use serde::Deserialize;
use std::sync::Arc;

use crate::domain::profile::DemographicProfile;
use crate::ports::{cache_keys, LocalCache, StoreError, StoreTransport};

use super::responses::read_json;

const USER_INFO_PATH: &str = "/api/user-info";
const FALLBACK_NAME: &str = "User";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    age_range: Option<String>,
}

/// What the page shows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub display_name: String,
    pub email: Option<String>,
    pub profile: DemographicProfile,
}

impl From<UserInfo> for SessionView {
    fn from(info: UserInfo) -> Self {
        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        let display_name = non_blank(&info.display_name)
            .or_else(|| non_blank(&info.username))
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        // Unknown wire values are dropped rather than failing the whole load.
        let profile = DemographicProfile {
            display_name: non_blank(&info.display_name),
            gender: info.gender.as_deref().and_then(|g| g.parse().ok()),
            age_range: info.age_range.as_deref().and_then(|a| a.parse().ok()),
        };

        Self {
            display_name,
            email: info.email,
            profile,
        }
    }
}

pub struct SessionHydrator {
    transport: Arc<dyn StoreTransport>,
    cache: Arc<dyn LocalCache>,
}

impl SessionHydrator {
    pub fn new(transport: Arc<dyn StoreTransport>, cache: Arc<dyn LocalCache>) -> Self {
        Self { transport, cache }
    }

    /// Fetches the user state and mirrors the demographic profile locally.
    pub async fn hydrate(&self) -> Option<SessionView> {
        match self.fetch().await {
            Ok(view) => {
                self.mirror(&view.profile);
                tracing::debug!(display_name = %view.display_name, "Session hydrated");
                Some(view)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not load user info");
                None
            }
        }
    }

    async fn fetch(&self) -> Result<SessionView, StoreError> {
        let response = self.transport.get(USER_INFO_PATH).await?;
        let info: UserInfo = read_json(response)?;
        Ok(info.into())
    }

    fn mirror(&self, profile: &DemographicProfile) {
        if profile.gender.is_none() && profile.age_range.is_none() {
            return;
        }
        match serde_json::to_string(profile) {
            Ok(json) => {
                if let Err(e) = self.cache.set(cache_keys::USER_PROFILE, &json) {
                    tracing::warn!(error = %e, "Could not cache profile");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Could not serialize profile"),
        }
    }
}
