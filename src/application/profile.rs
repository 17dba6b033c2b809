//! ProfileController - the demographic profile step that precedes the wizard.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{ErrorCode, StateMachine, StepName};
use crate::domain::gate::{GateVerdict, ProfileGate};
use crate::domain::profile::{AgeRange, DemographicProfile, Gender, ProfileDraft};
use crate::domain::wizard::WizardStatus;
use crate::ports::{cache_keys, CacheError, LocalCache, Navigator, StoreError};

use super::persistence::PersistenceClient;
use super::wizard::SubmitGuard;

const SAVE_PATH: &str = "/api/save-profile";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("profile is incomplete: missing {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("profile cannot change while it is {0:?}")]
    Locked(WizardStatus),

    #[error(transparent)]
    Save(#[from] StoreError),
}

impl ProfileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProfileError::Incomplete(_) => ErrorCode::ValidationFailed,
            ProfileError::Locked(WizardStatus::Submitting) => ErrorCode::SubmissionInFlight,
            ProfileError::Locked(_) => ErrorCode::InvalidStateTransition,
            ProfileError::Save(err) => err.code(),
        }
    }
}

pub struct ProfileController {
    draft: ProfileDraft,
    status: WizardStatus,
    inline_error: Option<&'static str>,
    persistence: PersistenceClient,
    navigator: Arc<dyn Navigator>,
    cache: Arc<dyn LocalCache>,
}

impl ProfileController {
    pub fn new(
        persistence: PersistenceClient,
        navigator: Arc<dyn Navigator>,
        cache: Arc<dyn LocalCache>,
    ) -> Self {
        Self {
            draft: ProfileDraft::new(),
            status: WizardStatus::default(),
            inline_error: None,
            persistence,
            navigator,
            cache,
        }
    }

    /// Prefills the form from the cached profile, if one is present and readable.
    pub fn prefill_from_cache(&mut self) {
        let cached = match self.cache.get(cache_keys::USER_PROFILE) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read cached profile");
                return;
            }
        };
        match serde_json::from_str::<DemographicProfile>(&cached) {
            Ok(profile) => {
                if let Some(name) = &profile.display_name {
                    self.draft.set_display_name(name);
                }
                self.draft.gender = profile.gender.or(self.draft.gender);
                self.draft.age_range = profile.age_range.or(self.draft.age_range);
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring unreadable cached profile"),
        }
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn inline_error(&self) -> Option<&'static str> {
        self.inline_error
    }

    pub fn affordance(&self) -> GateVerdict {
        match self.status {
            WizardStatus::Submitting => GateVerdict::saving(),
            WizardStatus::Advanced => GateVerdict {
                can_advance: false,
                ..ProfileGate::evaluate(&self.draft)
            },
            _ => ProfileGate::evaluate(&self.draft),
        }
    }

    pub fn set_display_name(&mut self, name: &str) -> Result<GateVerdict, ProfileError> {
        self.edit(|draft| draft.set_display_name(name))
    }

    pub fn set_gender(&mut self, gender: Gender) -> Result<GateVerdict, ProfileError> {
        self.edit(|draft| draft.gender = Some(gender))
    }

    pub fn set_age_range(&mut self, age_range: AgeRange) -> Result<GateVerdict, ProfileError> {
        self.edit(|draft| draft.age_range = Some(age_range))
    }

    fn edit(&mut self, f: impl FnOnce(&mut ProfileDraft)) -> Result<GateVerdict, ProfileError> {
        if !self.status.accepts_mutations() {
            return Err(ProfileError::Locked(self.status));
        }
        if self.status != WizardStatus::Editing {
            self.transition(WizardStatus::Editing)?;
        }
        f(&mut self.draft);
        self.inline_error = None;
        Ok(self.affordance())
    }

    /// Saves the profile, caches it and opens the brand step.
    ///
    /// # Errors
    ///
    /// - `Incomplete` naming the unset fields; nothing is sent
    /// - `Save` if the store did not acknowledge; the form stays editable
    ///
    /// Dropping the future before the store answers also leaves the form
    /// editable.
    pub async fn submit(&mut self) -> Result<DemographicProfile, ProfileError> {
        if matches!(
            self.status,
            WizardStatus::Submitting | WizardStatus::Advanced
        ) {
            return Err(ProfileError::Locked(self.status));
        }
        let missing = ProfileGate::missing_fields(&self.draft);
        if !missing.is_empty() {
            return Err(ProfileError::Incomplete(missing));
        }
        let profile = self
            .draft
            .to_profile()
            .map_err(|_| ProfileError::Incomplete(ProfileGate::missing_fields(&self.draft)))?;
        let payload = serde_json::to_value(&profile)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;

        if self.status == WizardStatus::Idle {
            self.transition(WizardStatus::Editing)?;
        }
        self.transition(WizardStatus::Submitting)?;
        self.inline_error = None;

        let persistence = self.persistence.clone();
        let submitting = SubmitGuard::new("profile", &mut self.status);
        let saved = persistence.save(SAVE_PATH, payload).await;
        submitting.disarm();

        match saved {
            Ok(_) => {
                self.transition(WizardStatus::Advanced)?;
                self.mirror(&profile);
                tracing::info!("Profile saved");
                self.navigator.navigate(StepName::Brand.route());
                Ok(profile)
            }
            Err(err) => {
                self.transition(WizardStatus::Failed)?;
                self.inline_error = Some(err.user_message());
                self.transition(WizardStatus::Editing)?;
                tracing::warn!(error = %err, "Profile save failed");
                Err(err.into())
            }
        }
    }

    fn transition(&mut self, to: WizardStatus) -> Result<(), ProfileError> {
        let from = self.status;
        self.status = from.transition_to(to).map_err(|e| {
            tracing::error!(?from, ?to, error = %e, "Invalid profile transition");
            ProfileError::Locked(from)
        })?;
        Ok(())
    }

    fn mirror(&self, profile: &DemographicProfile) {
        let result = serde_json::to_string(profile)
            .map_err(CacheError::from)
            .and_then(|json| self.cache.set(cache_keys::USER_PROFILE, &json));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Could not cache profile");
        }
    }
}
