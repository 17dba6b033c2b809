//! WizardController - one selection step from first click to navigation.
//!
//! Owns the step's selection and its submit state machine:
//!
//! ```text
//! Idle ──► Editing ──► Submitting ──► Advanced
//!             ▲             │
//!             └── Failed ◄──┘
//! ```
//!
//! Navigation to the next step happens only after the store acknowledged the
//! save. Paged steps (brand) move through their option groups before saving.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::catalog::{OptionGroup, StepCatalog};
use crate::domain::foundation::{
    DomainError, ErrorCode, GroupId, OptionId, StateMachine, StepName, Timestamp,
};
use crate::domain::gate::{GateVerdict, StepGate, StepPredicate};
use crate::domain::selection::SelectionStore;
use crate::domain::wizard::{GroupCursor, WizardStatus};
use crate::ports::{cache_keys, LocalCache, Navigator, StoreError};

use super::persistence::{step_payload, PersistenceClient};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("step '{0}' does not collect a selection")]
    NotASelectionStep(StepName),

    #[error("selection cannot change while the wizard is {0:?}")]
    SelectionLocked(WizardStatus),

    #[error(transparent)]
    InvalidOption(#[from] DomainError),

    #[error("cannot continue yet: {0}")]
    NotReady(String),

    #[error("invalid selection state: {0}")]
    InvalidSelectionState(String),

    #[error(transparent)]
    Save(#[from] StoreError),
}

impl WizardError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WizardError::NotASelectionStep(_) => ErrorCode::UnknownStep,
            WizardError::SelectionLocked(WizardStatus::Submitting) => ErrorCode::SubmissionInFlight,
            WizardError::SelectionLocked(_) => ErrorCode::InvalidStateTransition,
            WizardError::InvalidOption(err) => err.code,
            WizardError::NotReady(_) => ErrorCode::ValidationFailed,
            WizardError::InvalidSelectionState(_) => ErrorCode::InvalidSelectionState,
            WizardError::Save(err) => err.code(),
        }
    }
}

/// Result of an accepted continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueOutcome {
    /// Moved to the next option group of a paged step; nothing was saved.
    NextGroup { position: usize, total: usize },
    /// The selection was saved and navigation to `next` fired.
    Advanced { next: StepName },
}

pub struct WizardController {
    step: StepName,
    catalog: Arc<StepCatalog>,
    predicate: StepPredicate,
    selection: SelectionStore,
    status: WizardStatus,
    cursor: GroupCursor,
    inline_error: Option<&'static str>,
    saved_at: Option<Timestamp>,
    persistence: PersistenceClient,
    navigator: Arc<dyn Navigator>,
    cache: Option<Arc<dyn LocalCache>>,
}

impl WizardController {
    /// Creates the controller for `step`.
    ///
    /// # Errors
    ///
    /// Returns `NotASelectionStep` for the recommendations view.
    pub fn new(
        step: StepName,
        catalog: Arc<StepCatalog>,
        persistence: PersistenceClient,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, WizardError> {
        let groups = catalog.groups(step);
        let predicate = StepPredicate::for_step(step)
            .ok_or(WizardError::NotASelectionStep(step))?
            .with_option_labels(
                groups
                    .iter()
                    .flat_map(|g| g.options.iter())
                    .map(|o| (o.id.clone(), o.label.clone())),
            );
        let cursor = GroupCursor::new(groups.len());

        Ok(Self {
            step,
            catalog,
            predicate,
            selection: SelectionStore::new(),
            status: WizardStatus::default(),
            cursor,
            inline_error: None,
            saved_at: None,
            persistence,
            navigator,
            cache: None,
        })
    }

    /// Mirrors acknowledged selections into `cache`.
    pub fn with_cache(mut self, cache: Arc<dyn LocalCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn step(&self) -> StepName {
        self.step
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn cursor(&self) -> GroupCursor {
        self.cursor
    }

    /// The option group currently on screen.
    pub fn visible_group(&self) -> Option<&OptionGroup> {
        self.catalog.groups(self.step).get(self.cursor.index())
    }

    /// Message shown next to the continue control after a failed save.
    pub fn inline_error(&self) -> Option<&'static str> {
        self.inline_error
    }

    /// When the store acknowledged this step's selection.
    pub fn saved_at(&self) -> Option<Timestamp> {
        self.saved_at
    }

    /// Current state of the continue control.
    pub fn affordance(&self) -> GateVerdict {
        match self.status {
            WizardStatus::Submitting => GateVerdict::saving(),
            WizardStatus::Advanced => GateVerdict {
                can_advance: false,
                ..StepGate::evaluate(&self.selection, &self.predicate)
            },
            _ => StepGate::evaluate(&self.selection, &self.predicate),
        }
    }

    /// Applies a click on `option_id` in `group_id` and re-evaluates the gate.
    ///
    /// # Errors
    ///
    /// - `SelectionLocked` while submitting or after advancing
    /// - `InvalidOption` if the option is not in the catalog for this step
    pub fn select(&mut self, group_id: &str, option_id: &str) -> Result<GateVerdict, WizardError> {
        if !self.status.accepts_mutations() {
            return Err(WizardError::SelectionLocked(self.status));
        }

        let group_id = GroupId::new(group_id).map_err(DomainError::from)?;
        let option_id = OptionId::new(option_id).map_err(DomainError::from)?;
        let option = self.catalog.option(self.step, &group_id, &option_id)?;
        let mode = self
            .step
            .selection_mode()
            .ok_or_else(|| invalid_state(format!("step '{}' has no selection mode", self.step)))?;

        if self.status != WizardStatus::Editing {
            self.transition(WizardStatus::Editing)?;
        }
        self.selection.set(&option.group_id, &option.id, mode);
        self.inline_error = None;

        let verdict = self.affordance();
        tracing::debug!(
            step = %self.step,
            group = %option.group_id,
            option = %option.id,
            selected = self.selection.count(None),
            can_advance = verdict.can_advance,
            "Selection changed"
        );
        Ok(verdict)
    }

    /// Selects a suggested option unless it is already selected.
    ///
    /// Returns false when the option is unknown to this step or already chosen.
    pub fn apply_suggestion(&mut self, option_id: &str) -> Result<bool, WizardError> {
        let Some(option) = self.catalog.find_option(self.step, option_id) else {
            return Ok(false);
        };
        if self.selection.contains(&option.group_id, &option.id) {
            return Ok(false);
        }
        self.select(option.group_id.as_str(), option.id.as_str())?;
        Ok(true)
    }

    /// Shows the previous option group of a paged step.
    pub fn back_group(&mut self) -> bool {
        self.status.accepts_mutations() && self.cursor.retreat()
    }

    /// Handles an explicit continue.
    ///
    /// On a non-final option group the cursor just moves on. On the final
    /// group the selection is saved once; navigation fires after the
    /// acknowledgment.
    /// Dropping the future before the store answers puts the controller back
    /// into Editing without navigating.
    ///
    /// # Errors
    ///
    /// - `NotReady` if the gate is closed
    /// - `SelectionLocked` while submitting or after advancing
    /// - `Save` if the store did not acknowledge; the controller is back to
    ///   Editing with the affordance re-enabled and an inline message set
    pub async fn continue_step(&mut self) -> Result<ContinueOutcome, WizardError> {
        if matches!(
            self.status,
            WizardStatus::Submitting | WizardStatus::Advanced
        ) {
            return Err(WizardError::SelectionLocked(self.status));
        }

        let verdict = StepGate::evaluate(&self.selection, &self.predicate);
        if !verdict.can_advance {
            return Err(WizardError::NotReady(verdict.affordance_label));
        }

        if self.cursor.advance() {
            tracing::debug!(
                step = %self.step,
                position = self.cursor.position(),
                total = self.cursor.total(),
                "Showing next option group"
            );
            return Ok(ContinueOutcome::NextGroup {
                position: self.cursor.position(),
                total: self.cursor.total(),
            });
        }

        let values = self.selection.values(None);
        let payload = step_payload(self.step, &values)
            .ok_or_else(|| invalid_state(format!("no payload for step '{}'", self.step)))?;
        let endpoint = self
            .step
            .save_path()
            .ok_or_else(|| invalid_state(format!("no save route for step '{}'", self.step)))?;
        let next = self
            .step
            .next()
            .ok_or_else(|| invalid_state(format!("step '{}' has no successor", self.step)))?;

        self.transition(WizardStatus::Submitting)?;
        self.inline_error = None;

        let persistence = self.persistence.clone();
        let submitting = SubmitGuard::new(self.step.as_str(), &mut self.status);
        let saved = persistence.save(endpoint, payload).await;
        submitting.disarm();

        match saved {
            Ok(ack) => {
                self.transition(WizardStatus::Advanced)?;
                self.saved_at = Some(ack.acknowledged_at);
                self.mirror_selection(&values);
                tracing::info!(step = %self.step, next = %next, "Step saved, advancing");
                self.navigator.navigate(next.route());
                Ok(ContinueOutcome::Advanced { next })
            }
            Err(err) => {
                self.transition(WizardStatus::Failed)?;
                self.inline_error = Some(err.user_message());
                self.transition(WizardStatus::Editing)?;
                tracing::warn!(step = %self.step, error = %err, "Step save failed");
                Err(WizardError::Save(err))
            }
        }
    }

    fn transition(&mut self, to: WizardStatus) -> Result<(), WizardError> {
        self.status = self
            .status
            .transition_to(to)
            .map_err(|e| invalid_state(e.to_string()))?;
        Ok(())
    }

    fn mirror_selection(&self, values: &[OptionId]) {
        let Some(cache) = &self.cache else {
            return;
        };
        let json = Value::from(values.iter().map(OptionId::as_str).collect::<Vec<_>>()).to_string();
        if let Err(e) = cache.set(&cache_keys::selection(self.step), &json) {
            tracing::warn!(step = %self.step, error = %e, "Could not cache selection");
        }
    }
}

/// Puts a controller back into Editing if its save future is dropped while
/// Submitting, so the form stays usable.
pub(super) struct SubmitGuard<'a> {
    scope: &'static str,
    status: Option<&'a mut WizardStatus>,
}

impl<'a> SubmitGuard<'a> {
    pub(super) fn new(scope: &'static str, status: &'a mut WizardStatus) -> Self {
        Self {
            scope,
            status: Some(status),
        }
    }

    /// Called once the save resolved; the caller takes over the status.
    pub(super) fn disarm(mut self) {
        self.status = None;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        let Some(status) = self.status.take() else {
            return;
        };
        let reset = status
            .transition_to(WizardStatus::Failed)
            .and_then(|failed| failed.transition_to(WizardStatus::Editing));
        if let Ok(editing) = reset {
            tracing::warn!(scope = self.scope, "Save dropped before acknowledgment");
            *status = editing;
        }
    }
}

/// Reports a wiring defect: panics in debug builds, typed error otherwise.
fn invalid_state(detail: String) -> WizardError {
    tracing::error!(detail = %detail, "Invalid selection state");
    if cfg!(debug_assertions) {
        panic!("invalid selection state: {}", detail);
    }
    WizardError::InvalidSelectionState(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCache, RecordingNavigator, ScriptedTransport};
    use serde_json::json;

    struct Fixture {
        transport: ScriptedTransport,
        navigator: RecordingNavigator,
        cache: InMemoryCache,
    }

    impl Fixture {
        fn new(transport: ScriptedTransport) -> Self {
            Self {
                transport,
                navigator: RecordingNavigator::new(),
                cache: InMemoryCache::new(),
            }
        }

        fn wizard(&self, step: StepName) -> WizardController {
            let catalog = Arc::new(StepCatalog::embedded().unwrap());
            WizardController::new(
                step,
                catalog,
                PersistenceClient::new(Arc::new(self.transport.clone())),
                Arc::new(self.navigator.clone()),
            )
            .unwrap()
            .with_cache(Arc::new(self.cache.clone()))
        }
    }

    #[test]
    fn recommendations_is_not_a_selection_step() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let result = WizardController::new(
            StepName::Recommendations,
            Arc::new(StepCatalog::embedded().unwrap()),
            PersistenceClient::new(Arc::new(fixture.transport.clone())),
            Arc::new(fixture.navigator.clone()),
        );
        assert!(matches!(result, Err(WizardError::NotASelectionStep(_))));
    }

    #[test]
    fn first_selection_moves_idle_to_editing() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Budget);
        assert_eq!(wizard.status(), WizardStatus::Idle);
        assert!(!wizard.affordance().can_advance);

        let verdict = wizard.select("budget", "10k-20k").unwrap();
        assert!(verdict.can_advance);
        assert_eq!(wizard.status(), WizardStatus::Editing);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Fuel);
        let err = wizard.select("fuel", "steam").unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownOption);
        assert!(wizard.selection().is_empty(None));
    }

    #[tokio::test]
    async fn budget_saves_last_pick_and_navigates() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Budget);
        wizard.select("budget", "10k-20k").unwrap();
        wizard.select("budget", "20k-30k").unwrap();

        let outcome = wizard.continue_step().await.unwrap();

        assert_eq!(
            outcome,
            ContinueOutcome::Advanced {
                next: StepName::Fuel
            }
        );
        assert_eq!(wizard.status(), WizardStatus::Advanced);
        assert!(wizard.saved_at().is_some());
        assert_eq!(
            fixture.transport.calls()[0].body,
            Some(json!({"budget": "20k-30k"}))
        );
        assert_eq!(fixture.navigator.routes(), vec!["/fuel"]);
        assert_eq!(
            fixture
                .cache
                .get(&cache_keys::selection(StepName::Budget))
                .unwrap()
                .as_deref(),
            Some(r#"["20k-30k"]"#)
        );
    }

    #[tokio::test]
    async fn server_error_returns_to_editing_without_navigation() {
        let fixture = Fixture::new(
            ScriptedTransport::new().with_response(500, json!({"success": false})),
        );
        let mut wizard = fixture.wizard(StepName::Fuel);
        wizard.select("fuel", "diesel").unwrap();

        let err = wizard.continue_step().await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ServerRejected);
        assert_eq!(wizard.status(), WizardStatus::Editing);
        assert!(wizard.affordance().can_advance);
        assert!(wizard.inline_error().is_some());
        assert!(fixture.navigator.routes().is_empty());
        assert!(fixture.cache.is_empty());
    }

    #[tokio::test]
    async fn retry_after_failure_can_succeed() {
        let fixture = Fixture::new(
            ScriptedTransport::new().with_raw_response(200, "not json"),
        );
        let mut wizard = fixture.wizard(StepName::Transmission);
        wizard.select("transmission", "manual").unwrap();

        assert!(wizard.continue_step().await.is_err());
        let outcome = wizard.continue_step().await.unwrap();

        assert_eq!(
            outcome,
            ContinueOutcome::Advanced {
                next: StepName::Recommendations
            }
        );
        assert_eq!(fixture.navigator.routes(), vec!["/recommendations"]);
        assert_eq!(fixture.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn dropped_save_returns_to_editing() {
        let fixture = Fixture::new(ScriptedTransport::new().held());
        let mut wizard = fixture.wizard(StepName::Budget);
        wizard.select("budget", "0-10k").unwrap();

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            wizard.continue_step(),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(wizard.status(), WizardStatus::Editing);
        assert!(wizard.affordance().can_advance);
        assert!(fixture.navigator.routes().is_empty());

        wizard.select("budget", "10k-20k").unwrap();
        fixture.transport.release(1);
        let outcome = wizard.continue_step().await.unwrap();
        assert_eq!(
            outcome,
            ContinueOutcome::Advanced {
                next: StepName::Fuel
            }
        );
        assert_eq!(
            fixture.transport.calls()[1].body,
            Some(json!({"budget": "10k-20k"}))
        );
    }

    #[tokio::test]
    async fn blocked_gate_sends_nothing() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Type);

        let err = wizard.continue_step().await.unwrap_err();

        assert_eq!(err, WizardError::NotReady("Select at least one type".to_string()));
        assert_eq!(fixture.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn brand_groups_page_before_saving() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Brand);
        assert_eq!(wizard.cursor().total(), 4);

        wizard.select("1", "Toyota").unwrap();
        assert_eq!(
            wizard.continue_step().await.unwrap(),
            ContinueOutcome::NextGroup {
                position: 2,
                total: 4
            }
        );
        assert_eq!(wizard.visible_group().unwrap().id.as_str(), "2");

        assert!(wizard.back_group());
        assert_eq!(wizard.cursor().position(), 1);
        wizard.continue_step().await.unwrap();
        wizard.continue_step().await.unwrap();
        wizard.continue_step().await.unwrap();
        assert_eq!(fixture.transport.call_count(), 0);

        let outcome = wizard.continue_step().await.unwrap();
        assert_eq!(
            outcome,
            ContinueOutcome::Advanced {
                next: StepName::Budget
            }
        );
        assert_eq!(
            fixture.transport.calls()[0].body,
            Some(json!({"brands": ["Toyota"]}))
        );
    }

    #[tokio::test]
    async fn advanced_controller_refuses_mutations() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Fuel);
        wizard.select("fuel", "electrico").unwrap();
        wizard.continue_step().await.unwrap();

        assert_eq!(
            wizard.select("fuel", "diesel").unwrap_err(),
            WizardError::SelectionLocked(WizardStatus::Advanced)
        );
        assert!(!wizard.affordance().can_advance);
        assert!(!wizard.back_group());
        assert!(wizard.continue_step().await.is_err());
        assert_eq!(fixture.transport.call_count(), 1);
    }

    #[test]
    fn transmission_label_names_the_choice() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Transmission);
        let verdict = wizard.select("transmission", "semiautomatic").unwrap();
        assert_eq!(verdict.affordance_label, "See recommendations (Semi-automatic)");
    }

    #[test]
    fn suggestions_are_applied_once() {
        let fixture = Fixture::new(ScriptedTransport::new());
        let mut wizard = fixture.wizard(StepName::Type);
        assert!(wizard.apply_suggestion("suv").unwrap());
        assert!(!wizard.apply_suggestion("suv").unwrap());
        assert!(!wizard.apply_suggestion("spaceship").unwrap());
        assert_eq!(wizard.selection().count(None), 1);
    }
}
