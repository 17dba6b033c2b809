//! PersistenceClient - saves one step's selection to the remote store.
//!
//! One request per call, no retry. The caller decides what to do with the
//! result; the client itself never navigates.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::domain::foundation::{OptionId, SelectionMode, StepName};
use crate::ports::{StoreError, StoreTransport};

use super::responses::{read_ack, Ack};

/// Builds the body the store expects for a step.
///
/// Single-select steps send their one value as a string, multi-select steps
/// send an array. Returns None for steps that do not collect a selection or
/// for a single-select step without a value.
pub fn step_payload(step: StepName, values: &[OptionId]) -> Option<Value> {
    let key = step.payload_key()?;
    let value = match step.selection_mode()? {
        SelectionMode::Single => json!(values.first()?.as_str()),
        SelectionMode::Multi => json!(values.iter().map(OptionId::as_str).collect::<Vec<_>>()),
    };
    Some(json!({ key: value }))
}

#[derive(Clone)]
pub struct PersistenceClient {
    transport: Arc<dyn StoreTransport>,
}

impl PersistenceClient {
    pub fn new(transport: Arc<dyn StoreTransport>) -> Self {
        Self { transport }
    }

    /// Posts `payload` to `endpoint` and normalizes the answer.
    ///
    /// # Errors
    ///
    /// - `NetworkUnavailable` when no response arrived
    /// - `ServerRejected` for non-2xx statuses or `success: false`
    /// - `MalformedResponse` when the body is not a valid acknowledgment
    pub async fn save(&self, endpoint: &str, payload: Value) -> Result<Ack, StoreError> {
        tracing::debug!(endpoint, "Saving selection");

        let response = self.transport.post(endpoint, payload).await.map_err(|e| {
            tracing::warn!(endpoint, error = %e, "Save request did not reach the store");
            StoreError::from(e)
        })?;

        let status = response.status;
        match read_ack(response) {
            Ok(ack) => {
                tracing::info!(endpoint, status, "Selection saved");
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!(endpoint, status, error = %err, "Save was not acknowledged");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oids(values: &[&str]) -> Vec<OptionId> {
        values.iter().map(|v| OptionId::new(*v).unwrap()).collect()
    }

    #[test]
    fn multi_select_payload_is_an_array() {
        assert_eq!(
            step_payload(StepName::Brand, &oids(&["Toyota", "Honda"])),
            Some(json!({"brands": ["Toyota", "Honda"]}))
        );
        assert_eq!(
            step_payload(StepName::Type, &oids(&["suv"])),
            Some(json!({"types": ["suv"]}))
        );
    }

    #[test]
    fn single_select_payload_is_a_string() {
        assert_eq!(
            step_payload(StepName::Budget, &oids(&["20k-30k"])),
            Some(json!({"budget": "20k-30k"}))
        );
        assert_eq!(
            step_payload(StepName::Transmission, &oids(&["manual"])),
            Some(json!({"transmission": "manual"}))
        );
    }

    #[test]
    fn no_payload_without_value_or_selection_step() {
        assert_eq!(step_payload(StepName::Fuel, &[]), None);
        assert_eq!(step_payload(StepName::Recommendations, &oids(&["x"])), None);
    }
}
