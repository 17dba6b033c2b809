//! Response normalization shared by every remote store client.
//!
//! All clients read responses through these two functions so that status
//! codes, refusal bodies and parse failures map to the same [`StoreError`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::Timestamp;
use crate::ports::{RawResponse, StoreError};

/// Acknowledgment of a write accepted by the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub acknowledged_at: Timestamp,
    /// The full acknowledgment body.
    pub body: Value,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    success: Option<bool>,
    error: Option<String>,
    message: Option<String>,
}

/// Extracts a human-readable refusal reason from an error body, if any.
fn refusal_message(body: &str) -> Option<String> {
    let envelope: AckEnvelope = serde_json::from_str(body).ok()?;
    envelope.error.or(envelope.message)
}

/// Interprets a write response.
///
/// Succeeds only for a 2xx status whose JSON body carries `success: true`.
pub(crate) fn read_ack(response: RawResponse) -> Result<Ack, StoreError> {
    if !response.is_success() {
        return Err(StoreError::rejected(
            response.status,
            refusal_message(&response.body),
        ));
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| StoreError::MalformedResponse(format!("acknowledgment is not JSON: {}", e)))?;
    let envelope: AckEnvelope = serde_json::from_value(body.clone())
        .map_err(|e| StoreError::MalformedResponse(format!("unexpected acknowledgment: {}", e)))?;

    match envelope.success {
        Some(true) => Ok(Ack {
            acknowledged_at: Timestamp::now(),
            body,
        }),
        Some(false) => Err(StoreError::rejected(
            response.status,
            envelope.error.or(envelope.message),
        )),
        None => Err(StoreError::MalformedResponse(
            "acknowledgment lacks a success flag".to_string(),
        )),
    }
}

/// Interprets a read response as `T`.
pub(crate) fn read_json<T: DeserializeOwned>(response: RawResponse) -> Result<T, StoreError> {
    if !response.is_success() {
        return Err(StoreError::rejected(
            response.status,
            refusal_message(&response.body),
        ));
    }
    serde_json::from_str(&response.body).map_err(|e| StoreError::MalformedResponse(e.to_string()))
}
