//! Store transport port - raw request/response exchange with the remote store.
//!
//! The transport only moves bytes. Interpreting status codes and bodies is the
//! job of the application clients, so every call site shares one error
//! taxonomy ([`StoreError`]).
//!
//! # Design
//!
//! - **One call per request**: implementations never retry
//! - **Relative paths**: `/api/save-budget`, resolved against the store base URL
//! - **Object safe**: clients hold `Arc<dyn StoreTransport>`

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Port for talking to the remote preference store.
#[async_trait]
pub trait StoreTransport: Send + Sync {
    /// Issues a GET for `path`.
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError>;

    /// Issues a POST of a JSON body to `path`.
    async fn post(&self, path: &str, body: Value) -> Result<RawResponse, TransportError>;
}

/// Status and body exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Builds a response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Normalized failure of a remote store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No response: connection refused, DNS, timeout.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The store answered but refused the request.
    #[error("server rejected the request with status {}{}", .status, message_suffix(.message))]
    ServerRejected {
        status: u16,
        message: Option<String>,
    },

    /// The store answered with a body that could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl StoreError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        StoreError::ServerRejected { status, message }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NetworkUnavailable(_) => ErrorCode::NetworkUnavailable,
            StoreError::ServerRejected { .. } => ErrorCode::ServerRejected,
            StoreError::MalformedResponse(_) => ErrorCode::MalformedResponse,
        }
    }

    /// Message suitable for showing next to the interrupted control.
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::NetworkUnavailable(_) => {
                "Connection error. Please check your connection and try again."
            }
            StoreError::ServerRejected { .. } | StoreError::MalformedResponse(_) => {
                "Your selection could not be saved. Please try again."
            }
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl From<TransportError> for StoreError {
    fn from(err: TransportError) -> Self {
        StoreError::NetworkUnavailable(err.to_string())
    }
}
