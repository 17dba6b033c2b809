//! Scripted transport for exercising clients against exact responses.
//!
//! # Features
//!
//! - Queued replies, consumed in order
//! - Simulated latency
//! - A hold gate that parks requests until the test releases them
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let transport = ScriptedTransport::new()
//!     .with_response(500, json!({"success": false, "error": "db down"}));
//!
//! let err = client.save("/api/save-budget", json!({"budget": "0-10k"})).await;
//! assert_eq!(transport.call_count(), 1);
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::ports::{RawResponse, StoreTransport, TransportError};

/// A request seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum ScriptedReply {
    Respond(RawResponse),
    Fail(TransportError),
}

#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Duration,
    hold: Option<Arc<Semaphore>>,
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedTransport {
    /// Creates a transport that acknowledges everything with `{"success": true}`.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
            hold: None,
        }
    }

    /// Queues a JSON response.
    pub fn with_response(self, status: u16, body: Value) -> Self {
        self.push(ScriptedReply::Respond(RawResponse::json(status, &body)));
        self
    }

    /// Queues a response with a raw, possibly non-JSON body.
    pub fn with_raw_response(self, status: u16, body: impl Into<String>) -> Self {
        self.push(ScriptedReply::Respond(RawResponse::new(status, body)));
        self
    }

    /// Queues a failure where no response arrives.
    pub fn with_failure(self, error: TransportError) -> Self {
        self.push(ScriptedReply::Fail(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Parks every request until [`release`](Self::release) lets it through.
    pub fn held(mut self) -> Self {
        self.hold = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Lets `count` parked requests proceed.
    pub fn release(&self, count: usize) {
        if let Some(hold) = &self.hold {
            hold.add_permits(count);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Paths requested, oldest first.
    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    fn push(&self, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    fn next_reply(&self) -> ScriptedReply {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                ScriptedReply::Respond(RawResponse::json(200, &json!({"success": true})))
            })
    }

    async fn answer(&self, call: RecordedCall) -> Result<RawResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        if let Some(hold) = &self.hold {
            let permit = hold
                .acquire()
                .await
                .map_err(|_| TransportError::Connection("transport shut down".to_string()))?;
            permit.forget();
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            ScriptedReply::Respond(response) => Ok(response),
            ScriptedReply::Fail(err) => Err(err),
        }
    }
}

#[async_trait]
impl StoreTransport for ScriptedTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.answer(RecordedCall {
            method: "GET",
            path: path.to_string(),
            body: None,
        })
        .await
    }

    async fn post(&self, path: &str, body: Value) -> Result<RawResponse, TransportError> {
        self.answer(RecordedCall {
            method: "POST",
            path: path.to_string(),
            body: Some(body),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_consumed_in_order_then_default() {
        let transport = ScriptedTransport::new()
            .with_response(500, json!({"success": false}))
            .with_failure(TransportError::Timeout { timeout_secs: 1 });

        assert_eq!(transport.get("/a").await.unwrap().status, 500);
        assert!(transport.get("/b").await.is_err());
        let third = transport.post("/c", json!({})).await.unwrap();
        assert_eq!(third.status, 200);

        assert_eq!(transport.paths(), vec!["/a", "/b", "/c"]);
        assert_eq!(transport.calls()[2].body, Some(json!({})));
    }

    #[tokio::test]
    async fn held_requests_wait_for_release() {
        let transport = ScriptedTransport::new().held();
        let pending = {
            let transport = transport.clone();
            tokio::spawn(async move { transport.get("/api/user-info").await })
        };

        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        transport.release(1);
        let response = pending.await.unwrap().unwrap();
        assert!(response.is_success());
    }
}
