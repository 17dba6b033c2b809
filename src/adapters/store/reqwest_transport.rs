//! HTTP transport to the remote preference store.
//!
//! Sends JSON over HTTP with reqwest. Every request carries a fresh
//! `X-Request-Id` and, when configured, the session cookie that identifies
//! the signed-in user.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::ports::{RawResponse, StoreTransport, TransportError};

/// Connection settings for the remote store.
#[derive(Clone)]
pub struct HttpStoreConfig {
    /// Base URL such as `http://localhost:3000`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Raw `Cookie` header value carrying the session.
    session_cookie: Option<Secret<String>>,
}

impl HttpStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            session_cookie: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(Secret::new(cookie.into()));
        self
    }

    pub fn with_session_secret(mut self, cookie: Secret<String>) -> Self {
        self.session_cookie = Some(cookie);
        self
    }

    pub fn has_session(&self) -> bool {
        self.session_cookie.is_some()
    }
}

impl std::fmt::Debug for HttpStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStoreConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("session_cookie", &self.session_cookie.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// reqwest-backed [`StoreTransport`].
pub struct ReqwestStoreTransport {
    config: HttpStoreConfig,
    client: Client,
}

impl ReqwestStoreTransport {
    /// Creates the transport.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Connection` if the HTTP client cannot be built.
    pub fn new(config: HttpStoreConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn decorate(&self, request: RequestBuilder, request_id: &str) -> RequestBuilder {
        let request = request.header("X-Request-Id", request_id);
        match &self.config.session_cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie.expose_secret().as_str()),
            None => request,
        }
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if err.is_connect() {
            TransportError::Connection(format!("connection failed: {}", err))
        } else {
            TransportError::Connection(err.to_string())
        }
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<RawResponse, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let response = self
            .decorate(request, &request_id)
            .send()
            .await
            .map_err(|e| {
                let err = self.map_error(e);
                tracing::warn!(method, path, request_id = %request_id, error = %err, "Store request failed");
                err
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_error(e))?;
        tracing::debug!(method, path, request_id = %request_id, status, "Store responded");

        Ok(RawResponse::new(status, body))
    }
}

#[async_trait]
impl StoreTransport for ReqwestStoreTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        let request = self.client.get(self.url(path));
        self.send("GET", path, request).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<RawResponse, TransportError> {
        let request = self.client.post(self.url(path)).json(&body);
        self.send("POST", path, request).await
    }
}
