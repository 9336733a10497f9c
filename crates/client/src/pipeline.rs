//! Outbound request pipeline.
//!
//! Every business request goes through [`ApiClient`]: the bearer token is
//! attached automatically, and an authorization failure triggers at most
//! one silent-refresh-and-retry per logical request. Nothing else is
//! intercepted; validation failures and other statuses pass through for
//! the calling feature to interpret.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use thiserror::Error;

use eventdesk_session::SessionStore;

use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP client for business endpoints.
///
/// Holds the long business timeout; auth traffic runs on the separate
/// short-timeout client inside the session store's backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a GET request against a backend path.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    /// Start a POST request against a backend path.
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Build and send a request through the pipeline.
    pub async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.execute(request).await
    }

    /// Send a prebuilt request through the pipeline.
    ///
    /// Guarantee: at most one retry per logical request. The retried
    /// request's response is returned as-is, even if it is another
    /// authorization failure; retries never cascade.
    pub async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, ApiError> {
        // Keep a clone for the single permitted retry. Requests with a
        // streaming body cannot be cloned and are never retried.
        let retry = request.try_clone();

        let response = self.dispatch(request).await?;
        if !is_auth_failure(response.status()) {
            return Ok(response);
        }

        let Some(retry_request) = retry else {
            return Ok(response);
        };

        tracing::debug!(
            status = response.status().as_u16(),
            "authorization failure, attempting one refresh-and-retry"
        );
        if self.session.silent_refresh().await.is_err() {
            // Refresh failed: surface the original authorization failure.
            return Ok(response);
        }

        self.dispatch(retry_request).await
    }

    /// Attach the bearer token (when present) and send.
    async fn dispatch(&self, mut request: reqwest::Request) -> Result<reqwest::Response, ApiError> {
        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    request.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(_) => {
                    tracing::warn!("stored token is not a valid header value; sending without it");
                }
            }
        }

        self.http
            .execute(request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}
