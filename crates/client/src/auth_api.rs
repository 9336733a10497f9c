//! HTTP implementation of the authentication backend contract.
//!
//! Uses its own short-timeout reqwest client with a cookie store: the
//! refresh endpoint authenticates through a same-site cookie set at login,
//! not through the expiring access token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use eventdesk_session::{AuthBackend, BackendError};

use crate::config::ClientConfig;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UpdatePasswordResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed [`AuthBackend`].
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.auth_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        let response = self
            .http
            .post(self.url("/auth/token"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(network)?;

        token_from(response).await
    }

    async fn refresh(&self) -> Result<String, BackendError> {
        // The cookie jar carries the refresh credential.
        let response = self
            .http
            .post(self.url("/auth/refresh"))
            .send()
            .await
            .map_err(network)?;

        token_from(response).await
    }

    async fn logout(&self) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.url("/auth/logout"))
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(BackendError::Api(status.as_u16(), body_of(response).await))
        }
    }

    async fn update_password(&self, current: &str, new: &str) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.url("/users/update-password"))
            .json(&UpdatePasswordRequest {
                current_password: current,
                new_password: new,
            })
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection_from(status, body_of(response).await));
        }

        let body: UpdatePasswordResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        match body.error {
            Some(error) => Err(BackendError::Rejected(
                body.message.unwrap_or(error),
            )),
            None => Ok(()),
        }
    }
}

fn network(err: reqwest::Error) -> BackendError {
    BackendError::Network(err.to_string())
}

/// Map an auth endpoint response to a token or a failure.
async fn token_from(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    if status.is_success() {
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        return Ok(body.token);
    }
    Err(rejection_from(status, body_of(response).await))
}

fn rejection_from(status: reqwest::StatusCode, body: String) -> BackendError {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        BackendError::Rejected(error_message(&body))
    } else {
        BackendError::Api(status.as_u16(), body)
    }
}

async fn body_of(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

/// Pull a human-readable message out of an error body, falling back to a
/// generic one when the body is not the expected JSON shape.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| "authentication failed".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_field() {
        let body = r#"{"message": "wrong password", "error": "unauthorized"}"#;
        assert_eq!(error_message(body), "wrong password");
    }

    #[test]
    fn error_message_falls_back_for_junk_bodies() {
        assert_eq!(error_message("<html>nope</html>"), "authentication failed");
        assert_eq!(error_message(""), "authentication failed");
    }

    #[test]
    fn rejection_mapping_depends_on_status() {
        let rejected = rejection_from(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"message":"bad credentials"}"#.to_string(),
        );
        assert_eq!(rejected, BackendError::Rejected("bad credentials".into()));

        let api = rejection_from(reqwest::StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert_eq!(api, BackendError::Api(502, "upstream".into()));
    }
}
