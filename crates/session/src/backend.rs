//! Contract between the session engine and the authentication backend.
//!
//! The session store drives authentication exclusively through this trait;
//! the reqwest implementation lives in `eventdesk-client`, and tests plug
//! in programmable doubles.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a backend authentication operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend rejected the operation (bad credentials, expired refresh
    /// credential, policy failure). Carries the human-readable message for
    /// inline display.
    #[error("{0}")]
    Rejected(String),

    /// No usable response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an unexpected status.
    #[error("unexpected response ({0}): {1}")]
    Api(u16, String),

    /// The response body could not be interpreted.
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Authentication operations the backend offers the client.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a signed access token.
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError>;

    /// Obtain a fresh access token using the out-of-band refresh
    /// credential (a cookie), not the expiring token itself.
    async fn refresh(&self) -> Result<String, BackendError>;

    /// Invalidate the server-side session. Best effort; the caller never
    /// blocks its local transition on the outcome.
    async fn logout(&self) -> Result<(), BackendError>;

    /// Change the caller's password. The password-reset claim only clears
    /// on the next token issuance, never as a side effect of this call.
    async fn update_password(&self, current: &str, new: &str) -> Result<(), BackendError>;
}
