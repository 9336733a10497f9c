//! Session state machine.
//!
//! The store owns the access token and everything derived from it. All
//! transitions swap a complete immutable snapshot, so readers (the route
//! guard above all) always observe the most recently committed state and
//! never a half-updated one.

use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use eventdesk_auth::{Claims, DecodeError, PermissionSet, Subject, decode};
use eventdesk_core::{EventId, EventSummary};

use crate::backend::{AuthBackend, BackendError};
use crate::guard::{self, RouteDecision};
use crate::refresh::RefreshScheduler;
use crate::selection::EventSelectionGate;
use crate::token_store::TokenStore;

/// What to do when a silent refresh fails.
///
/// The source behavior is to swallow the failure, which can leave a session
/// that looks authenticated while every request is rejected. The policy
/// makes that explicit instead of guessing intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshFailurePolicy {
    /// Log and carry on; the caller sees the error, the session stays.
    #[default]
    Ignore,
    /// Tear the session down so the user lands back on the login screen.
    ForceLogout,
}

/// Tunables of the session store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Period of the scheduled silent refresh.
    pub refresh_period: Duration,
    pub refresh_failure_policy: RefreshFailurePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_period: Duration::from_secs(8 * 60),
            refresh_failure_policy: RefreshFailurePolicy::default(),
        }
    }
}

/// Immutable snapshot of the live session, derived from the current token.
///
/// Every field mirrors a token claim; none is ever mutated independently of
/// a token change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub subject: Option<Subject>,
    pub permissions: PermissionSet,
    pub assigned_events: Vec<EventSummary>,
    pub requires_password_reset: bool,
}

impl SessionState {
    pub fn empty() -> Self {
        Self {
            subject: None,
            permissions: PermissionSet::empty(),
            assigned_events: Vec::new(),
            requires_password_reset: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    fn from_claims(claims: Claims) -> Self {
        Self {
            subject: Some(claims.subject),
            permissions: claims.authorities,
            assigned_events: claims.assigned_events,
            requires_password_reset: claims.requires_password_reset,
        }
    }
}

/// Failure of a session operation, surfaced to the calling feature.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected the credentials or the refresh credential.
    #[error("authentication rejected: {0}")]
    Rejected(String),

    /// The backend issued a token the client cannot use.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("network error: {0}")]
    Network(String),

    #[error("backend error ({0}): {1}")]
    Backend(u16, String),

    #[error("malformed backend response: {0}")]
    Parse(String),

    /// The chosen event is not among the session's assigned events.
    #[error("event {0} is not assigned to this session")]
    UnknownEvent(EventId),
}

impl From<BackendError> for SessionError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Rejected(message) => SessionError::Rejected(message),
            BackendError::Network(message) => SessionError::Network(message),
            BackendError::Api(status, body) => SessionError::Backend(status, body),
            BackendError::Parse(message) => SessionError::Parse(message),
        }
    }
}

/// The stateful core: token ownership, session derivation, refresh
/// scheduling, and the event selection gate.
///
/// Constructed once per process and shared as `Arc<SessionStore>`; the
/// route guard and the request pipeline read it, only its own operations
/// write it.
pub struct SessionStore {
    tokens: Arc<dyn TokenStore>,
    backend: Arc<dyn AuthBackend>,
    config: SessionConfig,

    /// Current snapshot; swapped whole on every transition.
    state: RwLock<Arc<SessionState>>,
    /// Bumped on every commit/clear. Lets in-flight operations detect that
    /// the session they started under no longer exists.
    generation: AtomicU64,
    /// Serializes refreshes: concurrent callers coalesce into one
    /// outstanding backend request.
    refresh_gate: tokio::sync::Mutex<()>,

    selection: EventSelectionGate,
    scheduler: Mutex<Option<RefreshScheduler>>,
    weak_self: Weak<SessionStore>,
}

impl SessionStore {
    /// Build the store and restore a persisted session if one exists.
    ///
    /// Must be called inside a tokio runtime: restoring a session starts
    /// the refresh scheduler.
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        backend: Arc<dyn AuthBackend>,
        config: SessionConfig,
    ) -> Arc<Self> {
        let store = Arc::new_cyclic(|weak| Self {
            tokens,
            backend,
            config,
            state: RwLock::new(Arc::new(SessionState::empty())),
            generation: AtomicU64::new(0),
            refresh_gate: tokio::sync::Mutex::new(()),
            selection: EventSelectionGate::new(),
            scheduler: Mutex::new(None),
            weak_self: weak.clone(),
        });
        store.restore();
        store
    }

    /// Current session snapshot (cheap to clone, safe to hold).
    pub fn state(&self) -> Arc<SessionState> {
        Arc::clone(&self.state.read())
    }

    /// Raw token for the request pipeline; `None` when logged out.
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    /// The event selection gate for event-scoped roles.
    pub fn selection(&self) -> &EventSelectionGate {
        &self.selection
    }

    /// Route decision for the current snapshot. Evaluated fresh on every
    /// navigation; never cache the result.
    pub fn route(&self, path: &str) -> RouteDecision {
        guard::decide(&self.state(), self.selection.has_selection(), path)
    }

    /// Public-route decision (login screen) for the current snapshot.
    pub fn route_public(&self, return_to: Option<&str>) -> RouteDecision {
        guard::decide_public(&self.state(), return_to)
    }

    /// Choose the working event from the session's assigned events.
    pub fn select_event(&self, id: EventId) -> Result<EventSummary, SessionError> {
        let state = self.state();
        let event = state
            .assigned_events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(SessionError::UnknownEvent(id))?;
        self.selection.select(event.clone());
        Ok(event)
    }

    /// Exchange credentials for a session.
    ///
    /// On rejection the current state is left untouched and the backend's
    /// message is returned for inline display.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let token = self.backend.login(username, password).await?;
        // A fresh login always starts without a working event.
        self.selection.clear();
        self.commit_token(&token)?;
        tracing::info!("session established");
        Ok(())
    }

    /// Obtain a fresh token without user interaction.
    ///
    /// Concurrent calls are coalesced: whoever reaches the backend first
    /// refreshes for everyone, and a caller that observes a refresh landing
    /// while it waited returns without issuing a second request. A result
    /// arriving after logout is discarded.
    pub async fn silent_refresh(&self) -> Result<(), SessionError> {
        let observed = self.generation();
        let _gate = self.refresh_gate.lock().await;
        if self.generation() != observed {
            tracing::debug!("refresh coalesced into an already completed one");
            return Ok(());
        }

        match self.backend.refresh().await {
            Ok(token) => {
                if !self.commit_token_if_current(&token, observed)? {
                    tracing::debug!("discarding refresh result for a superseded session");
                }
                Ok(())
            }
            Err(err) => {
                match self.config.refresh_failure_policy {
                    RefreshFailurePolicy::Ignore => {
                        tracing::warn!("silent refresh failed: {err}");
                    }
                    RefreshFailurePolicy::ForceLogout => {
                        tracing::warn!("silent refresh failed, forcing logout: {err}");
                        self.logout();
                    }
                }
                Err(err.into())
            }
        }
    }

    /// End the session.
    ///
    /// The backend is notified best-effort in the background; the local
    /// transition (token cleared, snapshot emptied, scheduler cancelled,
    /// selection cleared) happens synchronously and is idempotent.
    pub fn logout(&self) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(err) = backend.logout().await {
                tracing::warn!("backend logout notification failed: {err}");
            }
        });

        self.clear_local();
        tracing::info!("session ended");
    }

    /// Change the caller's password.
    ///
    /// Deliberately does not touch `requires_password_reset`: the flag is a
    /// token claim and only changes on the next token issuance.
    pub async fn update_password(&self, current: &str, new: &str) -> Result<(), SessionError> {
        self.backend.update_password(current, new).await?;
        Ok(())
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Restore a session persisted by a previous run. A token that fails to
    /// decode is dropped and the store starts logged out.
    fn restore(&self) {
        let Some(token) = self.tokens.get() else {
            return;
        };
        match decode(&token) {
            Ok(claims) => {
                self.install(claims);
                tracing::info!("session restored from persisted token");
            }
            Err(err) => {
                tracing::warn!("persisted token is unusable, starting logged out: {err}");
                self.tokens.clear();
            }
        }
    }

    /// Decode and install `token` unconditionally (login path).
    fn commit_token(&self, token: &str) -> Result<(), DecodeError> {
        let claims = match decode(token) {
            Ok(claims) => claims,
            Err(err) => {
                // Fail safe: a token we cannot read must not leave a
                // partially authenticated session behind.
                self.clear_local();
                return Err(err);
            }
        };
        self.install(claims);
        self.tokens.set(token);
        Ok(())
    }

    /// Like [`Self::commit_token`], but only if no other transition landed
    /// since `expected`. Returns whether the token was installed.
    fn commit_token_if_current(
        &self,
        token: &str,
        expected: u64,
    ) -> Result<bool, DecodeError> {
        let claims = match decode(token) {
            Ok(claims) => claims,
            Err(err) => {
                self.clear_local();
                return Err(err);
            }
        };

        {
            let mut slot = self.state.write();
            if self.generation.load(Ordering::SeqCst) != expected {
                return Ok(false);
            }
            *slot = Arc::new(SessionState::from_claims(claims));
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        self.tokens.set(token);
        self.ensure_scheduler();
        Ok(true)
    }

    fn install(&self, claims: Claims) {
        {
            let mut slot = self.state.write();
            *slot = Arc::new(SessionState::from_claims(claims));
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        self.ensure_scheduler();
    }

    fn clear_local(&self) {
        {
            let mut slot = self.state.write();
            *slot = Arc::new(SessionState::empty());
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        self.tokens.clear();
        self.selection.clear();
        self.stop_scheduler();
    }

    fn ensure_scheduler(&self) {
        let mut slot = self.scheduler.lock();
        if slot.is_none() {
            *slot = Some(RefreshScheduler::start(
                self.weak_self.clone(),
                self.config.refresh_period,
            ));
        }
    }

    fn stop_scheduler(&self) {
        if let Some(scheduler) = self.scheduler.lock().take() {
            scheduler.stop();
        }
    }

    #[cfg(test)]
    pub(crate) fn scheduler_running(&self) -> bool {
        self.scheduler.lock().is_some()
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.stop_scheduler();
    }
}
