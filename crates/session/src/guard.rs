//! Navigation arbitration.
//!
//! Pure decision functions mapping (session snapshot, requested path) to an
//! allow/redirect outcome. Decisions are recomputed on every navigation and
//! never cached: session state can change between navigations (for example
//! after a background refresh failure).

use crate::store::SessionState;

/// Route paths the guard redirects between.
pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const RESET_PASSWORD: &str = "/reset-password";
    pub const ACCOUNT_DISABLED: &str = "/account-disabled";
    pub const NO_ACCESS: &str = "/no-access";
    /// Landing path after login when no other path was requested.
    pub const DEFAULT: &str = "/dashboard";
}

/// Outcome of evaluating one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested path.
    Allow,
    /// Navigate to `to` instead. `return_to` carries the originally
    /// requested path so it can be restored once the blocking condition
    /// clears (e.g. after login).
    RedirectTo {
        to: String,
        return_to: Option<String>,
    },
    /// Show the event selection interstitial instead of any route.
    SelectionGate,
}

impl RouteDecision {
    fn redirect(to: &str) -> Self {
        RouteDecision::RedirectTo {
            to: to.to_string(),
            return_to: None,
        }
    }

    fn redirect_with_return(to: &str, requested: &str) -> Self {
        RouteDecision::RedirectTo {
            to: to.to_string(),
            return_to: Some(requested.to_string()),
        }
    }
}

/// Decide whether the session may render `path`.
///
/// Rules apply in fixed precedence order; the first match wins. The
/// function is total: an empty session decides exactly like "not
/// authenticated", and no input panics.
pub fn decide(state: &SessionState, has_selection: bool, path: &str) -> RouteDecision {
    if !state.is_authenticated() {
        if path == paths::LOGIN {
            return RouteDecision::Allow;
        }
        return RouteDecision::redirect_with_return(paths::LOGIN, path);
    }

    if state.requires_password_reset && path != paths::RESET_PASSWORD {
        return RouteDecision::redirect(paths::RESET_PASSWORD);
    }

    let disabled = state
        .subject
        .as_ref()
        .is_some_and(|s| s.status.is_disabled());
    if disabled && path != paths::ACCOUNT_DISABLED {
        return RouteDecision::redirect(paths::ACCOUNT_DISABLED);
    }

    let event_scoped = state
        .subject
        .as_ref()
        .is_some_and(|s| s.role.is_event_scoped());
    if event_scoped {
        if state.assigned_events.is_empty() {
            if path != paths::NO_ACCESS {
                return RouteDecision::redirect(paths::NO_ACCESS);
            }
        } else if !has_selection {
            // Interstitial, not a route: shown regardless of path until an
            // event is chosen or the user logs out.
            return RouteDecision::SelectionGate;
        }
    }

    RouteDecision::Allow
}

/// Guard for routes that must be unreachable once authenticated (login).
///
/// An authenticated session that does not need a password reset is bounced
/// to `return_to` (or the default landing path); everyone else may see the
/// public route.
pub fn decide_public(state: &SessionState, return_to: Option<&str>) -> RouteDecision {
    if state.is_authenticated() && !state.requires_password_reset {
        return RouteDecision::redirect(return_to.unwrap_or(paths::DEFAULT));
    }
    RouteDecision::Allow
}
