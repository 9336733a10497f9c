//! Access-token claims decoding.
//!
//! The decoder reads the token's payload segment only. It deliberately does
//! NOT verify the signature or the expiry claim: the backend enforces both
//! on every request, and client-decoded claims drive display/UX gating
//! exclusively. Nothing privileged may ever be authorized from them.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use eventdesk_core::EventSummary;

use crate::{PermissionSet, Subject};

/// Everything the client derives from one access token.
///
/// A `Claims` value is a pure function of the token string it was decoded
/// from; no field is ever mutated independently of a token change.
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    pub subject: Subject,
    pub authorities: PermissionSet,
    /// Events the caller is assigned to. Empty means *unrestricted* for
    /// roles that are not event-scoped; for event-scoped roles it means
    /// no access has been granted yet.
    pub assigned_events: Vec<EventSummary>,
    pub requires_password_reset: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is not a three-part compact serialization")]
    Malformed,

    #[error("token payload is not valid base64url: {0}")]
    Base64(String),

    #[error("token payload is not well-formed JSON: {0}")]
    Json(String),

    #[error("token payload is missing the subject (`user`) claim")]
    MissingSubject,

    #[error("assigned-events claim is malformed: {0}")]
    AssignedEvents(String),
}

/// Wire shape of the token payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
    user: Option<Subject>,
    #[serde(default)]
    authorities: Vec<String>,
    #[serde(default)]
    assigned_events: Option<JsonValue>,
    #[serde(default)]
    require_password_reset: bool,
}

/// Decode the payload of a signed access token into [`Claims`].
///
/// Fails with [`DecodeError`] when the payload is structurally unusable or
/// the subject claim is absent. Callers treat any failure as "no session".
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return Err(DecodeError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let payload: TokenPayload =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;

    let subject = payload.user.ok_or(DecodeError::MissingSubject)?;
    let assigned_events = parse_assigned_events(payload.assigned_events)?;

    Ok(Claims {
        subject,
        authorities: PermissionSet::from_codes(payload.authorities),
        assigned_events,
        requires_password_reset: payload.require_password_reset,
    })
}

/// The backend serializes `assignedEvents` as a JSON *string* containing
/// the array; newer token versions send the array directly. Both decode.
fn parse_assigned_events(value: Option<JsonValue>) -> Result<Vec<EventSummary>, DecodeError> {
    match value {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::String(inner)) => {
            serde_json::from_str(&inner).map_err(|e| DecodeError::AssignedEvents(e.to_string()))
        }
        Some(other) => {
            serde_json::from_value(other).map_err(|e| DecodeError::AssignedEvents(e.to_string()))
        }
    }
}
