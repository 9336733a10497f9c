//! Role model for the console's RBAC.
//!
//! Roles form a closed enumeration rather than free-form strings so that
//! event-scoping rules are checked in one place instead of scattered string
//! comparisons.

use serde::{Deserialize, Serialize};

/// Role granted to an authenticated user.
///
/// The wire representation is the backend's role code (e.g. `ADMIN`).
/// Unrecognized codes map to [`Role::Unknown`] so that a newer backend does
/// not break older clients; `Unknown` carries no implicit access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Full administrative access across all events and subsidiaries.
    Admin,
    /// Back-office staff with unrestricted event visibility.
    Office,
    /// Manages only the events explicitly assigned to them.
    EventManager,
    /// Check-in staff working one assigned event at a time.
    CheckinStaff,
    /// Role code this client version does not know.
    Unknown,
}

impl Role {
    /// Whether access for this role is limited to explicitly assigned
    /// events (as opposed to all events).
    pub fn is_event_scoped(&self) -> bool {
        matches!(self, Role::EventManager | Role::CheckinStaff)
    }

    /// Backend role code for this role.
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Office => "OFFICE",
            Role::EventManager => "EVENT_MANAGER",
            Role::CheckinStaff => "CHECKIN_STAFF",
            Role::Unknown => "UNKNOWN",
        }
    }

    /// Parse a backend role code (case-insensitive).
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "OFFICE" => Role::Office,
            "EVENT_MANAGER" => Role::EventManager,
            "CHECKIN_STAFF" => Role::CheckinStaff,
            _ => Role::Unknown,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from_code(&value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.code().to_string()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_scoped_roles() {
        assert!(Role::EventManager.is_event_scoped());
        assert!(Role::CheckinStaff.is_event_scoped());
        assert!(!Role::Admin.is_event_scoped());
        assert!(!Role::Office.is_event_scoped());
        assert!(!Role::Unknown.is_event_scoped());
    }

    #[test]
    fn codes_round_trip() {
        for role in [Role::Admin, Role::Office, Role::EventManager, Role::CheckinStaff] {
            assert_eq!(Role::from_code(role.code()), role);
        }
    }

    #[test]
    fn unknown_codes_are_tolerated() {
        assert_eq!(Role::from_code("SUPERVISOR"), Role::Unknown);
        assert_eq!(Role::from_code(""), Role::Unknown);
    }

    #[test]
    fn deserializes_case_insensitively() {
        let role: Role = serde_json::from_str("\"event_manager\"").unwrap();
        assert_eq!(role, Role::EventManager);
    }
}
