//! Identity of the caller as asserted by the access token.

use serde::{Deserialize, Serialize};

use eventdesk_core::UserId;

use crate::Role;

/// Account status as issued by the backend.
///
/// Unknown codes are treated as neither active nor disabled; only an
/// explicit `DISABLED` blocks navigation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountStatus {
    Active,
    Disabled,
    Unknown,
}

impl AccountStatus {
    pub fn is_disabled(&self) -> bool {
        matches!(self, AccountStatus::Disabled)
    }

    pub fn code(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Disabled => "DISABLED",
            AccountStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => AccountStatus::Active,
            "DISABLED" => AccountStatus::Disabled,
            _ => AccountStatus::Unknown,
        }
    }
}

impl From<String> for AccountStatus {
    fn from(value: String) -> Self {
        AccountStatus::from_code(&value)
    }
}

impl From<AccountStatus> for String {
    fn from(value: AccountStatus) -> Self {
        value.code().to_string()
    }
}

impl core::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// The authenticated identity carried in the token's `user` claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: UserId,
    /// Display name shown in the console header.
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert!(AccountStatus::from_code("disabled").is_disabled());
        assert!(!AccountStatus::from_code("ACTIVE").is_disabled());
        // Unknown is tolerated and does not count as disabled.
        assert!(!AccountStatus::from_code("ARCHIVED").is_disabled());
    }

    #[test]
    fn subject_deserializes_from_wire_shape() {
        let subject: Subject = serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::now_v7(),
            "name": "Dana Weber",
            "role": "CHECKIN_STAFF",
            "status": "ACTIVE",
        }))
        .unwrap();

        assert_eq!(subject.role, Role::CheckinStaff);
        assert_eq!(subject.status, AccountStatus::Active);
    }
}
