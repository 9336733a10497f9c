//! Permission codes and the set evaluator.
//!
//! Permission checks go through [`PermissionSet`] everywhere; feature code
//! uses the named constants below instead of inline string literals.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque dotted codes (e.g. `event.write`). Comparison is
/// case-insensitive; the canonical form is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const EVENT_READ: Permission = Permission(Cow::Borrowed("event.read"));
    pub const EVENT_WRITE: Permission = Permission(Cow::Borrowed("event.write"));
    pub const ATTENDEE_READ: Permission = Permission(Cow::Borrowed("attendee.read"));
    pub const ATTENDEE_WRITE: Permission = Permission(Cow::Borrowed("attendee.write"));
    pub const VOUCHER_READ: Permission = Permission(Cow::Borrowed("voucher.read"));
    pub const VOUCHER_WRITE: Permission = Permission(Cow::Borrowed("voucher.write"));
    pub const USER_MANAGE: Permission = Permission(Cow::Borrowed("user.manage"));
    pub const SUBSIDIARY_MANAGE: Permission = Permission(Cow::Borrowed("subsidiary.manage"));
    pub const REPORT_READ: Permission = Permission(Cow::Borrowed("report.read"));

    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicated, case-normalized set of granted permission codes.
///
/// All lookups are pure and total: the empty code, an unknown code, and an
/// empty query list all evaluate to `false` rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    /// The empty set (no permissions granted).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from raw backend codes.
    ///
    /// Codes are trimmed and lowercased; empty codes are dropped.
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = codes
            .into_iter()
            .filter_map(|code| {
                let code = code.as_ref().trim().to_ascii_lowercase();
                if code.is_empty() { None } else { Some(code) }
            })
            .collect();
        Self(normalized)
    }

    /// Whether the set grants `permission`.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.contains_code(permission.as_str())
    }

    /// Whether the set grants the raw `code` (case-insensitive).
    pub fn contains_code(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        self.0.contains(&code.to_ascii_lowercase())
    }

    /// Whether the set grants at least one of `permissions`.
    pub fn contains_any<'a, I>(&self, permissions: I) -> bool
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        permissions.into_iter().any(|p| self.contains(p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the granted codes (canonical lowercase form).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
