//! `eventdesk-auth` — pure authentication/authorization boundary.
//!
//! Decodes access-token claims and evaluates permission sets. This crate is
//! intentionally decoupled from HTTP, storage, and any UI framework; the
//! session layer feeds it tokens and consumes its decisions.

pub mod claims;
pub mod permissions;
pub mod roles;
pub mod subject;

pub use claims::{Claims, DecodeError, decode};
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use subject::{AccountStatus, Subject};
