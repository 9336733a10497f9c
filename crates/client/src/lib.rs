//! `eventdesk-client` — HTTP edge of the console client.
//!
//! Implements the session engine's [`AuthBackend`] contract over reqwest
//! and provides the request pipeline every business call goes through
//! (bearer attachment plus the single refresh-and-retry on authorization
//! failures).
//!
//! [`AuthBackend`]: eventdesk_session::AuthBackend

pub mod auth_api;
pub mod config;
pub mod pipeline;

pub use auth_api::HttpAuthBackend;
pub use config::ClientConfig;
pub use pipeline::{ApiClient, ApiError};
