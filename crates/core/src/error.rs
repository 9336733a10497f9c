//! Error model for the pure layers.

use thiserror::Error;

/// Result type used across the pure layers.
pub type CoreResult<T> = Result<T, CoreError>;

/// Deterministic, domain-level failure.
///
/// Infrastructure concerns (network, storage) carry their own error types
/// closer to the edge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced resource is not known to the caller's session.
    #[error("not found")]
    NotFound,
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
