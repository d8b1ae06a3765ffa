//! Errors raised by pure record and value logic.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rule violations detected without touching storage: bad quantities or
/// option documents, unparsable ids, stale record versions.
///
/// Policy rejections (`UnstowableObject`) and store failures (`StoreError`)
/// are separate types so callers can match on the layer that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input the basket model refuses, such as a zero quantity.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A string that is not a valid id of the expected kind.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The record changed since it was read.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
