//! Rule violations raised by domain types.

use thiserror::Error;

use crate::constants::MSG_ROOM_FULL;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input (unknown role, bad identifier, capacity below 1)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced occupant or room does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admission would push a room past its capacity
    #[error("{}", MSG_ROOM_FULL)]
    CapacityExceeded,

    /// Persisted data violates a domain invariant
    #[error("Corrupt record: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
