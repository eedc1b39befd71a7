//! Domain error model.

use thiserror::Error;

/// Result type used across the reservation core.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures. Every error is
/// returned to the immediate caller untransformed; the core performs no
/// retries of its own.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced entity is absent or soft-deleted.
    #[error("not found")]
    NotFound,

    /// The stock guard rejected a reservation: no units left.
    #[error("out of stock")]
    OutOfStock,

    /// A reservation state machine rule was violated.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A reservation date lies in the past.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A restock delta was not strictly positive.
    #[error("invalid delta: {0}")]
    InvalidDelta(String),

    /// A value failed validation (e.g. empty name, non-positive price).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflict occurred (e.g. duplicate registration, poisoned guard).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn out_of_stock() -> Self {
        Self::OutOfStock
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn invalid_date(msg: impl Into<String>) -> Self {
        Self::InvalidDate(msg.into())
    }

    pub fn invalid_delta(msg: impl Into<String>) -> Self {
        Self::InvalidDelta(msg.into())
    }

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
