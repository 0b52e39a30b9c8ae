//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An auto-reply match type is not recognised.
    #[error("invalid match type: {0}")]
    InvalidMatchType(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
