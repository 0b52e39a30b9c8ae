//! Application error types

use ile_domain::DomainError;
use thiserror::Error;

use crate::ile::IleError;
use crate::ports::RepositoryError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Template expansion failed.
    #[error("template error: {0}")]
    Ile(#[from] IleError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
