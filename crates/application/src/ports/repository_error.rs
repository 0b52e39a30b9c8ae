//! Errors shared by the repository ports

/// A genuine storage failure.
///
/// Misses (no such row, image or generation) are not errors; repositories
/// report them as `None`.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
