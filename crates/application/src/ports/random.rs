//! Random number port

/// Source of the integers produced by `rand`.
///
/// Need not be cryptographically secure. Tests substitute a fixed source.
pub trait RandomSource: Send + Sync {
    /// Returns a uniform integer in `min..=max`. Callers guarantee `min <= max`.
    fn random_int(&self, min: i64, max: i64) -> i64;
}
