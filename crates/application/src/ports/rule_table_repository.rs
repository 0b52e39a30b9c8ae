//! Rule table repository port

use async_trait::async_trait;

use ile_domain::{GenerationId, TenantId};

use super::RepositoryError;

/// Read access to uploaded rule tables.
#[async_trait]
pub trait RuleTableRepository: Send + Sync {
    /// Returns the most recently uploaded active generation owned by `tenant`.
    ///
    /// # Errors
    /// Returns an error only if the store fails; no generation is `Ok(None)`.
    async fn latest_active_generation(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<GenerationId>, RepositoryError>;

    /// Reads one cell of a generation.
    ///
    /// Implementations must return `None` when `generation` is not owned by
    /// `tenant`, so a foreign generation id never resolves.
    ///
    /// # Errors
    /// Returns an error only if the store fails; misses are `Ok(None)`.
    async fn field_value(
        &self,
        tenant: &TenantId,
        generation: &GenerationId,
        row: i64,
        field: &str,
    ) -> Result<Option<String>, RepositoryError>;
}
