//! Image repository port

use async_trait::async_trait;

use ile_domain::TenantId;

use super::RepositoryError;

/// Read access to uploaded images.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Resolves the public URL of the tenant's image named exactly `name`.
    ///
    /// # Errors
    /// Returns an error only if the store fails; a miss is `Ok(None)`.
    async fn image_url_by_name(
        &self,
        tenant: &TenantId,
        name: &str,
    ) -> Result<Option<String>, RepositoryError>;
}
