//! Auto-reply repository port

use async_trait::async_trait;

use ile_domain::{AutoReply, TenantId};

use super::RepositoryError;

/// Read access to configured auto-replies.
#[async_trait]
pub trait AutoReplyRepository: Send + Sync {
    /// Lists every auto-reply owned by `tenant`, active or not.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    async fn list_for_tenant(&self, tenant: &TenantId) -> Result<Vec<AutoReply>, RepositoryError>;
}
