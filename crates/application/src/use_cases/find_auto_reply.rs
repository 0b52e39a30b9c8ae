//! Find auto-reply use case

use std::sync::Arc;

use tracing::debug;

use ile_domain::{AutoReply, TenantId, select_auto_reply};

use crate::ApplicationResult;
use crate::ports::AutoReplyRepository;

/// Finds the auto-reply that answers an incoming message.
pub struct FindAutoReply<A: ?Sized> {
    repository: Arc<A>,
}

impl<A: AutoReplyRepository + ?Sized> FindAutoReply<A> {
    /// Creates a new `FindAutoReply` use case.
    #[must_use]
    pub const fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    /// Returns the tenant's best matching active auto-reply, if any.
    ///
    /// # Errors
    /// Returns an error if the repository fails.
    pub async fn execute(&self, tenant: &TenantId, message: &str) -> ApplicationResult<Option<AutoReply>> {
        let replies = self.repository.list_for_tenant(tenant).await?;
        let selected = select_auto_reply(&replies, message).cloned();
        debug!(
            tenant = %tenant,
            candidates = replies.len(),
            matched = selected.as_ref().map(|r| r.id.as_str()),
            "auto-reply lookup"
        );
        Ok(selected)
    }
}
