//! In-memory store implementing the repository ports.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use ile_application::ports::{
    AutoReplyRepository, ImageRepository, RepositoryError, RuleTableRepository,
};
use ile_domain::{
    AutoReply, GenerationId, GenerationPlan, ImageAsset, RuleGeneration, RuleRow, TenantId,
    latest_active,
};

use super::StoreSnapshot;

/// Shared in-memory store of rule tables, images and auto-replies.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreSnapshot>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Copies the current contents.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.read().await.clone()
    }

    /// Stores an uploaded rule table as a new active generation.
    ///
    /// When the rule already has the maximum number of generations, the
    /// earliest upload and its rows are deleted first. Rows are numbered
    /// from 1 in upload order.
    pub async fn register_generation(
        &self,
        tenant: &TenantId,
        rule_id: &str,
        uploaded_at: DateTime<Utc>,
        rows: Vec<Map<String, Value>>,
    ) -> RuleGeneration {
        let mut state = self.state.write().await;

        let existing: Vec<RuleGeneration> = state
            .generations
            .iter()
            .filter(|g| &g.tenant_id == tenant && g.rule_id == rule_id)
            .cloned()
            .collect();
        let plan = GenerationPlan::for_existing(&existing);

        if let Some(evicted) = &plan.evict {
            state.generations.retain(|g| &g.id != evicted);
            state.rows.retain(|r| &r.generation_id != evicted);
            info!(rule = rule_id, generation = %evicted, "evicted oldest generation");
        }

        let generation = RuleGeneration {
            id: GenerationId::generate(),
            tenant_id: tenant.clone(),
            rule_id: rule_id.to_string(),
            generation_number: plan.next_number,
            uploaded_at,
            row_count: rows.len(),
            is_active: true,
        };
        state
            .rows
            .extend(rows.into_iter().zip(1_i64..).map(|(data, row_number)| RuleRow {
                generation_id: generation.id.clone(),
                row_number,
                data,
            }));
        state.generations.push(generation.clone());

        debug!(
            rule = rule_id,
            generation = %generation.id,
            number = generation.generation_number,
            rows = generation.row_count,
            "generation registered"
        );
        generation
    }

    /// Marks a generation active or inactive. Returns false if it does not exist.
    pub async fn set_generation_active(&self, generation: &GenerationId, active: bool) -> bool {
        let mut state = self.state.write().await;
        match state.generations.iter_mut().find(|g| &g.id == generation) {
            Some(found) => {
                found.is_active = active;
                true
            }
            None => false,
        }
    }

    /// Adds an image.
    pub async fn add_image(&self, image: ImageAsset) {
        self.state.write().await.images.push(image);
    }

    /// Adds an auto-reply.
    pub async fn add_auto_reply(&self, reply: AutoReply) {
        self.state.write().await.auto_replies.push(reply);
    }
}

#[async_trait]
impl RuleTableRepository for InMemoryStore {
    async fn latest_active_generation(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<GenerationId>, RepositoryError> {
        let state = self.state.read().await;
        Ok(latest_active(&state.generations, tenant).map(|g| g.id.clone()))
    }

    async fn field_value(
        &self,
        tenant: &TenantId,
        generation: &GenerationId,
        row: i64,
        field: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let state = self.state.read().await;
        let owned = state
            .generations
            .iter()
            .any(|g| &g.id == generation && &g.tenant_id == tenant);
        if !owned {
            return Ok(None);
        }
        Ok(state
            .rows
            .iter()
            .find(|r| &r.generation_id == generation && r.row_number == row)
            .and_then(|r| r.field(field)))
    }
}

#[async_trait]
impl ImageRepository for InMemoryStore {
    async fn image_url_by_name(
        &self,
        tenant: &TenantId,
        name: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .images
            .iter()
            .find(|i| i.is_named(tenant, name))
            .map(|i| i.url.clone())
            .filter(|url| !url.is_empty()))
    }
}

#[async_trait]
impl AutoReplyRepository for InMemoryStore {
    async fn list_for_tenant(&self, tenant: &TenantId) -> Result<Vec<AutoReply>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .auto_replies
            .iter()
            .filter(|r| &r.tenant_id == tenant)
            .cloned()
            .collect())
    }
}
