//! In-memory port doubles for unit tests

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use ile_domain::{AutoReply, GenerationId, TenantId};

use crate::ile::TemplateEngine;
use crate::ports::{
    AutoReplyRepository, ImageRepository, RandomSource, RepositoryError, RuleTableRepository,
};

pub fn tenant(id: &str) -> TenantId {
    TenantId::new(id).unwrap()
}

/// Rule tables keyed by generation id.
#[derive(Default)]
pub struct StubTables {
    latest: HashMap<String, GenerationId>,
    owners: HashMap<String, String>,
    cells: HashMap<(String, i64, String), String>,
    fail: bool,
}

impl StubTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a generation; `latest` makes it the tenant's active one.
    pub fn with_generation(mut self, tenant: &str, generation: &str, latest: bool) -> Self {
        self.owners.insert(generation.to_string(), tenant.to_string());
        if latest {
            self.latest
                .insert(tenant.to_string(), GenerationId::from(generation));
        }
        self
    }

    pub fn with_cell(mut self, generation: &str, row: i64, field: &str, value: &str) -> Self {
        self.cells.insert(
            (generation.to_string(), row, field.to_string()),
            value.to_string(),
        );
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Unavailable("rule store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RuleTableRepository for StubTables {
    async fn latest_active_generation(
        &self,
        tenant: &TenantId,
    ) -> Result<Option<GenerationId>, RepositoryError> {
        self.check()?;
        Ok(self.latest.get(tenant.as_str()).cloned())
    }

    async fn field_value(
        &self,
        tenant: &TenantId,
        generation: &GenerationId,
        row: i64,
        field: &str,
    ) -> Result<Option<String>, RepositoryError> {
        self.check()?;
        if self.owners.get(generation.as_str()).map(String::as_str) != Some(tenant.as_str()) {
            return Ok(None);
        }
        Ok(self
            .cells
            .get(&(generation.as_str().to_string(), row, field.to_string()))
            .cloned())
    }
}

/// Images keyed by tenant and name, optionally slow to answer.
#[derive(Default)]
pub struct StubImages {
    urls: HashMap<(String, String), String>,
    delay: Option<Duration>,
}

impl StubImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, tenant: &str, name: &str, url: &str) -> Self {
        self.urls
            .insert((tenant.to_string(), name.to_string()), url.to_string());
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ImageRepository for StubImages {
    async fn image_url_by_name(
        &self,
        tenant: &TenantId,
        name: &str,
    ) -> Result<Option<String>, RepositoryError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .urls
            .get(&(tenant.as_str().to_string(), name.to_string()))
            .cloned())
    }
}

/// Always draws one end of the range.
pub enum FixedRandom {
    Min,
    Max,
}

impl FixedRandom {
    pub const fn min() -> Self {
        Self::Min
    }

    pub const fn max() -> Self {
        Self::Max
    }
}

impl RandomSource for FixedRandom {
    fn random_int(&self, min: i64, max: i64) -> i64 {
        match self {
            Self::Min => min,
            Self::Max => max,
        }
    }
}

pub struct StubAutoReplies(pub Vec<AutoReply>);

#[async_trait]
impl AutoReplyRepository for StubAutoReplies {
    async fn list_for_tenant(&self, tenant: &TenantId) -> Result<Vec<AutoReply>, RepositoryError> {
        Ok(self
            .0
            .iter()
            .filter(|r| &r.tenant_id == tenant)
            .cloned()
            .collect())
    }
}

pub type StubEngine = TemplateEngine<StubTables, StubImages, FixedRandom>;

pub fn engine(tables: StubTables, images: StubImages) -> StubEngine {
    TemplateEngine::new(Arc::new(tables), Arc::new(images), Arc::new(FixedRandom::min()))
}
