//! Identifier types and ID generation utilities.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Generates a new UUID v7 as a string.
///
/// UUID v7 includes timestamp information and is sortable.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// The owning account of rules, images and auto-replies.
///
/// Every external lookup made while expanding a template is keyed by a
/// tenant id, so one operator never sees another operator's data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Creates a tenant id, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if `id` is empty or whitespace.
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier("tenant id is empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantId {
    type Error = DomainError;

    fn try_from(id: String) -> DomainResult<Self> {
        Self::new(id)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one uploaded snapshot of a rule table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationId(String);

impl GenerationId {
    /// Wraps an existing generation id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, time-ordered generation id.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_id())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GenerationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_generate_id_uniqueness() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_tenant_id_rejects_blank() {
        assert!(TenantId::new("").is_err());
        assert!(TenantId::new("   ").is_err());
        assert_eq!(TenantId::new("teller-1").unwrap().as_str(), "teller-1");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let tenant = TenantId::new("t1").unwrap();
        assert_eq!(serde_json::to_string(&tenant).unwrap(), "\"t1\"");

        let generation: GenerationId = serde_json::from_str("\"g-9\"").unwrap();
        assert_eq!(generation, GenerationId::from("g-9"));
    }

    #[test]
    fn test_blank_tenant_is_rejected_when_deserializing() {
        assert!(serde_json::from_str::<TenantId>("\" \"").is_err());
    }
}
