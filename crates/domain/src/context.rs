//! Variable context for template expansion
//!
//! Holds the single mutable variable scope shared by every expression
//! evaluated during one template expansion.

use indexmap::IndexMap;
use serde_json::Value;

use crate::id::TenantId;

/// Renders a JSON value the way it appears when substituted into text.
///
/// Strings are used as-is, `null` has no text, and every other value is
/// written as compact JSON.
#[must_use]
pub fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The variable scope of one template expansion.
///
/// A context is created for each top-level invocation and dropped at the
/// end of it; nothing is shared between invocations. Variables keep their
/// first-insertion order so seeded `__vars__` remain inspectable in the
/// order they were bound.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableContext {
    tenant_id: TenantId,
    variables: IndexMap<String, Value>,
}

impl VariableContext {
    /// Creates an empty context for the given tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            variables: IndexMap::new(),
        }
    }

    /// The tenant every lookup made through this context is scoped to.
    #[must_use]
    pub const fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Binds `name` to `value`, replacing any earlier binding in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Returns the raw bound value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Resolves a variable to its text form; unset and `null` are empty.
    #[must_use]
    pub fn lookup_text(&self, name: &str) -> String {
        self.variables
            .get(name)
            .and_then(render_text)
            .unwrap_or_default()
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Iterates bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
