//! Rule tables and their generations
//!
//! A rule table is uploaded as a CSV; each upload becomes a new generation.
//! Templates read cells with `${tbl(row, field)}`, which targets the most
//! recently uploaded active generation of the tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::render_text;
use crate::id::{GenerationId, TenantId};

/// Maximum number of generations retained per rule.
pub const MAX_GENERATIONS: u32 = 6;

/// One uploaded snapshot of a rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGeneration {
    /// Generation id.
    pub id: GenerationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// The rule this generation belongs to.
    pub rule_id: String,
    /// Rotating generation number, `1..=MAX_GENERATIONS`.
    pub generation_number: u32,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Number of rows in the upload.
    #[serde(default)]
    pub row_count: usize,
    /// Whether `tbl` lookups may read this generation.
    #[serde(default)]
    pub is_active: bool,
}

/// A single row of a generation, keyed by column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRow {
    /// Generation the row belongs to.
    pub generation_id: GenerationId,
    /// 1-based row number.
    pub row_number: i64,
    /// Column values.
    pub data: Map<String, Value>,
}

impl RuleRow {
    /// Returns the text of a column; missing and `null` cells are `None`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        self.data.get(name).and_then(render_text)
    }
}

/// Picks the most recently uploaded active generation owned by `tenant`.
#[must_use]
pub fn latest_active<'a>(
    generations: &'a [RuleGeneration],
    tenant: &TenantId,
) -> Option<&'a RuleGeneration> {
    generations
        .iter()
        .filter(|g| g.is_active && &g.tenant_id == tenant)
        .max_by_key(|g| g.uploaded_at)
}

/// What to do before storing a new generation of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Number to assign to the new generation.
    pub next_number: u32,
    /// Generation to delete first, when the rule is at capacity.
    pub evict: Option<GenerationId>,
}

impl GenerationPlan {
    /// Plans the next upload given the rule's existing generations.
    ///
    /// Numbers count up to `MAX_GENERATIONS`. Once the rule is full the
    /// earliest upload is evicted and its number reused; otherwise the
    /// lowest free number is taken after the highest reaches the limit.
    #[must_use]
    pub fn for_existing(existing: &[RuleGeneration]) -> Self {
        if existing.len() >= MAX_GENERATIONS as usize {
            let oldest = existing
                .iter()
                .min_by_key(|g| (g.uploaded_at, g.generation_number));
            return Self {
                next_number: oldest.map_or(1, |g| g.generation_number),
                evict: oldest.map(|g| g.id.clone()),
            };
        }

        let highest = existing.iter().map(|g| g.generation_number).max().unwrap_or(0);
        let next_number = if highest < MAX_GENERATIONS {
            highest + 1
        } else {
            (1..=MAX_GENERATIONS)
                .find(|n| existing.iter().all(|g| g.generation_number != *n))
                .unwrap_or(1)
        };

        Self {
            next_number,
            evict: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    fn generation(id: &str, owner: &str, number: u32, hour: u32, active: bool) -> RuleGeneration {
        RuleGeneration {
            id: GenerationId::from(id),
            tenant_id: tenant(owner),
            rule_id: "rule-1".to_string(),
            generation_number: number,
            uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            row_count: 0,
            is_active: active,
        }
    }

    #[test]
    fn test_row_field() {
        let row = RuleRow {
            generation_id: GenerationId::from("g1"),
            row_number: 1,
            data: json!({"name": "Alice", "age": 30, "note": null})
                .as_object()
                .cloned()
                .unwrap(),
        };
        assert_eq!(row.field("name").as_deref(), Some("Alice"));
        assert_eq!(row.field("age").as_deref(), Some("30"));
        assert_eq!(row.field("note"), None);
        assert_eq!(row.field("missing"), None);
    }

    #[test]
    fn test_latest_active_prefers_newest_upload() {
        let generations = vec![
            generation("old", "a", 1, 1, true),
            generation("new", "a", 2, 5, true),
            generation("inactive", "a", 3, 9, false),
        ];
        let latest = latest_active(&generations, &tenant("a")).unwrap();
        assert_eq!(latest.id.as_str(), "new");
    }

    #[test]
    fn test_latest_active_is_tenant_scoped() {
        let generations = vec![
            generation("mine", "a", 1, 1, true),
            generation("theirs", "b", 1, 9, true),
        ];
        assert_eq!(latest_active(&generations, &tenant("a")).unwrap().id.as_str(), "mine");
        assert!(latest_active(&generations, &tenant("c")).is_none());
    }

    #[test]
    fn test_plan_first_generation() {
        let plan = GenerationPlan::for_existing(&[]);
        assert_eq!(plan.next_number, 1);
        assert!(plan.evict.is_none());
    }

    #[test]
    fn test_plan_below_capacity() {
        let existing = vec![generation("g1", "a", 1, 1, true), generation("g2", "a", 2, 2, true)];
        let plan = GenerationPlan::for_existing(&existing);
        assert_eq!(plan.next_number, 3);
        assert!(plan.evict.is_none());
    }

    #[test]
    fn test_plan_at_capacity_evicts_oldest() {
        let existing: Vec<_> = (1..=MAX_GENERATIONS)
            .map(|n| generation(&format!("g{n}"), "a", n, n, true))
            .collect();
        let plan = GenerationPlan::for_existing(&existing);
        assert_eq!(plan.next_number, 1);
        assert_eq!(plan.evict, Some(GenerationId::from("g1")));
    }

    #[test]
    fn test_plan_after_wraparound_evicts_earliest_upload() {
        // g1 was recycled as g1b, so g2 is now the earliest upload.
        let existing: Vec<_> = (2..=MAX_GENERATIONS)
            .map(|n| generation(&format!("g{n}"), "a", n, n, true))
            .chain(std::iter::once(generation("g1b", "a", 1, 23, true)))
            .collect();
        let plan = GenerationPlan::for_existing(&existing);
        assert_eq!(plan.next_number, 2);
        assert_eq!(plan.evict, Some(GenerationId::from("g2")));
    }

    #[test]
    fn test_plan_fills_gap_below_capacity() {
        let existing = vec![generation("g3", "a", 3, 3, true), generation("g6", "a", 6, 6, true)];
        let plan = GenerationPlan::for_existing(&existing);
        assert_eq!(plan.next_number, 1);
        assert!(plan.evict.is_none());
    }
}
