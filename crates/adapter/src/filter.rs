//! Scalar filters passed with a search

use serde::{Deserialize, Serialize};

/// Restriction on the scalar `id` field applied during a search
///
/// `metadata` holds a literal condition such as `"> 1"` or `">= 5000"`; the
/// adapter prefixes it with the scalar field name. `id` is the threshold the
/// condition was generated from and is informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Condition appended to the scalar field name
    #[serde(default)]
    pub metadata: Option<String>,
    /// Threshold the condition was derived from
    #[serde(default)]
    pub id: Option<i64>,
}

impl SearchFilter {
    /// Filter with a literal condition
    pub fn metadata(condition: impl Into<String>) -> Self {
        SearchFilter {
            metadata: Some(condition.into()),
            id: None,
        }
    }

    /// Filter keeping ids `>= threshold`
    pub fn id_at_least(threshold: i64) -> Self {
        SearchFilter {
            metadata: Some(format!(">= {threshold}")),
            id: Some(threshold),
        }
    }

    /// The condition, if it restricts anything
    pub fn condition(&self) -> Option<&str> {
        self.metadata
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Predicate over `field`, or `None` for an empty filter
    pub fn expression(&self, field: &str) -> Option<String> {
        self.condition().map(|c| format!("{field} {c}"))
    }
}
