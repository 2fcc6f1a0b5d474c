use serde::{Deserialize, Serialize};

use crate::id::{generate_id, generate_tie_breaker, now_rfc3339, SERVICE_PRINCIPAL};
use crate::list::ListType;

/// A single value entry belonging to exactly one list.
///
/// The `type` field mirrors the parent list's type. `value` is opaque to the
/// service; no format validation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemRecord {
    pub id: String,
    pub list_id: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
    pub value: String,
    /// RFC 3339 timestamp string.
    pub created_at: String,
    pub created_by: String,
    /// RFC 3339 timestamp string.
    pub updated_at: String,
    pub updated_by: String,
    /// Random value for stable ordering of records with equal timestamps.
    pub tie_breaker_id: String,
    /// Starts at 1, incremented on every update.
    pub version: i64,
}

/// Body of `POST /api/lists/items`. The referenced `list_id` must exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListItemRequest {
    /// Omit to have the server generate one.
    #[serde(default)]
    pub id: Option<String>,
    pub list_id: String,
    pub value: String,
}

/// Body of `PUT /api/lists/items`. `value` is the only mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateListItemRequest {
    pub id: String,
    pub value: String,
}

impl ListItemRecord {
    /// Build a record from a create request. The item's type is inherited
    /// from the parent list; the caller resolves it before constructing.
    pub fn from_create(req: CreateListItemRequest, list_type: ListType) -> Self {
        let now = now_rfc3339();
        Self {
            id: req.id.unwrap_or_else(generate_id),
            list_id: req.list_id,
            list_type,
            value: req.value,
            created_at: now.clone(),
            created_by: SERVICE_PRINCIPAL.to_string(),
            updated_at: now,
            updated_by: SERVICE_PRINCIPAL.to_string(),
            tie_breaker_id: generate_tie_breaker(),
            version: 1,
        }
    }

    /// Replace `value`, refresh `updated_at` / `updated_by`, bump `version`.
    /// `id`, `list_id`, and creation metadata are preserved.
    pub fn apply_update(&mut self, req: &UpdateListItemRequest) {
        self.value = req.value.clone();
        self.updated_at = now_rfc3339();
        self.updated_by = SERVICE_PRINCIPAL.to_string();
        self.version += 1;
    }
}
