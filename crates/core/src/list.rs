use serde::{Deserialize, Serialize};

use crate::id::{generate_id, generate_tie_breaker, now_rfc3339, SERVICE_PRINCIPAL};

/// The kind of values a list holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Ip,
    Keyword,
    Text,
}

/// A value list as stored and returned to API clients.
///
/// `created_at`, `created_by`, `updated_at`, `updated_by`, `tie_breaker_id`,
/// and `version` are server-generated; clients exclude them when comparing
/// records for equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
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

/// Body of `POST /api/lists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListRequest {
    /// Omit to have the server generate one.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
}

/// Body of `PUT /api/lists`. Only the supplied fields change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateListRequest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ListRecord {
    /// Build a record from a create request, filling in server-generated
    /// fields. Generates an id when the request omits one.
    pub fn from_create(req: CreateListRequest) -> Self {
        let now = now_rfc3339();
        Self {
            id: req.id.unwrap_or_else(generate_id),
            name: req.name,
            description: req.description,
            list_type: req.list_type,
            created_at: now.clone(),
            created_by: SERVICE_PRINCIPAL.to_string(),
            updated_at: now,
            updated_by: SERVICE_PRINCIPAL.to_string(),
            tie_breaker_id: generate_tie_breaker(),
            version: 1,
        }
    }

    /// Apply an update in place, refreshing `updated_at` / `updated_by`
    /// and bumping `version`. Fields absent from the request are untouched.
    pub fn apply_update(&mut self, req: &UpdateListRequest) {
        if let Some(name) = &req.name {
            self.name = name.clone();
        }
        if let Some(description) = &req.description {
            self.description = description.clone();
        }
        self.updated_at = now_rfc3339();
        self.updated_by = SERVICE_PRINCIPAL.to_string();
        self.version += 1;
    }
}
