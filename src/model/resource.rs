use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded course resource, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub label: Option<String>,
    pub file_size: i64,
    pub file_type: String,
    pub created_by: String,
    pub course_id: String,
    pub unit_id: Option<String>,
}

impl Resource {
    /// The grouping label, if it holds anything besides whitespace.
    pub fn group_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// A set of resources presented together. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    pub id: String,
    pub title: String,
    pub description: String,
    pub label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resources: Vec<Resource>,
    pub total_size: i64,
    pub file_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupedResource {
    Single(Resource),
    Group(ResourceGroup),
}
