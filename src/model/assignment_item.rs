use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::availability::{self, WindowStatus};

/// An assessment row joined with its course and the course's organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub published: bool,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    pub course_id: String,
    pub course_name: String,
    pub unit_order: Option<i32>,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
}

/// What a student sees for one assignment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentItem {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub status: WindowStatus,
}

impl AssignmentItem {
    pub fn new(assignment: Assignment, now: DateTime<Utc>) -> Self {
        let status =
            availability::window_status(now, assignment.available_from, assignment.available_to);
        Self { assignment, status }
    }
}
