use std::collections::HashSet;

use anyhow::{Context, ensure};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::question::Question;

/// Body of `POST /api/courses/{course_id}/assignments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub available_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub available_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl NewAssignmentRequest {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.title.trim().is_empty(), "assignment title is empty");
        if let (Some(from), Some(to)) = (self.available_from, self.available_to) {
            ensure!(from <= to, "availableFrom is after availableTo");
        }
        let mut ids = HashSet::new();
        for (i, question) in self.questions.iter().enumerate() {
            question
                .validate()
                .with_context(|| format!("question {}", i + 1))?;
            if let Some(id) = &question.id {
                ensure!(ids.insert(id.as_str()), "question id {id} is used twice");
            }
        }
        Ok(())
    }
}

/// Body of `POST /api/students/{student_id}/progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub assignment_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub time_spent_minutes: Option<i32>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "one")]
    pub attempts: i32,
}

/// A daily row cannot log more time than the day holds.
const MAX_DAILY_MINUTES: i32 = 24 * 60;

fn one() -> i32 {
    1
}

impl ProgressRequest {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.assignment_id.trim().is_empty(), "assignmentId is empty");
        if let Some(score) = self.score {
            ensure!((0.0..=100.0).contains(&score), "score must be between 0 and 100");
        }
        if let Some(minutes) = self.time_spent_minutes {
            ensure!(
                (0..=MAX_DAILY_MINUTES).contains(&minutes),
                "timeSpentMinutes must be between 0 and {MAX_DAILY_MINUTES}"
            );
        }
        ensure!(self.attempts >= 0, "attempts must not be negative");
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentQuery {
    pub now: Option<DateTime<Utc>>,
    /// Also list upcoming and closed assignments.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
