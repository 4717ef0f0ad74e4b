use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One student's work on one assignment on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub student_id: String,
    pub assignment_id: String,
    pub date: NaiveDate,
    pub score: Option<f64>,
    pub time_spent_minutes: Option<i32>,
    pub completed: bool,
    pub attempts: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub student_id: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_score: f64,
    pub assignments_completed: i32,
    pub average_score: f64,
    pub best_day_of_week: Option<String>,
    pub worst_day_of_week: Option<String>,
    pub total_time_spent_minutes: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressTrend {
    pub improvement_rate: f64,
    pub trend: Trend,
}

/// Range summary for a student's dashboard.
///
/// `average_score` only counts rows that carry a score, unlike
/// [`WeeklyProgress::average_score`] which divides by every row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_rows: usize,
    pub completed: usize,
    pub completion_rate: f64,
    pub average_score: f64,
    pub total_time_spent_minutes: i32,
    pub trend: ProgressTrend,
}
