use anyhow::{Context, ensure};
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, rejection::JsonRejection},
    response::Response,
};
use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::{
    database,
    endpoints::{bad_request, internal_error, json_ok, request_body},
    model::{
        progress::{DailyProgress, WeeklyProgress},
        request::{ProgressRequest, RangeQuery, WeekQuery},
    },
    progress,
};

/// How far back a summary reaches when no start date is given.
const DEFAULT_SUMMARY_DAYS: i64 = 28;

/// Records a day's progress, then recomputes and stores that week's rollup.
pub async fn record_progress(
    Path(student_id): Path<String>,
    body: Result<Json<ProgressRequest>, JsonRejection>,
) -> Response<Body> {
    let req = match request_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if let Err(e) = req.validate() {
        return bad_request(e);
    }
    let (week_start, week_end) = match week_of(req.date) {
        Ok(bounds) => bounds,
        Err(e) => return bad_request(e),
    };

    let daily = DailyProgress {
        student_id: student_id.clone(),
        assignment_id: req.assignment_id,
        date: req.date,
        score: req.score,
        time_spent_minutes: req.time_spent_minutes,
        completed: req.completed,
        attempts: req.attempts,
    };

    if let Err(e) = database::progress::upsert_daily(&daily).await {
        return internal_error("Could not record progress", e);
    }

    let weekly = match rollup_week(&student_id, week_start, week_end).await {
        Ok(w) => w,
        Err(e) => return internal_error("Could not roll up week", e),
    };

    if let Err(e) = database::progress::upsert_weekly(&weekly).await {
        return internal_error("Could not store weekly progress", e);
    }

    info!(
        "Recorded progress for {student_id} on {}, week of {} now averages {:.1}",
        daily.date, weekly.week_start, weekly.average_score
    );

    json_ok(&weekly)
}

/// The rollup for the week containing `date` (default: today).
pub async fn get_weekly_progress(
    Path(student_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> Response<Body> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let (week_start, week_end) = match week_of(date) {
        Ok(bounds) => bounds,
        Err(e) => return bad_request(e),
    };
    match rollup_week(&student_id, week_start, week_end).await {
        Ok(weekly) => json_ok(&weekly),
        Err(e) => internal_error("Could not roll up week", e),
    }
}

/// Completion, scored-row average, and trend over a date range.
pub async fn get_progress_summary(
    Path(student_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Response<Body> {
    let (from, to) = match resolve_range(&query, Utc::now().date_naive()) {
        Ok(r) => r,
        Err(e) => return bad_request(e),
    };

    match database::progress::get_daily_between(&student_id, from, to).await {
        Ok(rows) => json_ok(&progress::summarize(&rows)),
        Err(e) => internal_error("Could not fetch progress", e),
    }
}

async fn rollup_week(
    student_id: &str,
    week_start: NaiveDate,
    week_end: NaiveDate,
) -> anyhow::Result<WeeklyProgress> {
    let rows = database::progress::get_daily_between(student_id, week_start, week_end).await?;
    Ok(progress::weekly_rollup(student_id, &rows, week_start, week_end))
}

fn week_of(date: NaiveDate) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    progress::week_bounds(date).with_context(|| format!("the week of {date} is out of range"))
}

fn resolve_range(query: &RangeQuery, today: NaiveDate) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let to = query.to.unwrap_or(today);
    let from = match query.from {
        Some(from) => from,
        None => to
            .checked_sub_signed(Duration::days(DEFAULT_SUMMARY_DAYS - 1))
            .with_context(|| format!("no default start date before {to}"))?,
    };
    ensure!(from <= to, "from ({from}) is after to ({to})");
    Ok((from, to))
}
