use anyhow::Context;
use chrono::NaiveDate;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::database::pool;
use crate::model::progress::{DailyProgress, WeeklyProgress};

/// Inserts the day's row, replacing any earlier row for the same assignment and day.
pub async fn upsert_daily(row: &DailyProgress) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO daily_progress
        (student_id, assessment_id, date, score, time_spent_minutes, completed, attempts)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (student_id, assessment_id, date) DO UPDATE
        SET score = EXCLUDED.score,
            time_spent_minutes = EXCLUDED.time_spent_minutes,
            completed = EXCLUDED.completed,
            attempts = EXCLUDED.attempts;",
    )
    .bind(&row.student_id)
    .bind(&row.assignment_id)
    .bind(row.date)
    .bind(row.score)
    .bind(row.time_spent_minutes)
    .bind(row.completed)
    .bind(row.attempts)
    .execute(pool()?)
    .await
    .context("could not write daily progress")?;

    Ok(())
}

/// The student's rows between `from` and `to`, both inclusive, oldest first.
pub async fn get_daily_between(
    student_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<DailyProgress>> {
    let rows = sqlx::query(
        "SELECT student_id, assessment_id, date, score, time_spent_minutes, completed, attempts
        FROM daily_progress
        WHERE student_id = $1 AND date BETWEEN $2 AND $3
        ORDER BY date ASC, assessment_id ASC;",
    )
    .bind(student_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool()?)
    .await?;

    Ok(rows.iter().map(daily_from_row).collect())
}

pub async fn upsert_weekly(weekly: &WeeklyProgress) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO weekly_progress
        (student_id, week_start, week_end, total_score, assignments_completed, average_score,
            best_day_of_week, worst_day_of_week, total_time_spent_minutes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (student_id, week_start) DO UPDATE
        SET week_end = EXCLUDED.week_end,
            total_score = EXCLUDED.total_score,
            assignments_completed = EXCLUDED.assignments_completed,
            average_score = EXCLUDED.average_score,
            best_day_of_week = EXCLUDED.best_day_of_week,
            worst_day_of_week = EXCLUDED.worst_day_of_week,
            total_time_spent_minutes = EXCLUDED.total_time_spent_minutes;",
    )
    .bind(&weekly.student_id)
    .bind(weekly.week_start)
    .bind(weekly.week_end)
    .bind(weekly.total_score)
    .bind(weekly.assignments_completed)
    .bind(weekly.average_score)
    .bind(&weekly.best_day_of_week)
    .bind(&weekly.worst_day_of_week)
    .bind(weekly.total_time_spent_minutes)
    .execute(pool()?)
    .await
    .context("could not write weekly progress")?;

    Ok(())
}

fn daily_from_row(row: &PgRow) -> DailyProgress {
    DailyProgress {
        student_id: row.get("student_id"),
        assignment_id: row.get("assessment_id"),
        date: row.get("date"),
        score: row.get("score"),
        time_spent_minutes: row.get("time_spent_minutes"),
        completed: row.get("completed"),
        attempts: row.get("attempts"),
    }
}
