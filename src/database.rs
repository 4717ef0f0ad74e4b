use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Context, anyhow};
use sqlx::{
    Pool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::config::DatabaseConfig;

pub mod assignment;
pub mod progress;
pub mod resource;

static POSTGRES: OnceLock<Pool<Postgres>> = OnceLock::new();

/// The pool created by [`init_database`].
pub fn pool() -> anyhow::Result<&'static Pool<Postgres>> {
    POSTGRES.get().ok_or_else(|| anyhow!("database has not been initialized"))
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "organizations",
        "CREATE TABLE IF NOT EXISTS organizations(
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            name TEXT NOT NULL
        );",
    ),
    (
        "subjects",
        "CREATE TABLE IF NOT EXISTS subjects(
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
            name TEXT NOT NULL
        );",
    ),
    (
        "courses",
        "CREATE TABLE IF NOT EXISTS courses(
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            subject_id TEXT NOT NULL REFERENCES subjects (id) ON DELETE CASCADE,
            name TEXT NOT NULL
        );",
    ),
    (
        "units",
        "CREATE TABLE IF NOT EXISTS units(
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            unit_order INTEGER NOT NULL DEFAULT 0
        );",
    ),
    (
        "enrollments",
        "CREATE TABLE IF NOT EXISTS enrollments(
            student_id TEXT NOT NULL,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            CONSTRAINT enrollments_pkey PRIMARY KEY (student_id, course_id)
        );",
    ),
    (
        "assessments",
        "CREATE TABLE IF NOT EXISTS assessments(
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            unit_id TEXT REFERENCES units (id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            published BOOLEAN NOT NULL DEFAULT FALSE,
            available_from TIMESTAMPTZ,
            available_to TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );",
    ),
    (
        "assessment_questions",
        "CREATE TABLE IF NOT EXISTS assessment_questions(
            id INTEGER PRIMARY KEY GENERATED ALWAYS AS IDENTITY,
            assessment_id TEXT NOT NULL REFERENCES assessments (id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            question_key TEXT,
            prompt TEXT NOT NULL,
            points DOUBLE PRECISION NOT NULL,
            question_type TEXT NOT NULL,
            options TEXT NOT NULL
        );",
    ),
    (
        "resources",
        "CREATE TABLE IF NOT EXISTS resources(
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            course_id TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            unit_id TEXT REFERENCES units (id) ON DELETE SET NULL,
            title TEXT NOT NULL,
            label TEXT,
            file_size BIGINT NOT NULL DEFAULT 0,
            file_type TEXT NOT NULL,
            created_by TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        );",
    ),
    (
        "daily_progress",
        "CREATE TABLE IF NOT EXISTS daily_progress(
            student_id TEXT NOT NULL,
            assessment_id TEXT NOT NULL REFERENCES assessments (id) ON DELETE CASCADE,
            date DATE NOT NULL,
            score DOUBLE PRECISION,
            time_spent_minutes INTEGER,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            attempts INTEGER NOT NULL DEFAULT 1,
            CONSTRAINT daily_progress_pkey PRIMARY KEY (student_id, assessment_id, date)
        );",
    ),
    (
        "weekly_progress",
        "CREATE TABLE IF NOT EXISTS weekly_progress(
            student_id TEXT NOT NULL,
            week_start DATE NOT NULL,
            week_end DATE NOT NULL,
            total_score DOUBLE PRECISION NOT NULL,
            assignments_completed INTEGER NOT NULL,
            average_score DOUBLE PRECISION NOT NULL,
            best_day_of_week TEXT,
            worst_day_of_week TEXT,
            total_time_spent_minutes INTEGER NOT NULL,
            CONSTRAINT weekly_progress_pkey PRIMARY KEY (student_id, week_start)
        );",
    ),
];

/// Connects to Postgres and makes sure every table exists.
pub async fn init_database(config: &DatabaseConfig) -> anyhow::Result<()> {
    let url = config
        .url
        .as_deref()
        .context("no database url configured")?;

    // Every pooled connection resolves tables in our schema
    let options = PgConnectOptions::from_str(url)
        .context("invalid database url")?
        .options([("search_path", "classroom")]);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("failed to connect to Postgres")?;

    let mut transaction = pool.begin().await?;

    sqlx::query("CREATE SCHEMA IF NOT EXISTS classroom;")
        .execute(&mut *transaction)
        .await
        .context("could not create schema 'classroom'")?;

    for (table, statement) in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("could not create table {table}"))?;
    }

    transaction
        .commit()
        .await
        .context("could not commit table-creation transaction")?;

    if POSTGRES.set(pool).is_err() {
        tracing::warn!("database was already initialized");
    }

    Ok(())
}
