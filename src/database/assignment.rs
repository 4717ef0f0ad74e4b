use std::collections::HashSet;

use anyhow::Context;
use sqlx::Row;

use crate::database::pool;
use crate::model::{assignment_item::Assignment, request::NewAssignmentRequest};

/// Courses the student is enrolled in within the organization.
pub async fn get_enrolled_course_ids(
    student_id: &str,
    organization_id: &str,
) -> anyhow::Result<HashSet<String>> {
    let rows = sqlx::query(
        "SELECT e.course_id
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        JOIN subjects s ON s.id = c.subject_id
        WHERE e.student_id = $1 AND s.organization_id = $2;",
    )
    .bind(student_id)
    .bind(organization_id)
    .fetch_all(pool()?)
    .await?;

    Ok(rows
        .iter()
        .map(|row| row.get::<String, _>("course_id"))
        .collect())
}

/// Every assessment in the given courses, with the fields visibility needs.
pub async fn get_course_assignments(course_ids: &HashSet<String>) -> anyhow::Result<Vec<Assignment>> {
    let course_ids = course_ids.iter().cloned().collect::<Vec<String>>();

    let rows = sqlx::query(
        "SELECT a.id, a.title, a.published, a.available_from, a.available_to, a.created_at,
            c.id AS course_id, c.name AS course_name, u.unit_order, s.organization_id
        FROM assessments a
        JOIN courses c ON c.id = a.course_id
        JOIN subjects s ON s.id = c.subject_id
        LEFT JOIN units u ON u.id = a.unit_id
        WHERE a.course_id = ANY($1);",
    )
    .bind(course_ids)
    .fetch_all(pool()?)
    .await?;

    let assignments = rows
        .iter()
        .map(|row| Assignment {
            id: row.get("id"),
            title: row.get("title"),
            published: row.get("published"),
            available_from: row.get("available_from"),
            available_to: row.get("available_to"),
            course_id: row.get("course_id"),
            course_name: row.get("course_name"),
            unit_order: row.get("unit_order"),
            organization_id: row.get("organization_id"),
            created_at: row.get("created_at"),
        })
        .collect::<Vec<Assignment>>();

    Ok(assignments)
}

pub async fn course_exists(course_id: &str) -> anyhow::Result<bool> {
    let row = sqlx::query("SELECT 1 FROM courses WHERE id = $1;")
        .bind(course_id)
        .fetch_optional(pool()?)
        .await?;

    Ok(row.is_some())
}

/// Inserts the assessment and its questions, returning the new assessment id.
pub async fn add_assignment(course_id: &str, req: &NewAssignmentRequest) -> anyhow::Result<String> {
    let mut transaction = pool()?.begin().await?;

    let assignment_id: String = sqlx::query(
        "INSERT INTO assessments (course_id, unit_id, title, published, available_from, available_to)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id;",
    )
    .bind(course_id)
    .bind(&req.unit_id)
    .bind(&req.title)
    .bind(req.published)
    .bind(req.available_from)
    .bind(req.available_to)
    .fetch_one(&mut *transaction)
    .await
    .context("could not insert assessment")?
    .get("id");

    for (position, question) in req.questions.iter().enumerate() {
        let options = serde_json::to_string(&question.options)?;
        sqlx::query(
            "INSERT INTO assessment_questions
            (assessment_id, position, question_key, prompt, points, question_type, options)
            VALUES ($1, $2, $3, $4, $5, $6, $7);",
        )
        .bind(&assignment_id)
        .bind(position as i32)
        .bind(&question.id)
        .bind(&question.prompt)
        .bind(question.points)
        .bind(question.options.kind())
        .bind(options)
        .execute(&mut *transaction)
        .await
        .with_context(|| format!("could not insert question {}", position + 1))?;
    }

    transaction
        .commit()
        .await
        .context("could not commit assessment")?;

    Ok(assignment_id)
}
