use sqlx::Row;

use crate::database::pool;
use crate::model::resource::Resource;

/// All resources uploaded to a course, in upload order.
pub async fn get_course_resources(course_id: &str) -> anyhow::Result<Vec<Resource>> {
    let rows = sqlx::query(
        "SELECT id, title, created_at, label, file_size, file_type, created_by, course_id, unit_id
        FROM resources
        WHERE course_id = $1
        ORDER BY created_at ASC, id ASC;",
    )
    .bind(course_id)
    .fetch_all(pool()?)
    .await?;

    let resources = rows
        .iter()
        .map(|row| Resource {
            id: row.get("id"),
            title: row.get("title"),
            created_at: row.get("created_at"),
            label: row.get("label"),
            file_size: row.get("file_size"),
            file_type: row.get("file_type"),
            created_by: row.get("created_by"),
            course_id: row.get("course_id"),
            unit_id: row.get("unit_id"),
        })
        .collect::<Vec<Resource>>();

    Ok(resources)
}
