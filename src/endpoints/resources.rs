use axum::{body::Body, extract::Path, response::Response};
use chrono::Duration;

use crate::{
    database,
    endpoints::{internal_error, json_ok},
    grouping::{self, DEFAULT_WINDOW},
    model::resource::Resource,
};

/// Lists a course's resources, grouped by label and upload time.
pub async fn list_course_resources(Path(course_id): Path<String>) -> Response<Body> {
    let resources = match database::resource::get_course_resources(&course_id).await {
        Ok(r) => r,
        Err(e) => return internal_error("Could not fetch resources", e),
    };

    let window = crate::GROUPING_WINDOW.get().copied().unwrap_or(DEFAULT_WINDOW);
    grouped_response(&resources, window)
}

fn grouped_response(resources: &[Resource], window: Duration) -> Response<Body> {
    let grouped = grouping::group_resources_within(resources, window);
    json_ok(&grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::tests::body_string;
    use axum::http::StatusCode;
    use chrono::{TimeZone, Utc};

    fn resource(id: &str, minute: u32, label: Option<&str>) -> Resource {
        Resource {
            id: id.to_string(),
            title: format!("Slides {id}"),
            created_at: Utc.with_ymd_and_hms(2025, 9, 2, 10, minute, 0).unwrap(),
            label: label.map(str::to_string),
            file_size: 2048,
            file_type: "pdf".to_string(),
            created_by: "teacher-1".to_string(),
            course_id: "course-1".to_string(),
            unit_id: Some("unit-1".to_string()),
        }
    }

    #[tokio::test]
    async fn grouped_resources_are_tagged_by_kind() {
        let resources = vec![
            resource("a", 0, None),
            resource("b", 2, None),
            resource("c", 30, None),
            resource("d", 45, Some("Homework")),
        ];
        let response = grouped_response(&resources, DEFAULT_WINDOW);
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["kind"], "group");
        assert_eq!(items[0]["label"], "Homework");
        assert_eq!(items[1]["kind"], "group");
        assert_eq!(items[1]["totalSize"], 4096);
        assert_eq!(items[1]["fileTypes"], serde_json::json!(["pdf"]));
        assert_eq!(items[2]["kind"], "single");
        assert_eq!(items[2]["id"], "c");
        assert_eq!(items[2]["createdAt"], "2025-09-02T10:30:00Z");
    }
}
