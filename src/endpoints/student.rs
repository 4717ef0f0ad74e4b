use axum::{
    body::Body,
    extract::{Path, Query},
    response::Response,
};
use chrono::Utc;

use crate::{
    assignment, database,
    endpoints::{internal_error, json_ok},
    model::{assignment_item::AssignmentItem, request::AssignmentQuery},
};

/// Assignments the student can open right now, each tagged with its window status.
///
/// `now` can be supplied as an RFC 3339 query parameter to preview another moment.
/// `all=true` also lists the upcoming and closed ones.
pub async fn get_visible_assignments(
    Path((organization_id, student_id)): Path<(String, String)>,
    Query(query): Query<AssignmentQuery>,
) -> Response<Body> {
    let now = query.now.unwrap_or_else(Utc::now);

    let enrolled =
        match database::assignment::get_enrolled_course_ids(&student_id, &organization_id).await {
            Ok(e) => e,
            Err(e) => return internal_error("Could not fetch enrollments", e),
        };

    if enrolled.is_empty() {
        return json_ok(&Vec::<AssignmentItem>::new());
    }

    let catalog = match database::assignment::get_course_assignments(&enrolled).await {
        Ok(c) => c,
        Err(e) => return internal_error("Could not fetch assignments", e),
    };

    let items =
        assignment::assignment_items(&catalog, &enrolled, &organization_id, now, query.all);

    json_ok(&items)
}
