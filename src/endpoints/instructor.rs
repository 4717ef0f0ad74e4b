use axum::{
    Json,
    body::Body,
    extract::{Path, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde_json::json;
use tracing::info;

use crate::{
    database,
    endpoints::{bad_request, internal_error, json_response, request_body, text_response},
    model::request::NewAssignmentRequest,
};

/// Creates an assessment (and its questions) in a course.
pub async fn add_assignment(
    Path(course_id): Path<String>,
    body: Result<Json<NewAssignmentRequest>, JsonRejection>,
) -> Response<Body> {
    let req = match request_body(body) {
        Ok(req) => req,
        Err(response) => return response,
    };
    if let Err(e) = req.validate() {
        return bad_request(e);
    }

    match database::assignment::course_exists(&course_id).await {
        Ok(true) => {}
        Ok(false) => return text_response(StatusCode::NOT_FOUND, "Course not found."),
        Err(e) => return internal_error("Could not look up course", e),
    }

    match database::assignment::add_assignment(&course_id, &req).await {
        Ok(id) => {
            info!(
                "Added assessment {id} to course {course_id} with {} questions",
                req.questions.len()
            );
            json_response(StatusCode::CREATED, &json!({ "id": id }))
        }
        Err(e) => internal_error("Could not add assessment", e),
    }
}
