//! Contains all endpoint-associated functions, grouped by the area they serve.
//!
//! Handlers fetch rows through `database`, hand them to the pure modules
//! (`grouping`, `assignment`, `progress`), and serialize whatever comes back.
//! Bodies are JSON on success and plain text on failure.

use anyhow::anyhow;
use axum::{
    Json,
    body::Body,
    extract::rejection::JsonRejection,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::OK_JSON;

pub mod instructor;
pub mod progress;
pub mod resources;
pub mod student;

/// Liveness check
pub async fn health() -> Response<Body> {
    json_body(StatusCode::OK, OK_JSON.to_string())
}

/// Serializes `value` as a JSON body with the given status.
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    match serde_json::to_string(value) {
        Ok(json) => json_body(status, json),
        Err(e) => {
            tracing::error!("Could not serialize response: {e}");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.")
        }
    }
}

pub fn json_ok<T: Serialize>(value: &T) -> Response<Body> {
    json_response(StatusCode::OK, value)
}

pub fn text_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    (status, message.into()).into_response()
}

/// Logs the error chain and answers with a bare 500.
pub fn internal_error(context: &str, e: anyhow::Error) -> Response<Body> {
    tracing::error!("{context}: {e:#}");
    text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.")
}

/// Answers a rejected request with a 400 carrying the reason.
pub fn bad_request(e: anyhow::Error) -> Response<Body> {
    tracing::warn!("Rejected request: {e:#}");
    text_response(StatusCode::BAD_REQUEST, format!("Bad Request: {e:#}"))
}

/// Unwraps an extracted JSON body. Malformed or mistyped bodies become a 400.
pub fn request_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response<Body>> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(bad_request(anyhow!(rejection.body_text()))),
    }
}

fn json_body(status: StatusCode, json: String) -> Response<Body> {
    (status, [(CONTENT_TYPE, "application/json")], json).into_response()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use serde::de::DeserializeOwned;

    pub(crate) async fn extract_json<T: DeserializeOwned>(
        body: &'static str,
    ) -> Result<Json<T>, JsonRejection> {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        Json::<T>::from_request(request, &()).await
    }

    pub(crate) async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["message"], "OK");
    }

    #[tokio::test]
    async fn json_response_serializes_value() {
        let response = json_response(StatusCode::CREATED, &serde_json::json!({ "id": "a1" }));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_string(response).await, r#"{"id":"a1"}"#);
    }

    #[tokio::test]
    async fn bad_request_includes_reason() {
        let response = bad_request(anyhow::anyhow!("score must be between 0 and 100"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("score must be between 0 and 100"));
    }

    #[tokio::test]
    async fn mistyped_body_is_a_bad_request() {
        let extracted = extract_json::<serde_json::Map<String, serde_json::Value>>("[1, 2]").await;
        let response = request_body(extracted).unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.starts_with("Bad Request: "));
    }

    #[tokio::test]
    async fn well_formed_body_is_unwrapped() {
        let extracted = extract_json::<serde_json::Value>(r#"{"id":"a1"}"#).await;
        let value = request_body(extracted).unwrap();
        assert_eq!(value["id"], "a1");
    }
}
