use axum::{http::StatusCode, response::Response};

use crate::json_message;

/// The fallback route handler for paths that match no route.
pub async fn get_404_not_found() -> Response {
    json_message(StatusCode::NOT_FOUND, "Not found")
}
