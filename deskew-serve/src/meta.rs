use axum::{http::header, response::IntoResponse};

/// Serves the static API description document.
pub async fn api_description() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        include_str!("../openapi.json"),
    )
}
