use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

/// GET / - 问候
pub async fn greeting() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello there" }))
}

/// GET /favicon.ico - 浏览器自动请求，直接返回 204
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
