use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::{RelayError, ValidationError};
use serde_json::json;

pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests, please try again later.";

/// 对外只暴露 `{"success": false}`，内部保留具体原因用于日志
#[derive(Debug)]
pub enum ApiError {
    /// 联系表单处理失败（校验、传输、配置）
    Contact(RelayError),
    TooManyRequests,
}

impl ApiError {
    fn log(&self) {
        match self {
            ApiError::Contact(err @ RelayError::Validation(_)) => {
                tracing::warn!(kind = err.kind(), error = %err, "contact submission rejected");
            }
            ApiError::Contact(err) => {
                tracing::error!(kind = err.kind(), error = %err, "contact submission failed");
            }
            ApiError::TooManyRequests => {}
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError::Contact(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Contact(RelayError::Validation(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::Malformed(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            ApiError::Contact(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "success": false }))).into_response()
            }
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "message": TOO_MANY_REQUESTS_MESSAGE })),
            )
                .into_response(),
        }
    }
}
