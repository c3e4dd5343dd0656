use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers::{favicon, greeting, submit_contact};
use super::middleware::{rate_limit_middleware, security_headers};
use super::state::AppState;

/// JSON 请求体上限
pub(super) const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Build the router with routes and middleware wired.
///
/// 中间件由外到内：请求日志 → 安全响应头 → 请求体大小限制 → 限流。
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(greeting))
        .route("/favicon.ico", get(favicon))
        .route("/contact", post(submit_contact))
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(from_fn(security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
