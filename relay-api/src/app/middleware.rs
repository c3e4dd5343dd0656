use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::rate_limit::RateLimitDecision;
use super::state::AppState;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self';base-uri 'self';\
font-src 'self' https: data:;form-action 'self';frame-ancestors 'self';\
img-src 'self' data:;object-src 'none';script-src 'self';script-src-attr 'none';\
style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests";

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// 为所有响应追加安全相关响应头
pub async fn security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for &(name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

/// 从请求中提取客户端 IP
/// 仅在 trust_proxy 时读取代理头：X-Real-IP > X-Forwarded-For（第一个） > Socket Address
fn extract_client_ip(request: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(real_ip) = request
            .headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return real_ip.to_string();
        }

        if let Some(first_ip) = request
            .headers()
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return first_ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn ceil_secs(decision: &RateLimitDecision) -> u64 {
    decision.reset_after.as_secs_f64().ceil() as u64
}

/// IETF draft-7 风格的 RateLimit / RateLimit-Policy 头，不输出 X-RateLimit-*
fn insert_rate_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision, window_secs: u64) {
    let policy = format!("{};w={}", decision.limit, window_secs);
    let current = format!(
        "limit={}, remaining={}, reset={}",
        decision.limit,
        decision.remaining,
        ceil_secs(decision)
    );
    if let Ok(value) = HeaderValue::try_from(policy) {
        headers.insert(HeaderName::from_static("ratelimit-policy"), value);
    }
    if let Ok(value) = HeaderValue::try_from(current) {
        headers.insert(HeaderName::from_static("ratelimit"), value);
    }
}

/// 全局固定窗口限流，超限返回 429
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(&request, state.trust_proxy);
    let decision = state.limiter.hit(&client_ip).await;

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!("限流触发: IP={}, 路径={}", client_ip, request.uri().path());
        let mut response = ApiError::TooManyRequests.into_response();
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(ceil_secs(&decision)));
        response
    };

    insert_rate_limit_headers(
        response.headers_mut(),
        &decision,
        state.limiter.window().as_secs(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)], peer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn uses_peer_address_by_default() {
        let req = request(&[("X-Real-IP", "9.9.9.9")], Some("10.0.0.1:5555"));
        assert_eq!(extract_client_ip(&req, false), "10.0.0.1");
    }

    #[test]
    fn proxy_headers_honoured_when_trusted() {
        let req = request(&[("X-Real-IP", "9.9.9.9")], Some("10.0.0.1:5555"));
        assert_eq!(extract_client_ip(&req, true), "9.9.9.9");

        let req = request(
            &[("X-Forwarded-For", "8.8.8.8, 10.0.0.2")],
            Some("10.0.0.1:5555"),
        );
        assert_eq!(extract_client_ip(&req, true), "8.8.8.8");
    }

    #[test]
    fn unknown_without_connect_info() {
        let req = request(&[], None);
        assert_eq!(extract_client_ip(&req, true), "unknown");
    }

    #[test]
    fn rate_limit_header_format() {
        let decision = RateLimitDecision {
            allowed: true,
            limit: 5,
            remaining: 4,
            reset_after: std::time::Duration::from_millis(899_500),
        };
        let mut headers = HeaderMap::new();
        insert_rate_limit_headers(&mut headers, &decision, 900);
        assert_eq!(headers["ratelimit-policy"], "5;w=900");
        assert_eq!(headers["ratelimit"], "limit=5, remaining=4, reset=900");
    }
}
