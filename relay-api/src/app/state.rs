use relay_core::MailgunClient;
use std::sync::Arc;

use super::rate_limit::RateLimiter;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<MailgunClient>,
    /// 全局限流（按客户端 IP）
    pub limiter: Arc<RateLimiter>,
    /// 是否从代理头中读取客户端 IP
    pub trust_proxy: bool,
}
