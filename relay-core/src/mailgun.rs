//! Mailgun 投递客户端：构造 multipart 表单并发起一次 POST

use reqwest::multipart::Form;
use reqwest::StatusCode;
use tracing::instrument;
use url::Url;

use crate::error::{RelayError, Result};
use crate::submission::ContactSubmission;

pub const DEFAULT_BASE_URL: &str = "https://api.eu.mailgun.net";
pub const SUBJECT: &str = "New contact form submission";

/// Mailgun Basic auth 固定用户名
const API_USER: &str = "api";

/// Mailgun 连接参数（启动时从环境变量读取，之后只读）
#[derive(Debug, Clone)]
pub struct MailgunSettings {
    pub base_url: Url,
    pub domain: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
}

/// 服务商对一次投递的答复
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// 服务商返回 200
    Accepted,
    /// 服务商返回了其他状态码
    Rejected(StatusCode),
}

impl DeliveryOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, DeliveryOutcome::Accepted)
    }
}

#[derive(Debug, Clone)]
pub struct MailgunClient {
    http: reqwest::Client,
    settings: MailgunSettings,
    endpoint: Url,
}

impl MailgunClient {
    pub fn new(settings: MailgunSettings) -> Result<Self> {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(http: reqwest::Client, settings: MailgunSettings) -> Result<Self> {
        let endpoint = messages_endpoint(&settings.base_url, &settings.domain)?;
        Ok(Self {
            http,
            settings,
            endpoint,
        })
    }

    /// 投递一条联系表单。只有传输层失败才返回 Err；非 200 答复返回 `Rejected`。
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn send(&self, submission: &ContactSubmission) -> Result<DeliveryOutcome> {
        let form = Form::new()
            .text("from", self.settings.from.clone())
            .text("to", self.settings.to.clone())
            .text("subject", SUBJECT)
            .text("html", render_html(submission));

        let response = self
            .http
            .post(self.endpoint.clone())
            .basic_auth(API_USER, Some(&self.settings.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            tracing::debug!("provider accepted message");
            Ok(DeliveryOutcome::Accepted)
        } else {
            tracing::warn!(status = %status, "provider rejected message");
            Ok(DeliveryOutcome::Rejected(status))
        }
    }
}

/// `{base}/v3/{domain}/messages`，domain 作为单独的 path segment 编码
fn messages_endpoint(base_url: &Url, domain: &str) -> Result<Url> {
    if domain.trim().is_empty() {
        return Err(RelayError::Config("mailgun domain is empty".into()));
    }
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| RelayError::Config(format!("base url cannot be a base: {base_url}")))?
        .pop_if_empty()
        .extend(["v3", domain, "messages"]);
    Ok(url)
}

/// 渲染邮件 HTML 正文，所有用户输入都会做 HTML 转义
pub fn render_html(submission: &ContactSubmission) -> String {
    format!(
        "Name: {}<br />Email: {}<br /><br />{}",
        tera::escape_html(submission.name()),
        tera::escape_html(submission.email()),
        tera::escape_html(submission.message()),
    )
}
