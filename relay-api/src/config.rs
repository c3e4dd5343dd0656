use std::env;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{bail, Context};
use relay_core::{MailgunSettings, DEFAULT_BASE_URL};
use url::Url;

const DEFAULT_PORT: u16 = 8084;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// 是否信任 X-Real-IP / X-Forwarded-For（仅在反向代理之后开启）
    pub trust_proxy: bool,
    pub mailgun: MailgunSettings,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 启动时一次性校验，缺少必填项直接失败
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            optional(key).with_context(|| format!("{key} must be set to a non-empty value"))
        };

        let port = match optional("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            None => DEFAULT_PORT,
        };
        let bind = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let base_url = optional("MAILGUN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("MAILGUN_BASE_URL is not a valid url: {base_url}"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("MAILGUN_BASE_URL must use http or https");
        }

        let trust_proxy = optional("TRUST_PROXY")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(false);

        let mailgun = MailgunSettings {
            base_url,
            domain: required("MAILGUN_DOMAIN")?,
            api_key: required("MAILGUN_API_KEY")?,
            from: required("CONTACT_FROM")?,
            to: required("CONTACT_TO")?,
        };

        Ok(Self {
            bind,
            trust_proxy,
            mailgun,
        })
    }
}
