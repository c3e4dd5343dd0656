//! 联系表单数据模型与校验

use std::str::FromStr;
use std::sync::LazyLock;

use lettre::Address;
use regex::Regex;
use serde::Deserialize;

use crate::error::ValidationError;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 255;
pub const MESSAGE_MIN_CHARS: usize = 10;

/// 只接受未加引号的 dot-atom 本地部分和带点、顶级域至少两个字母的域名
static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("valid email regex")
});

fn check_email(raw: &str) -> Result<Address, ValidationError> {
    let address =
        Address::from_str(raw).map_err(|e| ValidationError::InvalidEmail(e.to_string()))?;
    let user = address.user();
    if !EMAIL_SHAPE.is_match(raw) || user.starts_with('.') || user.contains("..") {
        return Err(ValidationError::InvalidEmail(format!(
            "unsupported address form: {raw}"
        )));
    }
    Ok(address)
}

/// 原始请求体（尚未校验）
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// 通过校验的联系表单，仅在单次请求内存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    name: String,
    email: Address,
    message: String,
}

impl ContactSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        self.email.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<ContactForm> for ContactSubmission {
    type Error = ValidationError;

    /// 按 name → email → message 顺序校验，遇到第一个错误立即返回
    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let name_len = form.name.chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(ValidationError::NameLength {
                min: NAME_MIN_CHARS,
                max: NAME_MAX_CHARS,
                actual: name_len,
            });
        }

        let email = check_email(&form.email)?;

        let message_len = form.message.chars().count();
        if message_len < MESSAGE_MIN_CHARS {
            return Err(ValidationError::MessageTooShort {
                min: MESSAGE_MIN_CHARS,
                actual: message_len,
            });
        }

        Ok(Self {
            name: form.name,
            email,
            message: form.message,
        })
    }
}
