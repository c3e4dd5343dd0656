use thiserror::Error;

/// Common result type for core operations.
pub type Result<T> = std::result::Result<T, RelayError>;

/// 单个字段的校验失败原因（遇到第一个即返回）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be between {min} and {max} characters, got {actual}")]
    NameLength {
        min: usize,
        max: usize,
        actual: usize,
    },
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("message must be at least {min} characters, got {actual}")]
    MessageTooShort { min: usize, actual: usize },
    #[error("malformed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// 简短的错误类别，用于日志字段
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation",
            RelayError::Transport(_) => "transport",
            RelayError::Config(_) => "config",
        }
    }
}
