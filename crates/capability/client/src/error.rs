//! 客户端错误类型。

/// 后端调用与输入校验错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("backend error: {0}")]
    Backend(String),
    /// 上游业务状态非成功（`UPSTREAM.<STATUS>`）。
    #[error("upstream status {status}: {message}")]
    Upstream { status: String, message: String },
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn upstream_status(&self) -> Option<&str> {
        match self {
            ClientError::Upstream { status, .. } => Some(status.as_str()),
            _ => None,
        }
    }
}

/// 单设施营业状态检查错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatusCheckError {
    /// 交互模式下用户取消。
    #[error("status check declined")]
    Declined,
    #[error("status lookup failed: {0}")]
    Lookup(ClientError),
}
