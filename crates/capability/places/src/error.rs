//! 上游调用错误。

/// 上游地点服务错误。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacesError {
    /// 传输层失败（连接、超时、非 2xx）。
    #[error("upstream http error: {0}")]
    Http(String),
    /// 上游返回非成功业务状态。
    #[error("upstream status {status}: {message}")]
    Status { status: String, message: String },
    /// 响应体无法解析。
    #[error("upstream decode error: {0}")]
    Decode(String),
}

impl PlacesError {
    /// 业务状态错误时返回上游状态值。
    pub fn upstream_status(&self) -> Option<&str> {
        match self {
            PlacesError::Status { status, .. } => Some(status.as_str()),
            _ => None,
        }
    }
}
