//! 验证辅助函数
//!
//! 设施 ID 会拼进存储键，写入前统一校验。

use crate::error::StorageError;

/// 验证设施 ID 非空且不含空白或分隔符。
pub fn ensure_place_id(place_id: &str) -> Result<(), StorageError> {
    if place_id.trim().is_empty() {
        return Err(StorageError::new("place_id required"));
    }
    if place_id
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_control() || ch == ':')
    {
        return Err(StorageError::new("place_id contains invalid characters"));
    }
    Ok(())
}
