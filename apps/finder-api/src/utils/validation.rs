//! 输入验证辅助函数
//!
//! 验证失败统一返回 bad_request_error 响应。

use crate::utils::response::bad_request_error;
use axum::response::Response;
use serde_json::Value;

/// 验证必填字段，去除空格并检查非空
pub fn normalize_required(value: Option<String>, field: &str) -> Result<String, Response> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(bad_request_error(format!("{field} required")));
    }
    Ok(trimmed.to_string())
}

/// 可选字段：去除空格，空串视为未提供
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 必填数值
pub fn require_number<T>(value: Option<T>, field: &str) -> Result<T, Response> {
    value.ok_or_else(|| bad_request_error(format!("{field} required")))
}

/// 必须是 JSON 布尔值
pub fn require_bool(value: Option<&Value>, field: &str) -> Result<bool, Response> {
    match value {
        Some(Value::Bool(flag)) => Ok(*flag),
        _ => Err(bad_request_error(format!("{field} must be a boolean"))),
    }
}

/// 评分：数字或数字字符串，整数 1..=5
pub fn parse_rating(value: Option<&Value>) -> Result<u8, Response> {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(rating) if rating.fract() == 0.0 && (1.0..=5.0).contains(&rating) => Ok(rating as u8),
        Some(_) => Err(bad_request_error("rating must be between 1 and 5")),
        None => Err(bad_request_error("rating required")),
    }
}
