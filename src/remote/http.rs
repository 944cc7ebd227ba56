// ==========================================
// 考勤表客户端 - HTTP 响应检查
// ==========================================
// 非 2xx → RemoteError::Api，消息取自响应体:
//   detail（字符串 / {msg} 列表 / {msg} 对象）> message > 状态文本
// ==========================================

use crate::remote::error::RemoteError;
use serde_json::Value;

pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(RemoteError::Api {
        status: status.as_u16(),
        message: extract_error_message(&body, status.canonical_reason().unwrap_or("Unknown")),
    })
}

/// 从错误响应体提取消息
pub fn extract_error_message(body: &str, status_text: &str) -> String {
    let fallback = || format!("API Error: {}", status_text);
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    match value.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => return s.clone(),
        Some(Value::Array(items)) if !items.is_empty() => {
            return items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other
                        .get("msg")
                        .and_then(Value::as_str)
                        .unwrap_or("Validation error")
                        .to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
        }
        Some(obj @ Value::Object(_)) => {
            return obj
                .get("msg")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| obj.to_string());
        }
        _ => {}
    }

    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(fallback)
}
