// ==========================================
// 考勤表客户端 - 二维码考勤会话数据
// ==========================================
// 会话状态由后端维护（轮换码、已扫描名单）
// 客户端只负责轮询、渲染与倒计时显示
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 后端返回的会话信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrSessionInfo {
    #[serde(deserialize_with = "lenient_string")]
    pub class_id: String,
    pub current_code: String,
    #[serde(default)]
    pub attendance_date: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default = "default_rotation_interval")]
    pub rotation_interval: u64,
    #[serde(default)]
    pub scanned_students: Vec<Value>,
    #[serde(default)]
    pub status: String,
}

impl QrSessionInfo {
    pub fn scanned_count(&self) -> usize {
        self.scanned_students.len()
    }
}

/// 默认轮换间隔（秒）
pub const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 5;

fn default_rotation_interval() -> u64 {
    DEFAULT_ROTATION_INTERVAL_SECS
}

/// 二维码内容：{"class_id": "...", "code": "..."}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub class_id: String,
    pub code: String,
}

impl QrPayload {
    pub fn new(class_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            code: code.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// 解析扫码得到的文本
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw.trim())
    }
}

/// 结束会话的汇总（后端已将未扫码学生记为缺勤）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrStopSummary {
    pub scanned_count: u32,
    pub absent_count: u32,
    pub date: String,
}

/// 学生扫码结果
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QrScanResult {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub date: String,
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_json_shape() {
        let payload = QrPayload::new("1700", "AB12CD34");
        let value: Value = serde_json::from_str(&payload.to_json()).unwrap();
        assert_eq!(value, json!({"class_id": "1700", "code": "AB12CD34"}));
        assert_eq!(QrPayload::parse(&payload.to_json()).unwrap(), payload);
    }

    #[test]
    fn test_session_info_defaults() {
        let info: QrSessionInfo = serde_json::from_value(json!({
            "class_id": 1700,
            "current_code": "XYZ"
        }))
        .unwrap();
        assert_eq!(info.class_id, "1700");
        assert_eq!(info.rotation_interval, DEFAULT_ROTATION_INTERVAL_SECS);
        assert_eq!(info.scanned_count(), 0);
    }
}
