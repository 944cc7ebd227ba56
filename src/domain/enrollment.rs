// ==========================================
// 考勤表客户端 - 学生端视图
// ==========================================
// 学生加入的班级、个人考勤统计、班级验证结果
// ==========================================

use crate::domain::qr::lenient_string;
use crate::domain::thresholds::AttendanceThresholds;
use crate::domain::types::{AttendanceMark, StatusTier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 学生在班级中的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "rollNo", default)]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub attendance: BTreeMap<String, Value>,
}

impl StudentRecord {
    /// 只保留合法标记
    pub fn marks(&self) -> BTreeMap<String, AttendanceMark> {
        self.attendance
            .iter()
            .filter_map(|(k, v)| v.as_str().and_then(AttendanceMark::from_code).map(|m| (k.clone(), m)))
            .collect()
    }
}

/// 后端计算的个人统计（全部已标记日期，不区分月份）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentStatistics {
    #[serde(default)]
    pub total_classes: u32,
    #[serde(default)]
    pub present: u32,
    #[serde(default)]
    pub absent: u32,
    #[serde(default)]
    pub late: u32,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub status: String,
}

impl StudentStatistics {
    pub fn tier(&self) -> Option<StatusTier> {
        StatusTier::from_label(&self.status)
    }
}

/// 学生已加入的班级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledClass {
    #[serde(deserialize_with = "lenient_string")]
    pub class_id: String,
    pub class_name: String,
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub enrolled_at: Option<String>,
    #[serde(default)]
    pub re_enrolled_at: Option<String>,
    pub student_record: StudentRecord,
    #[serde(default)]
    pub thresholds: Option<AttendanceThresholds>,
    pub statistics: StudentStatistics,
}

/// 班级验证结果（公开接口，加入前确认班级存在）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassVerification {
    #[serde(default)]
    pub exists: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub class_id: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub teacher_name: String,
}

/// 加入班级请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentRequest {
    pub class_id: String,
    pub name: String,
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    pub email: String,
}
