// ==========================================
// 考勤表客户端 - 领域类型定义
// ==========================================
// 出勤标记 / 阈值分级 / 自定义列类型 / 用户角色
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 出勤标记 (Attendance Mark)
// ==========================================
// 未标记 = 考勤表中不存在该日期键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceMark {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
    #[serde(rename = "L")]
    Late,
}

impl AttendanceMark {
    /// 单字符编码（与后端、导出文件一致）
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceMark::Present => "P",
            AttendanceMark::Absent => "A",
            AttendanceMark::Late => "L",
        }
    }

    /// 从编码解析，未知编码返回 None
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "P" => Some(AttendanceMark::Present),
            "A" => Some(AttendanceMark::Absent),
            "L" => Some(AttendanceMark::Late),
            _ => None,
        }
    }

    /// 是否计入出勤（迟到也算出勤）
    pub fn counts_as_present(&self) -> bool {
        matches!(self, AttendanceMark::Present | AttendanceMark::Late)
    }

    /// 点击切换的下一个状态
    ///
    /// 循环: 未标记 → P → A → L → 未标记
    pub fn cycle(current: Option<AttendanceMark>) -> Option<AttendanceMark> {
        match current {
            None => Some(AttendanceMark::Present),
            Some(AttendanceMark::Present) => Some(AttendanceMark::Absent),
            Some(AttendanceMark::Absent) => Some(AttendanceMark::Late),
            Some(AttendanceMark::Late) => None,
        }
    }
}

impl fmt::Display for AttendanceMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 出勤分级 (Status Tier)
// ==========================================
// 顺序: AtRisk < Moderate < Good < Excellent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    AtRisk,
    Moderate,
    Good,
    Excellent,
}

impl StatusTier {
    /// 报表中使用的标签（文件格式契约，不做本地化）
    pub fn label(&self) -> &'static str {
        match self {
            StatusTier::Excellent => "Excellent",
            StatusTier::Good => "Good",
            StatusTier::Moderate => "Moderate",
            StatusTier::AtRisk => "At Risk",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "excellent" => Some(StatusTier::Excellent),
            "good" => Some(StatusTier::Good),
            "moderate" => Some(StatusTier::Moderate),
            "at risk" | "risk" => Some(StatusTier::AtRisk),
            _ => None,
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 自定义列类型 (Custom Column Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Select,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Select => write!(f, "select"),
        }
    }
}

impl std::str::FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "select" => Ok(ColumnType::Select),
            other => Err(format!("未知列类型: {}", other)),
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Teacher,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }

    /// 宽松解析：未知值按教师处理（与后端默认一致）
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "student" => UserRole::Student,
            _ => UserRole::Teacher,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
