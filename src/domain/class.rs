// ==========================================
// 考勤表客户端 - 班级 / 学生 / 自定义列
// ==========================================
// 班级是客户端状态树的根：学生列表、自定义列定义、可选阈值
// 学生的自定义字段为显式开放映射：列 ID → 值，与班级的列定义对应
// ==========================================

use crate::domain::day_key::DayKey;
use crate::domain::thresholds::AttendanceThresholds;
use crate::domain::types::{AttendanceMark, ColumnType};
use chrono::Utc;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

// ==========================================
// 编辑错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassEditError {
    #[error("学生不存在: id={0}")]
    StudentNotFound(i64),

    #[error("自定义列不存在: id={0}")]
    ColumnNotFound(String),

    #[error("列名不能为空")]
    EmptyColumnLabel,
}

// ==========================================
// CustomColumn - 自定义列定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomColumn {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl CustomColumn {
    pub fn text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            column_type: ColumnType::Text,
            options: None,
        }
    }
}

/// 学生可编辑字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentField {
    Name,
    RollNo,
    Custom(String),
}

impl StudentField {
    /// 按前端字段名解析：name / rollNo / 其他均视为自定义列 ID
    pub fn from_key(key: &str) -> Self {
        match key {
            "name" => StudentField::Name,
            "rollNo" | "roll_no" => StudentField::RollNo,
            other => StudentField::Custom(other.to_string()),
        }
    }
}

// ==========================================
// Student - 学生记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "deserialize_student_id")]
    pub id: i64,
    #[serde(rename = "rollNo", default, deserialize_with = "string_or_empty")]
    pub roll_no: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 稀疏考勤表：日期键 → 标记
    #[serde(default, deserialize_with = "deserialize_attendance")]
    pub attendance: BTreeMap<String, AttendanceMark>,
    /// 自定义列值（序列化时平铺到学生对象上）
    #[serde(flatten)]
    pub custom: BTreeMap<String, Value>,
}

impl Student {
    /// 新建空白学生（考勤表为空）
    pub fn new(id: i64) -> Self {
        Self {
            id,
            roll_no: String::new(),
            name: String::new(),
            email: None,
            attendance: BTreeMap::new(),
            custom: BTreeMap::new(),
        }
    }

    pub fn with_name(id: i64, name: impl Into<String>, roll_no: impl Into<String>) -> Self {
        let mut student = Self::new(id);
        student.name = name.into();
        student.roll_no = roll_no.into();
        student
    }

    /// 读取某日标记
    ///
    /// 先查规范键，再查补零别名（后端二维码写入的格式）
    pub fn mark_on(&self, day: &DayKey) -> Option<AttendanceMark> {
        self.attendance
            .get(&day.key())
            .or_else(|| self.attendance.get(&day.padded_key()))
            .copied()
    }

    /// 写入某日标记；None 表示清除
    ///
    /// 写入总是落在规范键上，同时清理补零别名
    pub fn set_mark(&mut self, day: &DayKey, mark: Option<AttendanceMark>) {
        self.attendance.remove(&day.padded_key());
        match mark {
            Some(mark) => {
                self.attendance.insert(day.key(), mark);
            }
            None => {
                self.attendance.remove(&day.key());
            }
        }
    }

    pub fn has_roll_no(&self) -> bool {
        !self.roll_no.trim().is_empty()
    }

    /// 自定义列值的文本形式（导出使用）
    ///
    /// 缺失、null、false 与数值 0 均导出为空单元格
    pub fn custom_text(&self, column_id: &str) -> String {
        match self.custom.get(column_id) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

// ==========================================
// Class - 班级
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    #[serde(deserialize_with = "deserialize_class_id")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "vec_or_empty")]
    pub students: Vec<Student>,
    #[serde(rename = "customColumns", default, deserialize_with = "vec_or_empty")]
    pub custom_columns: Vec<CustomColumn>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_thresholds"
    )]
    pub thresholds: Option<AttendanceThresholds>,
}

impl Class {
    /// 新建空班级
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            students: Vec::new(),
            custom_columns: Vec::new(),
            thresholds: None,
        }
    }

    /// 生效阈值：班级覆盖整体替换用户默认值（不做字段合并）
    pub fn effective_thresholds(&self, default: &AttendanceThresholds) -> AttendanceThresholds {
        self.thresholds.unwrap_or(*default)
    }

    /// 是否有任意学生填写了学号
    pub fn has_roll_numbers(&self) -> bool {
        self.students.iter().any(Student::has_roll_no)
    }

    pub fn student(&self, student_id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    fn student_mut(&mut self, student_id: i64) -> Result<&mut Student, ClassEditError> {
        self.students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or(ClassEditError::StudentNotFound(student_id))
    }

    // ===== 学生操作 =====

    /// 追加空白学生，返回其 ID
    pub fn add_student(&mut self) -> i64 {
        let mut id = new_student_id(0);
        while self.students.iter().any(|s| s.id == id) {
            id += 1;
        }
        self.students.push(Student::new(id));
        id
    }

    pub fn update_student_field(
        &mut self,
        student_id: i64,
        field: &StudentField,
        value: Value,
    ) -> Result<(), ClassEditError> {
        if let StudentField::Custom(column_id) = field {
            if !self.custom_columns.iter().any(|c| &c.id == column_id) {
                return Err(ClassEditError::ColumnNotFound(column_id.clone()));
            }
        }

        let student = self.student_mut(student_id)?;
        match field {
            StudentField::Name => student.name = value_to_text(&value),
            StudentField::RollNo => student.roll_no = value_to_text(&value),
            StudentField::Custom(column_id) => {
                if value.is_null() {
                    student.custom.remove(column_id);
                } else {
                    student.custom.insert(column_id.clone(), value);
                }
            }
        }
        Ok(())
    }

    /// 删除学生（连同其考勤）
    pub fn delete_student(&mut self, student_id: i64) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != student_id);
        self.students.len() != before
    }

    /// 切换某学生某日的考勤: 未标记 → P → A → L → 未标记
    ///
    /// # 返回
    /// 切换后的标记
    pub fn toggle_attendance(
        &mut self,
        student_id: i64,
        day: &DayKey,
    ) -> Result<Option<AttendanceMark>, ClassEditError> {
        let student = self.student_mut(student_id)?;
        let next = AttendanceMark::cycle(student.mark_on(day));
        student.set_mark(day, next);
        Ok(next)
    }

    // ===== 列操作 =====

    /// 新增自定义列，ID 在班级内唯一
    pub fn add_column(
        &mut self,
        label: &str,
        column_type: ColumnType,
        options: Option<Vec<String>>,
    ) -> Result<&CustomColumn, ClassEditError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ClassEditError::EmptyColumnLabel);
        }

        let existing: HashSet<&str> = self.custom_columns.iter().map(|c| c.id.as_str()).collect();
        let mut id = new_column_id();
        while existing.contains(id.as_str()) {
            id = new_column_id();
        }

        self.custom_columns.push(CustomColumn {
            id,
            label: label.to_string(),
            column_type,
            options: if column_type == ColumnType::Select { options } else { None },
        });
        let index = self.custom_columns.len() - 1;
        Ok(&self.custom_columns[index])
    }

    /// 删除自定义列，同时移除所有学生上的该字段
    pub fn delete_column(&mut self, column_id: &str) -> bool {
        let before = self.custom_columns.len();
        self.custom_columns.retain(|c| c.id != column_id);
        if self.custom_columns.len() == before {
            return false;
        }
        for student in &mut self.students {
            student.custom.remove(column_id);
        }
        true
    }

    /// 重命名班级；空白或未变化时忽略
    ///
    /// # 返回
    /// 是否实际修改
    pub fn rename(&mut self, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() || trimmed == self.name {
            return false;
        }
        self.name = trimmed.to_string();
        true
    }

    pub fn set_thresholds(&mut self, thresholds: Option<AttendanceThresholds>) {
        self.thresholds = thresholds;
    }

    /// 规整从后端/本地缓存读入的班级
    ///
    /// - 清理与列定义不对应的自定义字段
    /// - 无阈值时填入用户默认阈值
    pub fn sanitize(&mut self, default_thresholds: &AttendanceThresholds) {
        let column_ids: HashSet<String> =
            self.custom_columns.iter().map(|c| c.id.clone()).collect();
        for student in &mut self.students {
            student.custom.retain(|key, value| column_ids.contains(key) && !value.is_null());
        }
        if self.thresholds.is_none() {
            self.thresholds = Some(*default_thresholds);
        }
    }
}

// ==========================================
// ID 生成
// ==========================================

/// 班级 ID：毫秒时间戳字符串
pub fn new_class_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// 学生 ID：毫秒时间戳 + 偏移（批量导入时按行号偏移）
pub fn new_student_id(offset: i64) -> i64 {
    Utc::now().timestamp_millis() + offset
}

/// 自定义列 ID：col_ 前缀 + 随机后缀
pub fn new_column_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("col_{}", &raw[..12])
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ==========================================
// 反序列化辅助（兼容后端 / 旧缓存的宽松格式）
// ==========================================

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

fn deserialize_student_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| de::Error::custom(format!("非法学生 ID: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("非法学生 ID: {}", s))),
        other => Err(de::Error::custom(format!("非法学生 ID: {}", other))),
    }
}

fn deserialize_class_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("非法班级 ID: {}", other))),
    }
}

/// 考勤表: 丢弃 null 与非 P/A/L 的值
fn deserialize_attendance<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, AttendanceMark>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_str()
                .and_then(AttendanceMark::from_code)
                .map(|mark| (key, mark))
        })
        .collect())
}

/// 阈值: 后端可能返回 {} 或不完整对象，无法解析时视为未设置
fn deserialize_thresholds<'de, D>(
    deserializer: D,
) -> Result<Option<AttendanceThresholds>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value::<AttendanceThresholds>(v).ok()))
}
