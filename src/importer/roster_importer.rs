// ==========================================
// 考勤表客户端 - 名单导入器
// ==========================================
// 流程: 读取文件 → 表头识别 → 构建学生与自定义列
// 说明: 导入不读取日期列中的考勤数据，新学生考勤表为空
// ==========================================

use crate::domain::class::{new_column_id, new_student_id, Class, CustomColumn, Student};
use crate::domain::types::ColumnType;
use crate::importer::column_detector::{
    capitalize_first, detect_by_alias, detect_by_position, title_case_label, ColumnLayout,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawTable, SourceFormat, UniversalFileParser};
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument};

/// 无表头文本文件的默认表头
const DEFAULT_TEXT_HEADERS: [&str; 2] = ["Name", "Roll No"];

// ==========================================
// ImportedRoster - 导入结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedRoster {
    pub students: Vec<Student>,
    pub custom_columns: Vec<CustomColumn>,
}

impl ImportedRoster {
    /// 组装为新班级
    pub fn into_class(self, id: impl Into<String>, name: impl Into<String>) -> Class {
        let mut class = Class::new(id, name);
        class.students = self.students;
        class.custom_columns = self.custom_columns;
        class
    }
}

// ==========================================
// RosterImporter
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterImporter;

impl RosterImporter {
    pub fn new() -> Self {
        Self
    }

    /// 导入单个文件
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, path: P) -> ImportResult<ImportedRoster> {
        let (format, table) = UniversalFileParser.parse(path.as_ref())?;
        let roster = self.build(format, &table)?;
        info!(
            students = roster.students.len(),
            custom_columns = roster.custom_columns.len(),
            "名单导入完成"
        );
        Ok(roster)
    }

    /// 从已解析的二维表构建名单
    pub fn build(&self, format: SourceFormat, table: &RawTable) -> ImportResult<ImportedRoster> {
        let default_headers: Vec<String>;
        let headers: &[String] = if table.headers.is_empty() {
            default_headers = DEFAULT_TEXT_HEADERS.iter().map(|s| s.to_string()).collect();
            &default_headers
        } else {
            &table.headers
        };

        let layout = match format {
            SourceFormat::Csv | SourceFormat::Excel => detect_by_alias(headers),
            SourceFormat::Text => detect_by_position(headers),
        };
        let custom_columns = build_columns(format, &layout);

        let students: Vec<Student> = table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(row_idx, row)| {
                build_student(row_idx, row, &layout, &custom_columns)
            })
            .collect();

        if students.is_empty() {
            return Err(ImportError::NoStudentData);
        }

        Ok(ImportedRoster {
            students,
            custom_columns,
        })
    }
}

fn build_columns(format: SourceFormat, layout: &ColumnLayout) -> Vec<CustomColumn> {
    let mut columns: Vec<CustomColumn> = Vec::with_capacity(layout.extra.len());
    for (_, header) in &layout.extra {
        let label = match format {
            SourceFormat::Text => capitalize_first(header),
            SourceFormat::Csv | SourceFormat::Excel => title_case_label(header),
        };
        let mut id = new_column_id();
        while columns.iter().any(|c| c.id == id) {
            id = new_column_id();
        }
        columns.push(CustomColumn {
            id,
            label,
            column_type: ColumnType::Text,
            options: None,
        });
    }
    columns
}

fn build_student(
    row_idx: usize,
    row: &[String],
    layout: &ColumnLayout,
    columns: &[CustomColumn],
) -> Option<Student> {
    let cell = |idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let name = cell(layout.name_index);
    if name.is_empty() {
        return None;
    }

    let mut student = Student::with_name(new_student_id(row_idx as i64), name, cell(layout.roll_index));
    for ((col_idx, _), column) in layout.extra.iter().zip(columns) {
        let value = cell(Some(*col_idx));
        if !value.is_empty() {
            student.custom.insert(column.id.clone(), Value::String(value));
        }
    }
    Some(student)
}
