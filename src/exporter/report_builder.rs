// ==========================================
// 考勤表客户端 - 报表构建
// ==========================================
// 列顺序（固定）:
//   Sr No, Student Name, [Roll No], 自定义列..., 日期列...,
//   Attendance %, Status, Total Present, Total Absent, Total Late
// Roll No 仅在任一学生学号非空时输出
// 出勤率按导出日期列内的 P/A/L 计数独立计算
// ==========================================

use crate::domain::class::Class;
use crate::domain::day_key::{month_day_keys, month_title, DayKey};
use crate::domain::thresholds::AttendanceThresholds;
use crate::domain::types::{AttendanceMark, StatusTier};
use crate::engine::aggregator::AttendanceAggregator;
use crate::engine::classifier::classify;
use crate::exporter::error::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const HEADER_SERIAL: &str = "Sr No";
pub const HEADER_NAME: &str = "Student Name";
pub const HEADER_ROLL: &str = "Roll No";
pub const HEADER_PERCENTAGE: &str = "Attendance %";
pub const HEADER_STATUS: &str = "Status";
pub const HEADER_TOTAL_PRESENT: &str = "Total Present";
pub const HEADER_TOTAL_ABSENT: &str = "Total Absent";
pub const HEADER_TOTAL_LATE: &str = "Total Late";

/// 尾部汇总列数
pub const TRAILING_COLUMNS: usize = 5;

// ==========================================
// 导出格式与选项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("未知导出格式: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// true: 只导出至少有一名学生被标记的日期；false: 导出整月
    pub only_class_days: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            only_class_days: true,
        }
    }
}

// ==========================================
// 报表结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    SerialNo,
    Name,
    RollNo,
    /// 自定义列 ID
    Custom(String),
    /// 当月第几天
    Day(u32),
    Percentage,
    Status,
    TotalPresent,
    TotalAbsent,
    TotalLate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumn {
    pub kind: ColumnKind,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
}

impl CellValue {
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub cells: Vec<CellValue>,
    pub status: StatusTier,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub class_id: String,
    pub class_name: String,
    pub year: i32,
    pub month: u32,
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn day_column_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| matches!(c.kind, ColumnKind::Day(_)))
            .count()
    }

    pub fn month_title(&self) -> String {
        month_title(self.year, self.month)
    }

    /// 下载文件名: <班级>_<Month>_<Year>_Attendance.<ext>
    ///
    /// 班级名中的路径分隔符、保留字符与开头的 '.' 替换为 '_'
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!(
            "{}_{}_Attendance.{}",
            sanitize_file_stem(&self.class_name),
            self.month_title().replace(' ', "_"),
            format.extension()
        )
    }
}

const RESERVED_FILE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

fn sanitize_file_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if RESERVED_FILE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let dots = replaced.chars().take_while(|c| *c == '.').count();
    format!("{}{}", "_".repeat(dots), &replaced[dots..])
}

// ==========================================
// ReportBuilder
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    aggregator: AttendanceAggregator,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            aggregator: AttendanceAggregator::new(),
        }
    }

    /// 构建报表
    ///
    /// # 参数
    /// - thresholds: 已解析的生效阈值（班级覆盖或用户默认）
    #[instrument(skip(self, class, thresholds), fields(class_id = %class.id))]
    pub fn build(
        &self,
        class: &Class,
        year: i32,
        month: u32,
        thresholds: &AttendanceThresholds,
        options: ExportOptions,
    ) -> ExportResult<ReportTable> {
        if !(1..=12).contains(&month) {
            return Err(ExportError::InvalidMonth(month));
        }

        let has_roll = class.has_roll_numbers();
        let days = self.included_days(class, year, month, options);

        let mut columns = vec![
            column(ColumnKind::SerialNo, HEADER_SERIAL),
            column(ColumnKind::Name, HEADER_NAME),
        ];
        if has_roll {
            columns.push(column(ColumnKind::RollNo, HEADER_ROLL));
        }
        for custom in &class.custom_columns {
            columns.push(column(ColumnKind::Custom(custom.id.clone()), &custom.label));
        }
        for day in &days {
            columns.push(column(ColumnKind::Day(day.day), &day.day.to_string()));
        }
        columns.extend([
            column(ColumnKind::Percentage, HEADER_PERCENTAGE),
            column(ColumnKind::Status, HEADER_STATUS),
            column(ColumnKind::TotalPresent, HEADER_TOTAL_PRESENT),
            column(ColumnKind::TotalAbsent, HEADER_TOTAL_ABSENT),
            column(ColumnKind::TotalLate, HEADER_TOTAL_LATE),
        ]);

        let rows = class
            .students
            .iter()
            .enumerate()
            .map(|(index, student)| {
                let summary = self.aggregator.summarize_days(student, &days);
                let status = classify(summary.percentage(), thresholds);

                let cells = columns
                    .iter()
                    .map(|col| match &col.kind {
                        ColumnKind::SerialNo => CellValue::Integer(index as i64 + 1),
                        ColumnKind::Name => CellValue::Text(student.name.clone()),
                        ColumnKind::RollNo => CellValue::Text(student.roll_no.clone()),
                        ColumnKind::Custom(id) => CellValue::Text(student.custom_text(id)),
                        ColumnKind::Day(day) => CellValue::Text(
                            student
                                .mark_on(&DayKey::new(year, month, *day))
                                .map(|m| m.code().to_string())
                                .unwrap_or_default(),
                        ),
                        ColumnKind::Percentage => CellValue::Text(summary.percentage_text()),
                        ColumnKind::Status => CellValue::Text(status.label().to_string()),
                        ColumnKind::TotalPresent => CellValue::Integer(summary.present as i64),
                        ColumnKind::TotalAbsent => CellValue::Integer(summary.absent as i64),
                        ColumnKind::TotalLate => CellValue::Integer(summary.late as i64),
                    })
                    .collect();

                ReportRow { cells, status }
            })
            .collect::<Vec<_>>();

        debug!(columns = columns.len(), rows = rows.len(), "报表构建完成");

        Ok(ReportTable {
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            year,
            month,
            columns,
            rows,
        })
    }

    fn included_days(
        &self,
        class: &Class,
        year: i32,
        month: u32,
        options: ExportOptions,
    ) -> Vec<DayKey> {
        let all = month_day_keys(year, month);
        if !options.only_class_days {
            return all;
        }
        all.into_iter()
            .filter(|day| class.students.iter().any(|s| s.mark_on(day).is_some()))
            .collect()
    }
}

fn column(kind: ColumnKind, header: &str) -> ReportColumn {
    ReportColumn {
        kind,
        header: header.to_string(),
    }
}

/// 日期列单元格的标记（PDF 着色使用）
pub fn mark_of(cell: &CellValue) -> Option<AttendanceMark> {
    match cell {
        CellValue::Text(s) => AttendanceMark::from_code(s),
        CellValue::Integer(_) => None,
    }
}
