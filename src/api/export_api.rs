// ==========================================
// 考勤表客户端 - 报表导出 API
// ==========================================
// 职责: 构建月度报表并编码为 CSV / Excel / PDF
// 文件名: <班级>_<月份>_<年>_Attendance.<扩展名>
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{AttendanceThresholds, Class};
use crate::exporter::{self, ExportError, ExportFormat, ExportOptions, Orientation, ReportBuilder};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportRequest {
    pub year: i32,
    pub month: u32,
    pub format: ExportFormat,
    pub orientation: Orientation,
    pub options: ExportOptions,
}

impl ExportRequest {
    pub fn new(year: i32, month: u32, format: ExportFormat) -> Self {
        Self {
            year,
            month,
            format,
            orientation: Orientation::default(),
            options: ExportOptions::default(),
        }
    }
}

/// 编码完成的报表
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportApi {
    builder: ReportBuilder,
}

impl ExportApi {
    pub fn new() -> Self {
        Self {
            builder: ReportBuilder::new(),
        }
    }

    /// 生成报表字节
    ///
    /// # 参数
    /// - default_thresholds: 班级无覆盖时使用的用户默认阈值
    /// - generated_on: 写入 PDF 页眉的生成日期
    #[instrument(skip(self, class, default_thresholds), fields(class_id = %class.id))]
    pub fn render(
        &self,
        class: &Class,
        default_thresholds: &AttendanceThresholds,
        request: &ExportRequest,
        generated_on: NaiveDate,
    ) -> ApiResult<ExportedReport> {
        let thresholds = class.effective_thresholds(default_thresholds);
        let table = self
            .builder
            .build(class, request.year, request.month, &thresholds, request.options)?;
        let bytes = exporter::encode(&table, request.format, request.orientation, generated_on)?;
        Ok(ExportedReport {
            file_name: table.file_name(request.format),
            bytes,
            row_count: table.rows.len(),
        })
    }

    /// 生成报表并写入目录
    ///
    /// # 返回
    /// 写入的文件路径
    pub fn export_to_dir(
        &self,
        class: &Class,
        default_thresholds: &AttendanceThresholds,
        request: &ExportRequest,
        dir: &Path,
    ) -> ApiResult<PathBuf> {
        let today = chrono::Local::now().date_naive();
        let report = self.render(class, default_thresholds, request, today)?;
        let path = dir.join(&report.file_name);
        std::fs::write(&path, &report.bytes).map_err(ExportError::from)?;
        info!(path = %path.display(), rows = report.row_count, "报表已导出");
        Ok(path)
    }
}
