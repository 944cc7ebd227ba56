// ==========================================
// 考勤表客户端 - 导出层
// ==========================================
// 职责: 班级 + 考勤 → 报表表格 → CSV / Excel / PDF 字节
// ==========================================

pub mod csv_exporter;
pub mod error;
pub mod excel_exporter;
pub mod pdf_layout;
pub mod pdf_renderer;
pub mod qr_image;
pub mod report_builder;

pub use csv_exporter::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use excel_exporter::ExcelExporter;
pub use pdf_layout::{Orientation, PdfLayout};
pub use pdf_renderer::PdfRenderer;
pub use qr_image::render_qr_svg;
pub use report_builder::{
    CellValue, ColumnKind, ExportFormat, ExportOptions, ReportBuilder, ReportColumn, ReportRow,
    ReportTable,
};

use chrono::NaiveDate;

/// 按格式编码报表
pub fn encode(
    table: &ReportTable,
    format: ExportFormat,
    orientation: Orientation,
    generated_on: NaiveDate,
) -> ExportResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => CsvExporter.to_bytes(table),
        ExportFormat::Excel => ExcelExporter.to_bytes(table),
        ExportFormat::Pdf => PdfRenderer.render(table, orientation, generated_on),
    }
}
