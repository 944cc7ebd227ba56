// ==========================================
// 考勤表客户端 - Excel 导出
// ==========================================
// 单个工作表 "Attendance"，列宽按表头名称确定
// 序号与合计列写为数字，其余写为文本
// ==========================================

use crate::exporter::error::ExportResult;
use crate::exporter::report_builder::{
    CellValue, ReportTable, HEADER_NAME, HEADER_PERCENTAGE, HEADER_ROLL, HEADER_SERIAL,
    HEADER_STATUS,
};
use rust_xlsxwriter::Workbook;

pub const SHEET_NAME: &str = "Attendance";

/// 列宽（字符数）
pub fn column_width(header: &str) -> f64 {
    match header {
        HEADER_SERIAL => 8.0,
        HEADER_NAME => 25.0,
        HEADER_ROLL => 15.0,
        HEADER_PERCENTAGE => 13.0,
        HEADER_STATUS => 12.0,
        h if h.starts_with("Total") => 12.0,
        h if !h.is_empty() && h.trim().parse::<f64>().is_ok() => 7.0,
        _ => 15.0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelExporter;

impl ExcelExporter {
    fn build_workbook(&self, table: &ReportTable) -> ExportResult<Workbook> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, header) in table.headers().into_iter().enumerate() {
            let col = col as u16;
            sheet.write_string(0, col, header)?;
            sheet.set_column_width(col, column_width(header))?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, cell) in row.cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    CellValue::Integer(n) => {
                        sheet.write_number(row_num, col, *n as f64)?;
                    }
                    CellValue::Text(s) => {
                        sheet.write_string(row_num, col, s)?;
                    }
                }
            }
        }

        Ok(workbook)
    }

    pub fn to_bytes(&self, table: &ReportTable) -> ExportResult<Vec<u8>> {
        let mut workbook = self.build_workbook(table)?;
        Ok(workbook.save_to_buffer()?)
    }
}
