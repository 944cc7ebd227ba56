// ==========================================
// 考勤表客户端 - CSV 导出
// ==========================================
// 逗号分隔、所有字段加引号、列顺序与报表一致
// 无学生时只输出表头
// ==========================================

use crate::exporter::error::ExportResult;
use crate::exporter::report_builder::{CellValue, ReportTable};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn write<W: Write>(&self, table: &ReportTable, writer: W) -> ExportResult<()> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::CRLF)
            .from_writer(writer);

        writer.write_record(table.headers())?;
        for row in &table.rows {
            writer.write_record(row.cells.iter().map(CellValue::as_text))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_bytes(&self, table: &ReportTable) -> ExportResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(table, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class::{Class, Student};
    use crate::domain::thresholds::AttendanceThresholds;
    use crate::domain::types::AttendanceMark;
    use crate::exporter::report_builder::{ExportOptions, ReportBuilder};

    fn table_for(class: &Class) -> ReportTable {
        ReportBuilder::new()
            .build(
                class,
                2026,
                10,
                &AttendanceThresholds::default(),
                ExportOptions::default(),
            )
            .unwrap()
    }

    #[test]
    fn test_zero_students_is_header_only() {
        let class = Class::new("1", "Empty");
        let bytes = CsvExporter.to_bytes(&table_for(&class)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "\"Sr No\",\"Student Name\",\"Attendance %\",\"Status\",\"Total Present\",\"Total Absent\",\"Total Late\"\r\n"
        );
    }

    #[test]
    fn test_all_fields_quoted() {
        let mut class = Class::new("1", "Chem");
        let mut s = Student::with_name(1, "Doe, Jane", "R\"7");
        s.attendance.insert("2026-10-9".into(), AttendanceMark::Present);
        class.students.push(s);

        let text = String::from_utf8(CsvExporter.to_bytes(&table_for(&class)).unwrap()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(
            lines[1],
            "\"1\",\"Doe, Jane\",\"R\"\"7\",\"P\",\"100.000\",\"Excellent\",\"1\",\"0\",\"0\""
        );
    }
}
