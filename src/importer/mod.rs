// ==========================================
// 考勤表客户端 - 导入层
// ==========================================
// 职责: 从 CSV / Excel / 文本文件导入学生名单
// ==========================================

pub mod column_detector;
pub mod error;
pub mod file_parser;
pub mod roster_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawTable, SourceFormat, TextParser, UniversalFileParser};
pub use roster_importer::{ImportedRoster, RosterImporter};
