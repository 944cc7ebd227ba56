// ==========================================
// 考勤表客户端 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx/.xls) / 文本 (.txt)
// 输出: 统一的二维表（表头 + 数据行），不做列语义识别
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs;
use std::io::Read;
use std::path::Path;

// ==========================================
// SourceFormat - 源文件格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Excel,
    Text,
}

impl SourceFormat {
    /// 按扩展名判定格式（大小写不敏感）
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xls" => Ok(SourceFormat::Excel),
            "txt" => Ok(SourceFormat::Text),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

// ==========================================
// RawTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// 表头；文本文件无表头时为空
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    fn parse_file(&self, path: &Path) -> ImportResult<RawTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|v| v.is_empty())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_reader<R: Read>(&self, reader: R) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if is_blank_row(&row) {
                continue;
            }
            rows.push(row);
        }

        Ok(RawTable { headers, rows })
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, path: &Path) -> ImportResult<RawTable> {
        ensure_exists(path)?;
        let file = fs::File::open(path)?;
        let table = self.parse_reader(file)?;
        if table.rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }
        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读取第一个工作表，首行为表头
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_file(&self, path: &Path) -> ImportResult<RawTable> {
        ensure_exists(path)?;

        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| ImportError::EmptyFile(path.display().to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in rows_iter {
            let row: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();
            if is_blank_row(&row) {
                continue;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }
        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Text Parser 实现
// ==========================================
// 分隔符按首行嗅探: 制表符 > 逗号 > 分号 > 空格
// 首行任一单元格非数字时视为表头
pub struct TextParser;

impl TextParser {
    pub fn sniff_delimiter(first_line: &str) -> char {
        if first_line.contains('\t') {
            '\t'
        } else if first_line.contains(',') {
            ','
        } else if first_line.contains(';') {
            ';'
        } else {
            ' '
        }
    }

    fn looks_numeric(cell: &str) -> bool {
        let trimmed = cell.trim();
        trimmed.is_empty() || trimmed.parse::<f64>().is_ok()
    }

    pub fn parse_str(&self, text: &str) -> ImportResult<RawTable> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        let Some(first_line) = lines.first() else {
            return Err(ImportError::EmptyFile("text".to_string()));
        };

        let delimiter = Self::sniff_delimiter(first_line);
        let data: Vec<Vec<String>> = lines
            .iter()
            .map(|line| {
                line.split(delimiter)
                    .map(|cell| cell.trim().to_string())
                    .collect()
            })
            .collect();

        let has_headers = data[0].iter().any(|cell| !Self::looks_numeric(cell));
        if has_headers {
            let mut iter = data.into_iter();
            let headers = iter.next().unwrap_or_default();
            Ok(RawTable {
                headers,
                rows: iter.collect(),
            })
        } else {
            Ok(RawTable {
                headers: Vec::new(),
                rows: data,
            })
        }
    }
}

impl FileParser for TextParser {
    fn parse_file(&self, path: &Path) -> ImportResult<RawTable> {
        ensure_exists(path)?;
        let text = fs::read_to_string(path)?;
        self.parse_str(&text).map_err(|e| match e {
            ImportError::EmptyFile(_) => ImportError::EmptyFile(path.display().to_string()),
            other => other,
        })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<(SourceFormat, RawTable)> {
        let path = file_path.as_ref();
        let format = SourceFormat::from_path(path)?;
        let table = match format {
            SourceFormat::Csv => CsvParser.parse_file(path)?,
            SourceFormat::Excel => ExcelParser.parse_file(path)?,
            SourceFormat::Text => TextParser.parse_file(path)?,
        };
        Ok((format, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.CSV")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("a.xls")).unwrap(), SourceFormat::Excel);
        assert_eq!(SourceFormat::from_path(Path::new("a.txt")).unwrap(), SourceFormat::Text);
        assert!(matches!(
            SourceFormat::from_path(Path::new("a.pdf")),
            Err(ImportError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }

    #[test]
    fn test_csv_parser_skips_blank_rows() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Name, Roll No ").unwrap();
        writeln!(temp_file, "Asha,R-1").unwrap();
        writeln!(temp_file, ",").unwrap();
        writeln!(temp_file, "Ben,R-2").unwrap();
        temp_file.flush().unwrap();

        let table = CsvParser.parse_file(temp_file.path()).unwrap();
        assert_eq!(table.headers, vec!["Name", "Roll No"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(1, 0), "Ben");
    }

    #[test]
    fn test_csv_parser_header_only_is_empty() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Name,Roll No").unwrap();
        temp_file.flush().unwrap();
        assert!(matches!(
            CsvParser.parse_file(temp_file.path()),
            Err(ImportError::EmptyFile(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = UniversalFileParser.parse("/nonexistent/roster.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_text_delimiter_sniffing() {
        assert_eq!(TextParser::sniff_delimiter("a\tb,c"), '\t');
        assert_eq!(TextParser::sniff_delimiter("a,b;c"), ',');
        assert_eq!(TextParser::sniff_delimiter("a;b c"), ';');
        assert_eq!(TextParser::sniff_delimiter("a b"), ' ');
    }

    #[test]
    fn test_text_without_headers() {
        let table = TextParser.parse_str("1\t2\n3\t4\n").unwrap();
        assert!(table.headers.is_empty());
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_text_with_headers() {
        let table = TextParser.parse_str("name;roll\nAsha;1\n\nBen;2\n").unwrap();
        assert_eq!(table.headers, vec!["name", "roll"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_text_empty() {
        assert!(matches!(
            TextParser.parse_str("\n  \n"),
            Err(ImportError::EmptyFile(_))
        ));
    }
}
