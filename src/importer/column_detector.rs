// ==========================================
// 考勤表客户端 - 表头识别
// ==========================================
// 学生数据区域: 从首列到第一个日期列或汇总列（不含）
// 序号列: 丢弃
// 姓名列/学号列: 按别名匹配
// 其余列: 作为文本型自定义列
// ==========================================

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 日期列表头: 1 / 1/10 / 1-10 / 2026-10-1 / Date... / Day...
    static ref DATE_HEADERS: Vec<Regex> = vec![
        Regex::new(r"^\d{1,2}$").unwrap(),
        Regex::new(r"^\d{1,2}/\d{1,2}$").unwrap(),
        Regex::new(r"^\d{1,2}-\d{1,2}$").unwrap(),
        Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(),
        Regex::new(r"(?i)^date").unwrap(),
        Regex::new(r"(?i)^day").unwrap(),
    ];

    static ref WORD_SPLIT: Regex = Regex::new(r"[_\s]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// 导出报表的尾部汇总列
const SUMMARY_HEADERS: [&str; 5] = [
    "attendance %",
    "status",
    "total present",
    "total absent",
    "total late",
];

const NAME_ALIASES: [&str; 6] = [
    "name",
    "student_name",
    "student",
    "full_name",
    "studentname",
    "student name",
];

const ROLL_ALIASES: [&str; 8] = [
    "roll_no",
    "roll_number",
    "rollno",
    "roll",
    "id",
    "student_id",
    "roll no",
    "roll number",
];

pub fn is_date_header(header: &str) -> bool {
    let header = header.trim();
    DATE_HEADERS.iter().any(|re| re.is_match(header))
}

pub fn is_summary_header(header: &str) -> bool {
    let lower = header.trim().to_lowercase();
    SUMMARY_HEADERS.contains(&lower.as_str())
}

pub fn is_serial_header(header: &str) -> bool {
    let lower: String = header
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    lower.contains("sr")
        || lower.contains("serial")
        || lower.contains("no.")
        || matches!(
            lower.as_str(),
            "no" | "sno" | "s.no" | "srno" | "serialno" | "serialnumber"
        )
}

/// 学生数据区域的右边界（不含）
pub fn data_boundary(headers: &[String]) -> usize {
    headers
        .iter()
        .position(|h| is_date_header(h) || is_summary_header(h))
        .unwrap_or(headers.len())
}

fn normalized_alias(header: &str) -> String {
    WHITESPACE
        .replace_all(&header.to_lowercase(), "_")
        .into_owned()
}

fn matches_any(header: &str, aliases: &[&str]) -> bool {
    let normalized = normalized_alias(header);
    aliases
        .iter()
        .any(|alias| normalized == normalized_alias(alias))
}

pub fn is_name_header(header: &str) -> bool {
    matches_any(header, &NAME_ALIASES)
}

pub fn is_roll_header(header: &str) -> bool {
    matches_any(header, &ROLL_ALIASES)
}

/// "parent_phone" → "Parent Phone"
pub fn title_case_label(header: &str) -> String {
    WORD_SPLIT
        .split(header.trim())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 只大写首字母（文本文件表头）
pub fn capitalize_first(header: &str) -> String {
    let header = header.trim();
    let mut chars = header.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ==========================================
// ColumnLayout - 识别结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name_index: Option<usize>,
    pub roll_index: Option<usize>,
    /// (原始列下标, 原始表头)
    pub extra: Vec<(usize, String)>,
}

/// 按别名识别（CSV / Excel）
///
/// 找不到姓名别名时使用第一个剩余列
pub fn detect_by_alias(headers: &[String]) -> ColumnLayout {
    let candidates = data_candidates(headers);

    let mut name_index = candidates
        .iter()
        .copied()
        .find(|&i| is_name_header(&headers[i]));
    let roll_index = candidates
        .iter()
        .copied()
        .find(|&i| is_roll_header(&headers[i]) && Some(i) != name_index);
    if name_index.is_none() {
        name_index = candidates.iter().copied().find(|&i| Some(i) != roll_index);
    }

    let extra = candidates
        .into_iter()
        .filter(|&i| Some(i) != name_index && Some(i) != roll_index)
        .map(|i| (i, headers[i].clone()))
        .collect();

    ColumnLayout {
        name_index,
        roll_index,
        extra,
    }
}

/// 按位置识别（文本文件）: 第 1 列姓名，第 2 列学号
pub fn detect_by_position(headers: &[String]) -> ColumnLayout {
    let candidates = data_candidates(headers);
    let name_index = candidates.first().copied();
    let roll_index = candidates.get(1).copied();
    let extra = candidates
        .into_iter()
        .skip(2)
        .map(|i| (i, headers[i].clone()))
        .collect();

    ColumnLayout {
        name_index,
        roll_index,
        extra,
    }
}

fn data_candidates(headers: &[String]) -> Vec<usize> {
    (0..data_boundary(headers))
        .filter(|&i| !is_serial_header(&headers[i]))
        .collect()
}
