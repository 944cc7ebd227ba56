// ==========================================
// 考勤表客户端 - 日期键
// ==========================================
// 格式: year-month-day（月份 1 起，不补零），例如 "2026-3-7"
// 注意: 不补零导致字典序与时间序不一致，排序请使用 DayKey 的 Ord
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 月份英文名（报表标题、文件名使用）
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ==========================================
// DayKey - 考勤日期键
// ==========================================
// 字段顺序即比较顺序（year, month, day），派生 Ord 即为时间序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub day: u32,
}

impl DayKey {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }

    /// 规范键（不补零）
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    /// 补零形式（二维码会话由后端写入的格式）
    pub fn padded_key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    /// 解析日期键，兼容补零与不补零两种写法
    ///
    /// 非法格式或不存在的日期返回 None（调用方按"未命中"处理）
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().splitn(3, '-');
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = parts.next()?.parse::<u32>().ok()?;
        let day = parts.next()?.parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self::new(year, month, day))
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 当月天数
///
/// # 参数
/// - month: 1..=12；越界时返回 0
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(next) => (next - first).num_days() as u32,
        None => 0,
    }
}

/// 当月所有日期键（1..=days_in_month）
pub fn month_day_keys(year: i32, month: u32) -> Vec<DayKey> {
    (1..=days_in_month(year, month))
        .map(|day| DayKey::new(year, month, day))
        .collect()
}

/// "October 2026" 形式的月份标题
pub fn month_title(year: i32, month: u32) -> String {
    let name = MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown");
    format!("{} {}", name, year)
}

/// 按时间序排列原始日期键；无法解析的键排在末尾并保持字典序
pub fn sort_keys_chronologically<'a, I>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut parsed: Vec<(Option<DayKey>, &String)> =
        keys.into_iter().map(|k| (DayKey::parse(k), k)).collect();
    parsed.sort_by(|a, b| match (&a.0, &b.0) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.1.cmp(b.1),
    });
    parsed.into_iter().map(|(_, k)| k.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_not_zero_padded() {
        assert_eq!(DayKey::new(2026, 3, 7).key(), "2026-3-7");
        assert_eq!(DayKey::new(2026, 3, 7).padded_key(), "2026-03-07");
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(DayKey::parse("2026-3-7"), Some(DayKey::new(2026, 3, 7)));
        assert_eq!(DayKey::parse("2026-03-07"), Some(DayKey::new(2026, 3, 7)));
        assert_eq!(DayKey::parse("2026-2-30"), None);
        assert_eq!(DayKey::parse("garbage"), None);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 13), 0);
    }

    #[test]
    fn test_chronological_sort_differs_from_lexical() {
        let keys = vec![
            "2026-10-1".to_string(),
            "2026-9-30".to_string(),
            "bad".to_string(),
            "2026-10-12".to_string(),
            "2026-10-2".to_string(),
        ];
        let sorted = sort_keys_chronologically(&keys);
        assert_eq!(
            sorted,
            vec!["2026-9-30", "2026-10-1", "2026-10-2", "2026-10-12", "bad"]
        );
    }

    #[test]
    fn test_month_title() {
        assert_eq!(month_title(2026, 10), "October 2026");
    }
}
