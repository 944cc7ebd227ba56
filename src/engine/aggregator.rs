// ==========================================
// 考勤表客户端 - 出勤统计引擎
// ==========================================
// 输入: 学生稀疏考勤表 + (年, 月)
// 输出: P/A/L 计数与出勤率
// 规则: 只统计已标记的日期（未标记 ≠ 缺勤）；P 与 L 计为出勤
// ==========================================

use crate::domain::class::Student;
use crate::domain::day_key::{month_day_keys, DayKey};
use crate::domain::thresholds::round3;
use crate::domain::types::AttendanceMark;
use serde::Serialize;

// ==========================================
// AttendanceSummary - 统计结果
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    pub present: u32,
    pub absent: u32,
    pub late: u32,
}

impl AttendanceSummary {
    pub fn record(&mut self, mark: AttendanceMark) {
        match mark {
            AttendanceMark::Present => self.present += 1,
            AttendanceMark::Absent => self.absent += 1,
            AttendanceMark::Late => self.late += 1,
        }
    }

    /// 已标记天数
    pub fn marked(&self) -> u32 {
        self.present + self.absent + self.late
    }

    /// 计为出勤的天数（P + L）
    pub fn attended(&self) -> u32 {
        self.present + self.late
    }

    /// 出勤率（0~100），0/0 返回 0
    pub fn percentage(&self) -> f64 {
        let total = self.marked();
        if total == 0 {
            return 0.0;
        }
        self.attended() as f64 / total as f64 * 100.0
    }

    /// 与显示一致的出勤率（3 位小数）
    pub fn rounded_percentage(&self) -> f64 {
        round3(self.percentage())
    }

    /// 显示/导出文本，例如 "66.667"
    pub fn percentage_text(&self) -> String {
        format!("{:.3}", self.percentage())
    }
}

// ==========================================
// AttendanceAggregator - 统计引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AttendanceAggregator;

impl AttendanceAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 按月统计
    ///
    /// # 参数
    /// - month: 1..=12
    pub fn summarize(&self, student: &Student, year: i32, month: u32) -> AttendanceSummary {
        self.summarize_days(student, &month_day_keys(year, month))
    }

    /// 按指定日期集合统计（导出时只统计被导出的日期列）
    pub fn summarize_days(&self, student: &Student, days: &[DayKey]) -> AttendanceSummary {
        let mut summary = AttendanceSummary::default();
        for day in days {
            if let Some(mark) = student.mark_on(day) {
                summary.record(mark);
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_with(marks: &[(&str, AttendanceMark)]) -> Student {
        let mut student = Student::with_name(1, "Asha", "R-1");
        for (key, mark) in marks {
            student.attendance.insert(key.to_string(), *mark);
        }
        student
    }

    #[test]
    fn test_no_marks_is_zero() {
        let summary = AttendanceAggregator::new().summarize(&student_with(&[]), 2026, 10);
        assert_eq!(summary.marked(), 0);
        assert_eq!(summary.percentage_text(), "0.000");
    }

    #[test]
    fn test_present_absent_late() {
        let student = student_with(&[
            ("2026-10-1", AttendanceMark::Present),
            ("2026-10-2", AttendanceMark::Absent),
            ("2026-10-3", AttendanceMark::Late),
        ]);
        let summary = AttendanceAggregator::new().summarize(&student, 2026, 10);
        assert_eq!(summary.marked(), 3);
        assert_eq!(summary.attended(), 2);
        assert_eq!(summary.percentage_text(), "66.667");
        assert_eq!(summary.rounded_percentage(), 66.667);
    }

    #[test]
    fn test_other_months_and_malformed_keys_miss() {
        let student = student_with(&[
            ("2026-9-30", AttendanceMark::Absent),
            ("2026-10-x", AttendanceMark::Absent),
            ("2026-10-32", AttendanceMark::Absent),
            ("2026-10-15", AttendanceMark::Present),
        ]);
        let summary = AttendanceAggregator::new().summarize(&student, 2026, 10);
        assert_eq!(summary, AttendanceSummary { present: 1, absent: 0, late: 0 });
        assert_eq!(summary.percentage_text(), "100.000");
    }

    #[test]
    fn test_padded_keys_from_qr_backend_count() {
        let student = student_with(&[
            ("2026-03-04", AttendanceMark::Present),
            ("2026-3-5", AttendanceMark::Absent),
        ]);
        let summary = AttendanceAggregator::new().summarize(&student, 2026, 3);
        assert_eq!(summary.marked(), 2);
        assert_eq!(summary.percentage_text(), "50.000");
    }
}
