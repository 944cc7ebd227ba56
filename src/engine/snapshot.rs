// ==========================================
// 考勤表客户端 - 月度概览统计
// ==========================================
// 输入: 全部班级 + (年, 月) + 用户默认阈值
// 输出: 总体统计 + 各班统计（学生按出勤率降序）
// 注意: 总体风险人数按 pct < atRisk 计算；班级风险人数按分级 At Risk 计算
// ==========================================

use crate::domain::class::Class;
use crate::domain::thresholds::AttendanceThresholds;
use crate::domain::types::StatusTier;
use crate::engine::aggregator::AttendanceAggregator;
use crate::engine::classifier::classify;
use serde::Serialize;
use tracing::instrument;

/// 总体统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_classes: usize,
    pub total_students: usize,
    pub overall_attendance: f64,
    pub at_risk_count: usize,
    pub excellent_count: usize,
}

impl OverallStats {
    /// 1 位小数显示
    pub fn overall_attendance_text(&self) -> String {
        format!("{:.1}", self.overall_attendance)
    }
}

/// 单个学生的月度出勤
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStat {
    pub student_id: i64,
    pub name: String,
    pub roll_no: String,
    pub percentage: f64,
    pub tier: StatusTier,
}

/// 单个班级统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStats {
    pub class_id: String,
    pub class_name: String,
    pub avg_attendance: f64,
    pub student_count: usize,
    pub excellent_count: usize,
    pub good_count: usize,
    pub moderate_count: usize,
    pub at_risk_count: usize,
    pub students: Vec<StudentStat>,
}

impl ClassStats {
    pub fn avg_attendance_text(&self) -> String {
        format!("{:.1}", self.avg_attendance)
    }
}

/// 月度概览
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub year: i32,
    pub month: u32,
    pub overall: OverallStats,
    pub classes: Vec<ClassStats>,
}

// ==========================================
// SnapshotEngine
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotEngine {
    aggregator: AttendanceAggregator,
}

impl SnapshotEngine {
    pub fn new() -> Self {
        Self {
            aggregator: AttendanceAggregator::new(),
        }
    }

    #[instrument(skip(self, classes, default_thresholds), fields(classes = classes.len()))]
    pub fn build(
        &self,
        classes: &[Class],
        year: i32,
        month: u32,
        default_thresholds: &AttendanceThresholds,
    ) -> Snapshot {
        Snapshot {
            year,
            month,
            overall: self.overall_stats(classes, year, month, default_thresholds),
            classes: classes
                .iter()
                .map(|c| self.class_stats(c, year, month, default_thresholds))
                .collect(),
        }
    }

    pub fn overall_stats(
        &self,
        classes: &[Class],
        year: i32,
        month: u32,
        default_thresholds: &AttendanceThresholds,
    ) -> OverallStats {
        let mut total_students = 0;
        let mut total_attended = 0u64;
        let mut total_marked = 0u64;
        let mut at_risk_count = 0;
        let mut excellent_count = 0;

        for class in classes {
            let thresholds = class.effective_thresholds(default_thresholds);
            total_students += class.students.len();

            for student in &class.students {
                let summary = self.aggregator.summarize(student, year, month);
                total_attended += summary.attended() as u64;
                total_marked += summary.marked() as u64;

                let pct = summary.percentage();
                if pct < thresholds.at_risk {
                    at_risk_count += 1;
                }
                if pct >= thresholds.excellent {
                    excellent_count += 1;
                }
            }
        }

        OverallStats {
            total_classes: classes.len(),
            total_students,
            overall_attendance: ratio_percent(total_attended, total_marked),
            at_risk_count,
            excellent_count,
        }
    }

    pub fn class_stats(
        &self,
        class: &Class,
        year: i32,
        month: u32,
        default_thresholds: &AttendanceThresholds,
    ) -> ClassStats {
        let thresholds = class.effective_thresholds(default_thresholds);
        let mut stats = ClassStats {
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            avg_attendance: 0.0,
            student_count: class.students.len(),
            excellent_count: 0,
            good_count: 0,
            moderate_count: 0,
            at_risk_count: 0,
            students: Vec::with_capacity(class.students.len()),
        };

        let mut total_attended = 0u64;
        let mut total_marked = 0u64;
        for student in &class.students {
            let summary = self.aggregator.summarize(student, year, month);
            total_attended += summary.attended() as u64;
            total_marked += summary.marked() as u64;

            let percentage = summary.percentage();
            let tier = classify(percentage, &thresholds);
            match tier {
                StatusTier::Excellent => stats.excellent_count += 1,
                StatusTier::Good => stats.good_count += 1,
                StatusTier::Moderate => stats.moderate_count += 1,
                StatusTier::AtRisk => stats.at_risk_count += 1,
            }
            stats.students.push(StudentStat {
                student_id: student.id,
                name: student.name.clone(),
                roll_no: student.roll_no.clone(),
                percentage,
                tier,
            });
        }

        stats.avg_attendance = ratio_percent(total_attended, total_marked);
        stats
            .students
            .sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        stats
    }
}

fn ratio_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}
