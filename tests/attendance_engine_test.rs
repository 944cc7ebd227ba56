// ==========================================
// 出勤统计与分级集成测试
// ==========================================
// 测试目标: 统计引擎、分级、月度概览、考勤切换
// ==========================================

mod helpers;

use attendance_sheets::domain::{month_day_keys, AttendanceMark, DayKey, StatusTier};
use attendance_sheets::engine::classify;
use attendance_sheets::logging;
use attendance_sheets::{AttendanceAggregator, AttendanceThresholds, SnapshotEngine, Student};
use helpers::test_data_builder::{sample_class, ClassBuilder, StudentBuilder};

// ==========================================
// 出勤率
// ==========================================

#[test]
fn test_no_marks_in_month_is_zero() {
    logging::init_test();
    let class = sample_class("1");
    let chen = &class.students[2];

    let summary = AttendanceAggregator::new().summarize(chen, 2026, 10);
    assert_eq!(summary.marked(), 0);
    assert_eq!(summary.percentage_text(), "0.000");

    // 有标记但不在所查月份
    let asha = &class.students[0];
    let summary = AttendanceAggregator::new().summarize(asha, 2026, 11);
    assert_eq!(summary.percentage_text(), "0.000");
}

#[test]
fn test_present_absent_late_is_two_thirds() {
    let class = sample_class("1");
    let ben = &class.students[1];

    let summary = AttendanceAggregator::new().summarize(ben, 2026, 10);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.absent, 1);
    assert_eq!(summary.late, 1);
    assert_eq!(summary.percentage_text(), "66.667");
    assert_eq!(summary.rounded_percentage(), 66.667);
}

#[test]
fn test_padded_and_malformed_keys() {
    let mut student = Student::new(9);
    // 二维码会话写入的补零键
    student
        .attendance
        .insert("2026-10-05".to_string(), AttendanceMark::Present);
    student
        .attendance
        .insert("not-a-date".to_string(), AttendanceMark::Absent);
    student
        .attendance
        .insert("2026-13-40".to_string(), AttendanceMark::Absent);

    let summary = AttendanceAggregator::new().summarize(&student, 2026, 10);
    assert_eq!(summary.marked(), 1);
    assert_eq!(summary.percentage_text(), "100.000");
}

#[test]
fn test_month_length_includes_leap_day() {
    assert_eq!(month_day_keys(2024, 2).len(), 29);
    assert_eq!(month_day_keys(2026, 2).len(), 28);

    let mut student = Student::new(1);
    student.set_mark(&DayKey::new(2024, 2, 29), Some(AttendanceMark::Late));
    let summary = AttendanceAggregator::new().summarize(&student, 2024, 2);
    assert_eq!(summary.attended(), 1);
}

// ==========================================
// 分级
// ==========================================

#[test]
fn test_classification_monotonic() {
    let threshold_sets = [
        AttendanceThresholds::default(),
        AttendanceThresholds::new(90.0, 75.0, 60.0, 50.0),
        AttendanceThresholds::new(80.5, 70.25, 60.125, 60.125),
    ];

    for thresholds in threshold_sets {
        let mut previous = StatusTier::AtRisk;
        // 0.000 ~ 100.000，步长 0.125
        for step in 0..=800 {
            let pct = step as f64 * 0.125;
            let tier = classify(pct, &thresholds);
            assert!(
                tier >= previous,
                "分级在 {} 处下降: {:?} -> {:?}",
                pct,
                previous,
                tier
            );
            previous = tier;
        }
        assert_eq!(classify(100.0, &thresholds), StatusTier::Excellent);
        assert_eq!(classify(0.0, &thresholds), StatusTier::AtRisk);
    }
}

#[test]
fn test_class_override_replaces_defaults() {
    let strict = AttendanceThresholds::new(99.0, 98.0, 97.0, 96.0);
    let class = ClassBuilder::new("7", "Strict").thresholds(strict).build();
    let defaults = AttendanceThresholds::default();

    let effective = class.effective_thresholds(&defaults);
    assert_eq!(effective, strict);
    assert_eq!(classify(66.667, &effective), StatusTier::AtRisk);
}

// ==========================================
// 月度概览
// ==========================================

#[test]
fn test_snapshot_over_sample_class() {
    let classes = vec![sample_class("1")];
    let snapshot = SnapshotEngine::new().build(&classes, 2026, 10, &AttendanceThresholds::default());

    assert_eq!(snapshot.overall.total_classes, 1);
    assert_eq!(snapshot.overall.total_students, 3);
    // 6 attended of 7 marked
    assert_eq!(snapshot.overall.overall_attendance_text(), "85.7");

    let stats = &snapshot.classes[0];
    assert_eq!(stats.student_count, 3);
    assert_eq!(stats.students[0].name, "Asha");
    assert_eq!(stats.students[0].tier, StatusTier::Excellent);
    assert_eq!(stats.students[2].percentage, 0.0);
    assert_eq!(stats.excellent_count + stats.good_count + stats.moderate_count + stats.at_risk_count, 3);
}

// ==========================================
// 考勤切换
// ==========================================

#[test]
fn test_toggle_cycle_through_class() {
    let mut class = ClassBuilder::new("1", "Cycle")
        .student(StudentBuilder::new(42, "Dev").build())
        .build();
    let day = DayKey::new(2026, 10, 19);

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(class.toggle_attendance(42, &day).unwrap());
    }
    assert_eq!(
        seen,
        vec![
            Some(AttendanceMark::Present),
            Some(AttendanceMark::Absent),
            Some(AttendanceMark::Late),
            None,
        ]
    );
    // 回到未标记后日期键被移除
    assert!(class.students[0].attendance.is_empty());
}

#[test]
fn test_toggle_updates_padded_entry_in_place() {
    let mut class = ClassBuilder::new("1", "Cycle")
        .student(StudentBuilder::new(42, "Dev").build())
        .build();
    class.students[0]
        .attendance
        .insert("2026-10-05".to_string(), AttendanceMark::Present);

    let day = DayKey::new(2026, 10, 5);
    assert_eq!(
        class.toggle_attendance(42, &day).unwrap(),
        Some(AttendanceMark::Absent)
    );
    assert_eq!(
        class.students[0].mark_on(&day),
        Some(AttendanceMark::Absent)
    );
    assert_eq!(class.students[0].attendance.len(), 1);
}

#[test]
fn test_toggle_unknown_student_fails() {
    let mut class = sample_class("1");
    assert!(class.toggle_attendance(999, &DayKey::new(2026, 10, 1)).is_err());
}
