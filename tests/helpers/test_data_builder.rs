// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use attendance_sheets::domain::CustomColumn;
use attendance_sheets::{AttendanceMark, AttendanceThresholds, Class, DayKey, Student};
use serde_json::Value;

// ==========================================
// Student 构建器
// ==========================================

pub struct StudentBuilder {
    student: Student,
}

impl StudentBuilder {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            student: Student::with_name(id, name, ""),
        }
    }

    pub fn roll_no(mut self, roll_no: &str) -> Self {
        self.student.roll_no = roll_no.to_string();
        self
    }

    /// 在 2026 年 10 月的指定日期打标记
    pub fn mark(mut self, day: u32, mark: AttendanceMark) -> Self {
        self.student.set_mark(&DayKey::new(2026, 10, day), Some(mark));
        self
    }

    pub fn custom(mut self, column_id: &str, value: &str) -> Self {
        self.student
            .custom
            .insert(column_id.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn build(self) -> Student {
        self.student
    }
}

// ==========================================
// Class 构建器
// ==========================================

pub struct ClassBuilder {
    class: Class,
}

impl ClassBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            class: Class::new(id, name),
        }
    }

    pub fn student(mut self, student: Student) -> Self {
        self.class.students.push(student);
        self
    }

    pub fn column(mut self, id: &str, label: &str) -> Self {
        self.class.custom_columns.push(CustomColumn::text(id, label));
        self
    }

    pub fn thresholds(mut self, thresholds: AttendanceThresholds) -> Self {
        self.class.thresholds = Some(thresholds);
        self
    }

    pub fn build(self) -> Class {
        self.class
    }
}

/// 三名学生的示例班级（含一个自定义列与学号）
///
/// 2026-10 标记:
/// - Asha: P P P P      → 100.000
/// - Ben:  P A L        → 66.667
/// - Chen: 无标记       → 0.000
pub fn sample_class(id: &str) -> Class {
    use AttendanceMark::*;
    ClassBuilder::new(id, "Physics 101")
        .column("col_house", "House")
        .student(
            StudentBuilder::new(1, "Asha")
                .roll_no("R-01")
                .custom("col_house", "Red")
                .mark(1, Present)
                .mark(2, Present)
                .mark(3, Present)
                .mark(6, Present)
                .build(),
        )
        .student(
            StudentBuilder::new(2, "Ben")
                .roll_no("R-02")
                .mark(1, Present)
                .mark(2, Absent)
                .mark(3, Late)
                .build(),
        )
        .student(StudentBuilder::new(3, "Chen").build())
        .build()
}
