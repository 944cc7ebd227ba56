// ==========================================
// 考勤表客户端 - 领域模型层
// ==========================================
// 职责: 定义实体、值类型与班级内的编辑规则
// 红线: 不含网络/存储逻辑
// ==========================================

pub mod class;
pub mod day_key;
pub mod enrollment;
pub mod qr;
pub mod thresholds;
pub mod types;
pub mod user;

// 重导出核心类型
pub use class::{
    new_class_id, new_column_id, new_student_id, Class, ClassEditError, CustomColumn, Student,
    StudentField,
};
pub use day_key::{days_in_month, month_day_keys, month_title, DayKey};
pub use enrollment::{ClassVerification, EnrolledClass, EnrollmentRequest, StudentStatistics};
pub use qr::{QrPayload, QrScanResult, QrSessionInfo, QrStopSummary};
pub use thresholds::{AttendanceThresholds, ThresholdError};
pub use types::{AttendanceMark, ColumnType, StatusTier, UserRole};
pub use user::{AuthSession, TokenResponse, User};
