// ==========================================
// 考勤表客户端 - 引擎层
// ==========================================
// 职责: 出勤统计、阈值分级、月度概览
// 红线: 纯计算，不做 IO
// ==========================================

pub mod aggregator;
pub mod classifier;
pub mod snapshot;

// 重导出核心引擎
pub use aggregator::{AttendanceAggregator, AttendanceSummary};
pub use classifier::{classify, ThresholdClassifier};
pub use snapshot::{ClassStats, OverallStats, Snapshot, SnapshotEngine, StudentStat};
