// ==========================================
// 考勤表客户端 - 核心库
// ==========================================
// 功能: 班级考勤记录、出勤统计与分级、名单导入、报表导出、
//       后端同步（离线优先）、二维码考勤
// 技术栈: Rust + SQLite + REST
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 统计与分级
pub mod engine;

// 导入层 - 名单文件
pub mod importer;

// 导出层 - CSV / Excel / PDF / 二维码图片
pub mod exporter;

// 远程接口层 - 后端 REST
pub mod remote;

// 数据仓储层 - 本地存储与同步
pub mod repository;

// 配置层 - 运行配置与用户设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装与命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AttendanceMark, ColumnType, StatusTier, UserRole};

// 领域实体
pub use domain::{AttendanceThresholds, Class, CustomColumn, DayKey, Student, User};

// 引擎
pub use engine::{AttendanceAggregator, SnapshotEngine, ThresholdClassifier};

// API
pub use api::{AuthApi, DashboardApi, ExportApi, ImportApi, QrAttendanceSession, StudentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Attendance Sheets";
