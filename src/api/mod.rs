// ==========================================
// 考勤表客户端 - API 层
// ==========================================
// 职责: 面向界面/命令行的用例入口
// 架构: API 层 → 领域 / 引擎 / 导入导出 / 仓储 / 远程接口
// 红线: 所有输入校验在网络调用之前完成
// ==========================================

pub mod auth_api;
pub mod contact_api;
pub mod dashboard_api;
pub mod error;
pub mod export_api;
pub mod import_api;
pub mod qr_api;
pub mod student_api;
pub mod validator;

pub use auth_api::AuthApi;
pub use contact_api::ContactApi;
pub use dashboard_api::DashboardApi;
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportRequest, ExportedReport};
pub use import_api::ImportApi;
pub use qr_api::{QrAttendanceSession, QrView, DEFAULT_POLL_INTERVAL};
pub use student_api::StudentApi;
