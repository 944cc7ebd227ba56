// ==========================================
// 考勤表客户端 - 远程接口层
// ==========================================
// 职责: 后端 REST 调用（认证、班级、学生、二维码、联系）
// 红线: 不做本地持久化，不含业务规则
// ==========================================

pub mod auth;
pub mod client;
pub mod contact;
pub mod error;
pub mod http;
pub mod qr;
pub mod student;

pub use auth::{AuthBackend, SignupRequest};
pub use client::{ApiClient, MessageResponse};
pub use contact::{ContactBackend, ContactMessage};
pub use error::{RemoteError, RemoteResult};
pub use qr::QrBackend;
pub use student::StudentBackend;
