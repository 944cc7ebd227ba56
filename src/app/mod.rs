// ==========================================
// 考勤表客户端 - 应用层
// ==========================================
// 职责: 组装各层实例，提供命令行入口
// ==========================================

pub mod cli;
pub mod state;

// 重导出
pub use cli::{run, Cli};
pub use state::AppState;
