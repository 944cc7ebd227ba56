// ==========================================
// 考勤表客户端 - 配置层
// ==========================================
// 职责: 运行配置（环境变量）与按用户的设置
// ==========================================

pub mod client_config;
pub mod config_manager;

pub use client_config::{default_db_path, env_keys, ClientConfig};
pub use config_manager::ConfigManager;
