// ==========================================
// 考勤表客户端 - 运行配置
// ==========================================
// 来源: 环境变量（SHEETS_*），缺省或格式错误时使用默认值
// ==========================================

use crate::domain::qr::DEFAULT_ROTATION_INTERVAL_SECS;
use crate::i18n::DEFAULT_LOCALE;
use std::path::PathBuf;
use std::time::Duration;

/// 配置环境变量名
pub mod env_keys {
    pub const API_URL: &str = "SHEETS_API_URL";
    pub const DB_PATH: &str = "SHEETS_DB_PATH";
    pub const HTTP_TIMEOUT_SECS: &str = "SHEETS_HTTP_TIMEOUT_SECS";
    pub const QR_POLL_MS: &str = "SHEETS_QR_POLL_MS";
    pub const QR_ROTATION_SECS: &str = "SHEETS_QR_ROTATION_SECS";
    pub const LOCALE: &str = "SHEETS_LOCALE";
}

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_QR_POLL_MS: u64 = 1_000;
const APP_DIR_NAME: &str = "attendance-sheets";
const DB_FILE_NAME: &str = "sheets.db";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub db_path: PathBuf,
    pub http_timeout: Duration,
    pub qr_poll_interval: Duration,
    pub qr_rotation_secs: u64,
    pub locale: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            db_path: default_db_path(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            qr_poll_interval: Duration::from_millis(DEFAULT_QR_POLL_MS),
            qr_rotation_secs: DEFAULT_ROTATION_INTERVAL_SECS,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ClientConfig {
    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取（测试可注入）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_url: read(env_keys::API_URL)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            db_path: read(env_keys::DB_PATH).map(PathBuf::from).unwrap_or(defaults.db_path),
            http_timeout: parse_positive(env_keys::HTTP_TIMEOUT_SECS, read(env_keys::HTTP_TIMEOUT_SECS))
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            qr_poll_interval: parse_positive(env_keys::QR_POLL_MS, read(env_keys::QR_POLL_MS))
                .map(Duration::from_millis)
                .unwrap_or(defaults.qr_poll_interval),
            qr_rotation_secs: parse_positive(env_keys::QR_ROTATION_SECS, read(env_keys::QR_ROTATION_SECS))
                .unwrap_or(defaults.qr_rotation_secs),
            locale: read(env_keys::LOCALE).unwrap_or(defaults.locale),
        }
    }

    /// 确保数据库所在目录存在
    pub fn prepare_db_dir(&self) -> std::io::Result<()> {
        match self.db_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }
}

fn parse_positive(key: &str, raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.parse::<u64>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            tracing::warn!(config_key = key, raw_value = %raw, "配置值无效，使用默认值");
            None
        }
    }
}

/// 平台数据目录下的默认数据库路径
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(DB_FILE_NAME)
}
