// ==========================================
// 考勤表客户端 - 本地键值存储
// ==========================================
// 表: local_storage(key, value, updated_at)
// 值一律为字符串（JSON 由调用方编解码）
// 红线: 不含业务逻辑，只负责数据访问
// ==========================================

use crate::db;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};

// 固定键
pub const KEY_ACCESS_TOKEN: &str = "accesstoken";
pub const KEY_USER: &str = "user";
pub const KEY_USER_ROLE: &str = "userrole";
pub const KEY_PENDING_SIGNUP_ROLE: &str = "pendingsignuprole";

/// 班级缓存键
pub fn classes_key(user_id: &str) -> String {
    format!("classes_{}", user_id)
}

/// 默认阈值键
pub fn default_thresholds_key(user_id: &str) -> String {
    format!("default_thresholds_{}", user_id)
}

#[derive(Clone)]
pub struct LocalStorage {
    conn: Arc<Mutex<Connection>>,
}

impl LocalStorage {
    /// 打开数据库文件
    pub fn open(db_path: &str) -> RepositoryResult<Self> {
        let conn = db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = db::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 从已有连接创建实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn get_item(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// 读取 JSON 值；无法解析时返回 CorruptValue
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> RepositoryResult<Option<T>> {
        match self.get_item(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| RepositoryError::CorruptValue {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> RepositoryResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw)
    }
}
