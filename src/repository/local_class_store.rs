// ==========================================
// 考勤表客户端 - 班级本地缓存
// ==========================================
// 键: classes_<userId>，值: 班级数组 JSON
// 本地缓存是离线时的持久记录
// ==========================================

use crate::domain::Class;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::local_storage::{classes_key, LocalStorage};
use tracing::warn;

#[derive(Clone)]
pub struct LocalClassStore {
    storage: LocalStorage,
    key: String,
}

impl LocalClassStore {
    pub fn new(storage: LocalStorage, user_id: &str) -> Self {
        Self {
            storage,
            key: classes_key(user_id),
        }
    }

    /// 读取全部班级；无缓存或缓存损坏时返回空列表
    ///
    /// 损坏的缓存在下一次 store 时被整体覆盖
    pub fn load(&self) -> RepositoryResult<Vec<Class>> {
        match self.storage.get_json(&self.key) {
            Ok(classes) => Ok(classes.unwrap_or_default()),
            Err(RepositoryError::CorruptValue { key, message }) => {
                warn!(key = %key, error = %message, "班级缓存损坏，按空列表处理");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// 以完整列表覆盖缓存
    pub fn store(&self, classes: &[Class]) -> RepositoryResult<()> {
        self.storage.set_json(&self.key, classes)
    }
}
