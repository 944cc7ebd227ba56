// ==========================================
// 考勤表客户端 - 用户设置管理器
// ==========================================
// 职责: 按用户读写设置（默认出勤阈值）
// 存储: local_storage 表，键 default_thresholds_<userId>
// ==========================================

use crate::domain::AttendanceThresholds;
use crate::repository::local_storage::{default_thresholds_key, LocalStorage};
use crate::repository::RepositoryResult;

#[derive(Clone)]
pub struct ConfigManager {
    storage: LocalStorage,
}

impl ConfigManager {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// 读取用户默认阈值
    ///
    /// # 返回
    /// - 未设置或格式错误时返回内置默认值（格式错误记录告警）
    pub fn default_thresholds(&self, user_id: &str) -> RepositoryResult<AttendanceThresholds> {
        let key = default_thresholds_key(user_id);
        let Some(raw) = self.storage.get_item(&key)? else {
            return Ok(AttendanceThresholds::default());
        };

        let thresholds = serde_json::from_str::<AttendanceThresholds>(&raw)
            .ok()
            .filter(|t| t.validate().is_ok())
            .unwrap_or_else(|| {
                tracing::warn!(
                    config_key = %key,
                    raw_value = %raw,
                    "默认阈值配置格式错误，使用内置默认值"
                );
                AttendanceThresholds::default()
            });
        Ok(thresholds)
    }

    /// 保存用户默认阈值（调用方负责校验）
    pub fn set_default_thresholds(
        &self,
        user_id: &str,
        thresholds: &AttendanceThresholds,
    ) -> RepositoryResult<()> {
        self.storage
            .set_json(&default_thresholds_key(user_id), &thresholds.normalized())
    }
}
