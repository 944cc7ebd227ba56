// ==========================================
// 考勤表客户端 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源和 API 实例
// ==========================================

use crate::api::{
    ApiResult, AuthApi, ContactApi, DashboardApi, ExportApi, ImportApi, QrAttendanceSession,
    StudentApi,
};
use crate::config::{ClientConfig, ConfigManager};
use crate::domain::AuthSession;
use crate::remote::ApiClient;
use crate::repository::{ClassRepository, LocalClassStore, LocalStorage, RemoteClassStore};
use std::sync::Arc;

/// 应用状态
///
/// 包含所有 API 实例和共享资源
pub struct AppState {
    pub config: ClientConfig,

    /// 本地键值存储（共享连接）
    pub storage: LocalStorage,

    /// REST 客户端（令牌在各克隆间共享）
    pub client: ApiClient,

    pub config_manager: ConfigManager,

    pub auth_api: Arc<AuthApi>,
    pub student_api: Arc<StudentApi>,
    pub contact_api: Arc<ContactApi>,
    pub import_api: Arc<ImportApi>,
    pub export_api: Arc<ExportApi>,
}

impl AppState {
    /// 创建应用状态
    ///
    /// # 说明
    /// 1. 打开本地数据库（不存在时创建）
    /// 2. 创建 REST 客户端
    /// 3. 创建各 API 实例并恢复本地会话
    pub fn new(config: ClientConfig) -> Result<Self, String> {
        tracing::info!(db_path = %config.db_path.display(), api_url = %config.api_url, "初始化AppState");

        config
            .prepare_db_dir()
            .map_err(|e| format!("无法创建数据目录: {}", e))?;
        let db_path = config.db_path.to_string_lossy().to_string();
        let storage = LocalStorage::open(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;

        Self::with_storage(config, storage)
    }

    /// 使用给定存储创建（测试可传入内存库）
    pub fn with_storage(config: ClientConfig, storage: LocalStorage) -> Result<Self, String> {
        let client = ApiClient::new(config.api_url.clone(), config.http_timeout)
            .map_err(|e| format!("无法创建HTTP客户端: {}", e))?;
        let shared = Arc::new(client.clone());

        let auth_api = Arc::new(AuthApi::new(shared.clone(), storage.clone()));
        if let Err(e) = auth_api.restore_session() {
            tracing::warn!("会话恢复失败(将继续启动): {}", e);
        }

        tracing::info!("AppState初始化完成");

        Ok(Self {
            config_manager: ConfigManager::new(storage.clone()),
            student_api: Arc::new(StudentApi::new(shared.clone())),
            contact_api: Arc::new(ContactApi::new(shared)),
            import_api: Arc::new(ImportApi::new()),
            export_api: Arc::new(ExportApi::new()),
            auth_api,
            config,
            storage,
            client,
        })
    }

    /// 为当前教师创建班级 API（未加载）
    pub fn dashboard(&self, session: &AuthSession) -> DashboardApi {
        let repository = ClassRepository::new(
            Arc::new(RemoteClassStore::new(self.client.clone())),
            LocalClassStore::new(self.storage.clone(), &session.user.id),
        );
        DashboardApi::new(session.user.id.clone(), repository, self.config_manager.clone())
    }

    /// 创建并加载班级 API
    pub async fn load_dashboard(&self, session: &AuthSession) -> ApiResult<DashboardApi> {
        let dashboard = self.dashboard(session);
        dashboard.load().await?;
        Ok(dashboard)
    }

    /// 开启二维码考勤会话
    pub async fn start_qr_session(
        &self,
        class_id: &str,
        rotation_interval: Option<u64>,
    ) -> ApiResult<QrAttendanceSession> {
        QrAttendanceSession::start(
            Arc::new(self.client.clone()),
            class_id,
            rotation_interval.unwrap_or(self.config.qr_rotation_secs),
            self.config.qr_poll_interval,
        )
        .await
    }
}
