// ==========================================
// 考勤表客户端 - 班级仓储（远程 + 本地）
// ==========================================
// 读取顺序: 远程 → 本地缓存
// 写入: 以内存中的完整列表同步覆盖本地缓存，远程调用后台执行不阻塞
// 冲突策略: 最后写入为准，不做合并，不重试
// ==========================================

use crate::domain::{AttendanceThresholds, Class};
use crate::i18n::t;
use crate::repository::class_store::{push_all, upsert_class, ClassStore};
use crate::repository::error::RepositoryResult;
use crate::repository::local_class_store::LocalClassStore;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

// ==========================================
// SyncStatus - 同步提示横幅
// ==========================================
// 非致命: 只提示，不阻断编辑
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    banner: Arc<Mutex<Option<String>>>,
}

impl SyncStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn banner(&self) -> Option<String> {
        self.banner.lock().ok().and_then(|guard| guard.clone())
    }

    pub fn set_error(&self, message: impl Into<String>) {
        if let Ok(mut guard) = self.banner.lock() {
            *guard = Some(message.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.banner.lock() {
            *guard = None;
        }
    }
}

/// 班级列表来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// 后端有数据
    Remote,
    /// 后端为空，使用本地缓存并回推后端
    LocalRecovered,
    /// 后端不可用，离线使用本地缓存
    LocalOffline,
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub classes: Vec<Class>,
    pub source: LoadSource,
    /// 恢复路径中回推后端的任务
    pub push_task: Option<JoinHandle<()>>,
}

pub struct ClassRepository {
    remote: Arc<dyn ClassStore>,
    local: LocalClassStore,
    status: SyncStatus,
}

impl ClassRepository {
    pub fn new(remote: Arc<dyn ClassStore>, local: LocalClassStore) -> Self {
        Self {
            remote,
            local,
            status: SyncStatus::new(),
        }
    }

    pub fn sync_status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn local(&self) -> &LocalClassStore {
        &self.local
    }

    /// 加载班级列表
    ///
    /// # 规则
    /// 1. 后端非空: 以后端为准并刷新本地缓存
    /// 2. 后端为空: 读本地缓存，非空则后台回推后端
    /// 3. 后端失败: 设置离线横幅，读本地缓存
    #[instrument(skip(self, default_thresholds))]
    pub async fn load(&self, default_thresholds: &AttendanceThresholds) -> RepositoryResult<LoadOutcome> {
        let sanitize = |mut classes: Vec<Class>| {
            for class in &mut classes {
                class.sanitize(default_thresholds);
            }
            classes
        };

        match self.remote.fetch_classes().await {
            Ok(classes) if !classes.is_empty() => {
                let classes = sanitize(classes);
                self.local.store(&classes)?;
                self.status.clear();
                info!(count = classes.len(), "从后端加载班级");
                Ok(LoadOutcome {
                    classes,
                    source: LoadSource::Remote,
                    push_task: None,
                })
            }
            Ok(_) => {
                self.status.clear();
                let classes = sanitize(self.local.load()?);
                let push_task = if classes.is_empty() {
                    None
                } else {
                    info!(count = classes.len(), "后端无数据，回推本地班级");
                    Some(self.spawn_push_all(classes.clone()))
                };
                Ok(LoadOutcome {
                    classes,
                    source: LoadSource::LocalRecovered,
                    push_task,
                })
            }
            Err(e) => {
                warn!(error = %e, "后端不可用，使用本地缓存");
                self.status.set_error(t("sync.offline"));
                let classes = sanitize(self.local.load()?);
                Ok(LoadOutcome {
                    classes,
                    source: LoadSource::LocalOffline,
                    push_task: None,
                })
            }
        }
    }

    /// 保存班级: 以编辑后的完整列表覆盖本地缓存，后台 PUT（404 时 POST）
    ///
    /// # 参数
    /// - classes: 编辑后的全部班级（本地缓存的新内容）
    /// - class: 需要同步到后端的班级
    #[instrument(skip(self, classes, class), fields(class_id = %class.id))]
    pub fn save(&self, classes: &[Class], class: &Class) -> RepositoryResult<JoinHandle<()>> {
        self.local.store(classes)?;
        let remote = Arc::clone(&self.remote);
        let class = class.clone();
        Ok(self.spawn_sync("sync.save_failed", async move {
            upsert_class(remote.as_ref(), &class).await
        }))
    }

    /// 新建班级
    #[instrument(skip(self, classes, class), fields(class_id = %class.id))]
    pub fn create(&self, classes: &[Class], class: &Class) -> RepositoryResult<JoinHandle<()>> {
        self.local.store(classes)?;
        let remote = Arc::clone(&self.remote);
        let class = class.clone();
        Ok(self.spawn_sync("sync.create_failed", async move {
            remote.create_class(&class).await
        }))
    }

    /// 删除班级
    ///
    /// # 参数
    /// - classes: 删除后剩余的全部班级
    #[instrument(skip(self, classes))]
    pub fn delete(&self, classes: &[Class], class_id: &str) -> RepositoryResult<JoinHandle<()>> {
        self.local.store(classes)?;
        let remote = Arc::clone(&self.remote);
        let class_id = class_id.to_string();
        Ok(self.spawn_sync("sync.delete_failed", async move {
            remote.delete_class(&class_id).await
        }))
    }

    fn spawn_push_all(&self, classes: Vec<Class>) -> JoinHandle<()> {
        let remote = Arc::clone(&self.remote);
        let status = self.status.clone();
        tokio::spawn(async move {
            let failed = push_all(remote.as_ref(), &classes).await;
            if failed > 0 {
                status.set_error(t("sync.save_failed"));
            }
        })
    }

    /// 后台执行远程调用；成功清除横幅，失败设置横幅
    fn spawn_sync<F>(&self, failure_key: &'static str, call: F) -> JoinHandle<()>
    where
        F: std::future::Future<Output = crate::remote::RemoteResult<()>> + Send + 'static,
    {
        let status = self.status.clone();
        tokio::spawn(async move {
            match call.await {
                Ok(()) => status.clear(),
                Err(e) => {
                    warn!(error = %e, "后台同步失败，数据已保存在本地");
                    status.set_error(t(failure_key));
                }
            }
        })
    }
}
