// ==========================================
// 考勤表客户端 - 班级远程存储 Trait
// ==========================================
// 职责: 定义班级在后端的 CRUD 接口（不包含业务逻辑）
// 实现者: RemoteClassStore（使用 reqwest）
// ==========================================

use crate::domain::Class;
use crate::remote::RemoteResult;
use async_trait::async_trait;

#[async_trait]
pub trait ClassStore: Send + Sync {
    /// 拉取当前用户的全部班级
    async fn fetch_classes(&self) -> RemoteResult<Vec<Class>>;

    /// 新建班级
    async fn create_class(&self, class: &Class) -> RemoteResult<()>;

    /// 整体覆盖班级
    ///
    /// # 返回
    /// - Err(Api{status: 404}): 后端尚无此班级
    async fn update_class(&self, class: &Class) -> RemoteResult<()>;

    async fn delete_class(&self, class_id: &str) -> RemoteResult<()>;
}

/// 保存: PUT，后端返回 404 时改用 POST 新建
pub async fn upsert_class(store: &dyn ClassStore, class: &Class) -> RemoteResult<()> {
    match store.update_class(class).await {
        Err(e) if e.is_not_found() => store.create_class(class).await,
        other => other,
    }
}

/// 批量推送（本地恢复路径）
///
/// # 返回
/// 推送失败的班级数
pub async fn push_all(store: &dyn ClassStore, classes: &[Class]) -> usize {
    let mut failed = 0;
    for class in classes {
        if let Err(e) = upsert_class(store, class).await {
            tracing::warn!(class_id = %class.id, error = %e, "班级推送失败");
            failed += 1;
        }
    }
    failed
}
