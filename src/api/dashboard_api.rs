// ==========================================
// 考勤表客户端 - 教师端班级 API
// ==========================================
// 职责: 持有当前班级列表，执行编辑并经仓储同步
// 架构: API 层 → Class（编辑规则）→ ClassRepository（本地 + 远程）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::config::ConfigManager;
use crate::domain::{
    new_class_id, AttendanceMark, AttendanceThresholds, Class, ClassEditError, ColumnType,
    CustomColumn, DayKey, StudentField,
};
use crate::engine::{Snapshot, SnapshotEngine};
use crate::importer::ImportedRoster;
use crate::repository::{ClassRepository, LoadSource};
use futures::future::join_all;
use serde_json::Value;
use std::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

// ==========================================
// DashboardApi - 班级与考勤编辑
// ==========================================
pub struct DashboardApi {
    user_id: String,
    repository: ClassRepository,
    config: ConfigManager,
    classes: RwLock<Vec<Class>>,
    default_thresholds: RwLock<AttendanceThresholds>,
    /// 尚未完成的后台同步
    pending_sync: Mutex<Vec<JoinHandle<()>>>,
    snapshot_engine: SnapshotEngine,
}

impl DashboardApi {
    /// # 参数
    /// - user_id: 当前教师 ID（本地缓存与设置按用户隔离）
    pub fn new(user_id: impl Into<String>, repository: ClassRepository, config: ConfigManager) -> Self {
        Self {
            user_id: user_id.into(),
            repository,
            config,
            classes: RwLock::new(Vec::new()),
            default_thresholds: RwLock::new(AttendanceThresholds::default()),
            pending_sync: Mutex::new(Vec::new()),
            snapshot_engine: SnapshotEngine::new(),
        }
    }

    // ==========================================
    // 读取
    // ==========================================

    /// 加载默认阈值与班级列表
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn load(&self) -> ApiResult<LoadSource> {
        let defaults = self.config.default_thresholds(&self.user_id)?;
        self.write_defaults(defaults)?;

        let outcome = self.repository.load(&defaults).await?;
        if let Some(task) = outcome.push_task {
            self.track(task);
        }
        let count = outcome.classes.len();
        *self.write_classes()? = outcome.classes;
        info!(count, source = ?outcome.source, "班级列表已加载");
        Ok(outcome.source)
    }

    pub fn classes(&self) -> ApiResult<Vec<Class>> {
        Ok(self.read_classes()?.clone())
    }

    pub fn class(&self, class_id: &str) -> ApiResult<Class> {
        self.read_classes()?
            .iter()
            .find(|c| c.id == class_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("班级(id={})不存在", class_id)))
    }

    /// 同步提示横幅（无则 None）
    pub fn sync_banner(&self) -> Option<String> {
        self.repository.sync_status().banner()
    }

    pub fn default_thresholds(&self) -> ApiResult<AttendanceThresholds> {
        self.default_thresholds
            .read()
            .map(|guard| *guard)
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    /// 月度概览
    pub fn snapshot(&self, year: i32, month: u32) -> ApiResult<Snapshot> {
        let defaults = self.default_thresholds()?;
        let classes = self.read_classes()?;
        Ok(self.snapshot_engine.build(&classes, year, month, &defaults))
    }

    // ==========================================
    // 班级增删改
    // ==========================================

    /// 新建空班级
    pub fn create_class(&self, name: &str) -> ApiResult<Class> {
        self.create_class_with_roster(name, ImportedRoster::default())
    }

    /// 以导入的名单新建班级
    #[instrument(skip(self, roster), fields(students = roster.students.len()))]
    pub fn create_class_with_roster(&self, name: &str, roster: ImportedRoster) -> ApiResult<Class> {
        validator::validate_class_name(name)?;
        let mut class = roster.into_class(self.unique_class_id()?, name.trim());
        class.sanitize(&self.default_thresholds()?);

        {
            let mut classes = self.write_classes()?;
            let mut next = classes.clone();
            next.push(class.clone());
            let task = self.repository.create(&next, &class)?;
            *classes = next;
            self.track(task);
        }
        info!(class_id = %class.id, "班级已创建");
        Ok(class)
    }

    #[instrument(skip(self))]
    pub fn delete_class(&self, class_id: &str) -> ApiResult<()> {
        let mut classes = self.write_classes()?;
        let next: Vec<Class> = classes.iter().filter(|c| c.id != class_id).cloned().collect();
        if next.len() == classes.len() {
            return Err(ApiError::NotFound(format!("班级(id={})不存在", class_id)));
        }
        let task = self.repository.delete(&next, class_id)?;
        *classes = next;
        self.track(task);
        Ok(())
    }

    /// 重命名；空白或未变化时返回 false
    pub fn rename_class(&self, class_id: &str, new_name: &str) -> ApiResult<bool> {
        self.edit(class_id, |class| Ok(class.rename(new_name)))
    }

    // ==========================================
    // 学生与考勤
    // ==========================================

    pub fn add_student(&self, class_id: &str) -> ApiResult<i64> {
        self.edit(class_id, |class| Ok(class.add_student()))
    }

    pub fn update_student_field(
        &self,
        class_id: &str,
        student_id: i64,
        field: &StudentField,
        value: Value,
    ) -> ApiResult<()> {
        self.edit(class_id, |class| class.update_student_field(student_id, field, value))
    }

    pub fn delete_student(&self, class_id: &str, student_id: i64) -> ApiResult<()> {
        self.edit(class_id, |class| {
            if class.delete_student(student_id) {
                Ok(())
            } else {
                Err(ClassEditError::StudentNotFound(student_id))
            }
        })
    }

    /// 切换考勤: 未标记 → P → A → L → 未标记
    #[instrument(skip(self))]
    pub fn toggle_attendance(
        &self,
        class_id: &str,
        student_id: i64,
        day: DayKey,
    ) -> ApiResult<Option<AttendanceMark>> {
        self.edit(class_id, |class| class.toggle_attendance(student_id, &day))
    }

    // ==========================================
    // 自定义列
    // ==========================================

    pub fn add_column(
        &self,
        class_id: &str,
        label: &str,
        column_type: ColumnType,
        options: Option<Vec<String>>,
    ) -> ApiResult<CustomColumn> {
        self.edit(class_id, |class| {
            class.add_column(label, column_type, options).map(|c| c.clone())
        })
    }

    pub fn delete_column(&self, class_id: &str, column_id: &str) -> ApiResult<()> {
        self.edit(class_id, |class| {
            if class.delete_column(column_id) {
                Ok(())
            } else {
                Err(ClassEditError::ColumnNotFound(column_id.to_string()))
            }
        })
    }

    // ==========================================
    // 阈值设置
    // ==========================================

    /// 保存默认阈值，并应用到指定班级
    ///
    /// # 参数
    /// - apply_to: 需要写入该阈值的班级 ID；不存在的 ID 忽略
    #[instrument(skip(self, thresholds, apply_to), fields(classes = apply_to.len()))]
    pub fn save_default_thresholds(
        &self,
        thresholds: AttendanceThresholds,
        apply_to: &[String],
    ) -> ApiResult<usize> {
        validator::validate_thresholds(&thresholds)?;
        let thresholds = thresholds.normalized();
        self.config.set_default_thresholds(&self.user_id, &thresholds)?;
        self.write_defaults(thresholds)?;

        let mut applied = 0;
        for class_id in apply_to {
            match self.set_class_thresholds(class_id, Some(thresholds)) {
                Ok(()) => applied += 1,
                Err(ApiError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(applied)
    }

    /// 设置单个班级的阈值覆盖；None 表示恢复为用户默认
    pub fn set_class_thresholds(
        &self,
        class_id: &str,
        thresholds: Option<AttendanceThresholds>,
    ) -> ApiResult<()> {
        let thresholds = match thresholds {
            Some(t) => {
                validator::validate_thresholds(&t)?;
                Some(t.normalized())
            }
            None => Some(self.default_thresholds()?),
        };
        self.edit(class_id, |class| {
            class.set_thresholds(thresholds);
            Ok(())
        })
    }

    // ==========================================
    // 后台同步
    // ==========================================

    /// 等待所有后台同步结束（进程退出前调用）
    pub async fn flush_sync(&self) {
        let tasks: Vec<JoinHandle<()>> = match self.pending_sync.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(_) => return,
        };
        for result in join_all(tasks).await {
            if let Err(e) = result {
                warn!(error = %e, "后台同步任务异常结束");
            }
        }
    }

    // ==========================================
    // 内部工具
    // ==========================================

    /// 在班级副本上执行编辑；本地缓存写入成功后才替换内存中的列表
    fn edit<R, F>(&self, class_id: &str, apply: F) -> ApiResult<R>
    where
        F: FnOnce(&mut Class) -> Result<R, ClassEditError>,
    {
        let defaults = self.default_thresholds()?;
        let mut classes = self.write_classes()?;
        let index = classes
            .iter()
            .position(|c| c.id == class_id)
            .ok_or_else(|| ApiError::NotFound(format!("班级(id={})不存在", class_id)))?;

        let mut next = classes.clone();
        let class = &mut next[index];
        let result = apply(class)?;
        class.sanitize(&defaults);

        let task = self.repository.save(&next, &next[index])?;
        *classes = next;
        self.track(task);
        Ok(result)
    }

    fn unique_class_id(&self) -> ApiResult<String> {
        let classes = self.read_classes()?;
        let mut id = new_class_id();
        while classes.iter().any(|c| c.id == id) {
            id = match id.parse::<i64>() {
                Ok(n) => (n + 1).to_string(),
                Err(_) => new_class_id(),
            };
        }
        Ok(id)
    }

    fn track(&self, task: JoinHandle<()>) {
        if let Ok(mut guard) = self.pending_sync.lock() {
            guard.retain(|t| !t.is_finished());
            guard.push(task);
        }
    }

    fn read_classes(&self) -> ApiResult<std::sync::RwLockReadGuard<'_, Vec<Class>>> {
        self.classes
            .read()
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    fn write_classes(&self) -> ApiResult<std::sync::RwLockWriteGuard<'_, Vec<Class>>> {
        self.classes
            .write()
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    fn write_defaults(&self, thresholds: AttendanceThresholds) -> ApiResult<()> {
        let mut guard = self
            .default_thresholds
            .write()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        *guard = thresholds;
        Ok(())
    }
}
