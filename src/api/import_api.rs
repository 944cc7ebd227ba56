// ==========================================
// 考勤表客户端 - 名单导入 API
// ==========================================
// 职责: 解析名单文件并以其新建班级
// 支持格式: .csv / .xlsx / .xls / .txt
// ==========================================

use crate::api::dashboard_api::DashboardApi;
use crate::api::error::ApiResult;
use crate::api::validator;
use crate::domain::Class;
use crate::importer::{ImportedRoster, RosterImporter};
use std::path::Path;
use tracing::instrument;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportApi {
    importer: RosterImporter,
}

impl ImportApi {
    pub fn new() -> Self {
        Self {
            importer: RosterImporter::new(),
        }
    }

    /// 只解析不建班（预览）
    pub fn preview(&self, path: &Path) -> ApiResult<ImportedRoster> {
        Ok(self.importer.import_file(path)?)
    }

    /// 解析名单文件并新建班级
    #[instrument(skip(self, dashboard), fields(path = %path.display()))]
    pub fn import_class(&self, dashboard: &DashboardApi, class_name: &str, path: &Path) -> ApiResult<Class> {
        validator::validate_class_name(class_name)?;
        let roster = self.importer.import_file(path)?;
        dashboard.create_class_with_roster(class_name, roster)
    }
}
