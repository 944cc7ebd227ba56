// ==========================================
// 考勤表客户端 - API 层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向用户的消息
// 校验错误在任何网络调用之前返回
// ==========================================

use crate::domain::ClassEditError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use crate::remote::RemoteError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 输入校验失败（消息已本地化）
    #[error("{0}")]
    Validation(String),

    #[error("未登录")]
    NotAuthenticated,

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 后端或网络错误
    #[error("远程调用失败: {message}")]
    Remote { status: Option<u16>, message: String },

    #[error("文件导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("报表导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("本地存储错误: {0}")]
    Storage(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 面向用户的消息
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Remote { message, .. } => message.clone(),
            ApiError::Import(e) => e.user_message(),
            ApiError::NotAuthenticated => crate::i18n::t("auth.not_authenticated"),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

impl From<RemoteError> for ApiError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotAuthenticated => ApiError::NotAuthenticated,
            other => ApiError::Remote {
                status: other.status(),
                message: other.user_message(),
            },
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::Remote(e) => e.into(),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<ClassEditError> for ApiError {
    fn from(err: ClassEditError) -> Self {
        match err {
            ClassEditError::EmptyColumnLabel => {
                ApiError::Validation(crate::i18n::t("validation.column_label_required"))
            }
            other => ApiError::NotFound(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
