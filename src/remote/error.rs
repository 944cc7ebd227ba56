// ==========================================
// 考勤表客户端 - 远程接口错误类型
// ==========================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// 网络传输错误
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 后端返回非 2xx
    #[error("接口错误 ({status}): {message}")]
    Api { status: u16, message: String },

    /// 响应体无法解析
    #[error("响应解析失败: {0}")]
    Parse(String),

    #[error("未登录")]
    NotAuthenticated,
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            RemoteError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// 面向用户的消息: 后端给出的消息原样透出
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Parse(err.to_string())
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
