// ==========================================
// 考勤表客户端 - 用户与会话
// ==========================================

use crate::domain::types::UserRole;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 已登录用户（后端 UserResponse）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
}

/// 认证会话：令牌 + 用户
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

impl AuthSession {
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn is_teacher(&self) -> bool {
        self.user.role == UserRole::Teacher
    }
}

/// 登录/验证邮箱接口的响应体
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub user: User,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
