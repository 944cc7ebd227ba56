// ==========================================
// 考勤表客户端 - 认证接口
// ==========================================
// 教师与学生使用不同端点: auth/* 与 auth/student/*
// ==========================================

use crate::domain::{TokenResponse, User, UserRole};
use crate::remote::client::{ApiClient, MessageResponse};
use crate::remote::error::RemoteResult;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

/// 注册请求体
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// 设置后续请求携带的令牌
    fn set_token(&self, token: Option<String>);

    async fn signup(&self, request: &SignupRequest) -> RemoteResult<String>;
    async fn verify_email(&self, role: UserRole, email: &str, code: &str) -> RemoteResult<TokenResponse>;
    async fn login(&self, role: UserRole, email: &str, password: &str) -> RemoteResult<TokenResponse>;
    async fn logout(&self) -> RemoteResult<()>;
    async fn me(&self) -> RemoteResult<User>;
    async fn update_profile(&self, name: &str) -> RemoteResult<User>;
    async fn delete_account(&self, role: UserRole) -> RemoteResult<String>;
    async fn resend_verification(&self, email: &str) -> RemoteResult<String>;
    async fn request_password_reset(&self, email: &str) -> RemoteResult<String>;
    async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> RemoteResult<String>;
    async fn request_change_password(&self) -> RemoteResult<String>;
    async fn change_password(&self, code: &str, new_password: &str) -> RemoteResult<String>;
}

/// 按角色选择端点
pub fn role_path(role: UserRole, action: &str) -> String {
    match role {
        UserRole::Teacher => format!("auth/{}", action),
        UserRole::Student => format!("auth/student/{}", action),
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    fn set_token(&self, token: Option<String>) {
        ApiClient::set_token(self, token);
    }

    async fn signup(&self, request: &SignupRequest) -> RemoteResult<String> {
        let resp: MessageResponse = self
            .post_json(&role_path(request.role, "signup"), request)
            .await?;
        Ok(resp.message)
    }

    async fn verify_email(&self, role: UserRole, email: &str, code: &str) -> RemoteResult<TokenResponse> {
        let body = json!({ "email": email, "code": code });
        self.post_json(&role_path(role, "verify-email"), &body).await
    }

    async fn login(&self, role: UserRole, email: &str, password: &str) -> RemoteResult<TokenResponse> {
        let body = json!({ "email": email, "password": password });
        self.post_json(&role_path(role, "login"), &body).await
    }

    async fn logout(&self) -> RemoteResult<()> {
        let _: Option<MessageResponse> = self.post_empty("auth/logout").await?;
        Ok(())
    }

    async fn me(&self) -> RemoteResult<User> {
        self.get_json("auth/me").await
    }

    async fn update_profile(&self, name: &str) -> RemoteResult<User> {
        self.put_json("auth/profile", &json!({ "name": name })).await
    }

    async fn delete_account(&self, role: UserRole) -> RemoteResult<String> {
        let resp: Option<MessageResponse> =
            self.delete_json(&role_path(role, "delete-account")).await?;
        Ok(resp.map(|r| r.message).unwrap_or_default())
    }

    async fn resend_verification(&self, email: &str) -> RemoteResult<String> {
        let resp: MessageResponse = self
            .post_json("auth/resend-verification", &json!({ "email": email }))
            .await?;
        Ok(resp.message)
    }

    async fn request_password_reset(&self, email: &str) -> RemoteResult<String> {
        let resp: MessageResponse = self
            .post_json("auth/request-password-reset", &json!({ "email": email }))
            .await?;
        Ok(resp.message)
    }

    async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> RemoteResult<String> {
        let body = json!({ "email": email, "code": code, "new_password": new_password });
        let resp: MessageResponse = self.post_json("auth/verify-reset-code", &body).await?;
        Ok(resp.message)
    }

    async fn request_change_password(&self) -> RemoteResult<String> {
        let resp: MessageResponse = self.post_empty("auth/request-change-password").await?;
        Ok(resp.message)
    }

    async fn change_password(&self, code: &str, new_password: &str) -> RemoteResult<String> {
        let body = json!({ "code": code, "new_password": new_password });
        let resp: MessageResponse = self.post_json("auth/change-password", &body).await?;
        Ok(resp.message)
    }
}
