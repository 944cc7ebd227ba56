// ==========================================
// 考勤表客户端 - 认证 API
// ==========================================
// 职责: 注册 / 验证邮箱 / 登录 / 密码 / 资料 / 注销 / 删除账号
// 会话持久化: accesstoken / user / userrole / pendingsignuprole
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator;
use crate::domain::{AuthSession, TokenResponse, User, UserRole};
use crate::i18n::t;
use crate::remote::{AuthBackend, SignupRequest};
use crate::repository::local_storage::{
    LocalStorage, KEY_ACCESS_TOKEN, KEY_PENDING_SIGNUP_ROLE, KEY_USER, KEY_USER_ROLE,
};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{info, instrument, warn};

pub struct AuthApi {
    backend: Arc<dyn AuthBackend>,
    storage: LocalStorage,
    session: RwLock<Option<AuthSession>>,
}

impl AuthApi {
    pub fn new(backend: Arc<dyn AuthBackend>, storage: LocalStorage) -> Self {
        Self {
            backend,
            storage,
            session: RwLock::new(None),
        }
    }

    /// 当前会话
    pub fn session(&self) -> Option<AuthSession> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().map(|s| s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    fn require_session(&self) -> ApiResult<AuthSession> {
        self.session().ok_or(ApiError::NotAuthenticated)
    }

    fn set_session(&self, session: Option<AuthSession>) {
        self.backend.set_token(session.as_ref().map(|s| s.token.clone()));
        if let Ok(mut guard) = self.session.write() {
            *guard = session;
        }
    }

    // ==========================================
    // 会话恢复
    // ==========================================

    /// 从本地存储恢复会话
    ///
    /// # 规则
    /// - 需同时存在令牌与用户 JSON
    /// - 用户 JSON 无角色时取 userrole
    /// - 用户 JSON 损坏时清除认证键
    #[instrument(skip(self))]
    pub fn restore_session(&self) -> ApiResult<Option<AuthSession>> {
        let token = self.storage.get_item(KEY_ACCESS_TOKEN)?;
        let raw_user = self.storage.get_item(KEY_USER)?;
        let (Some(token), Some(raw_user)) = (token, raw_user) else {
            return Ok(None);
        };

        match parse_stored_user(&raw_user, self.storage.get_item(KEY_USER_ROLE)?.as_deref()) {
            Some(user) => {
                let session = AuthSession { token, user };
                self.set_session(Some(session.clone()));
                info!(user_id = %session.user.id, role = %session.role(), "已恢复会话");
                Ok(Some(session))
            }
            None => {
                warn!("本地用户数据损坏，清除认证信息");
                for key in [KEY_ACCESS_TOKEN, KEY_USER, KEY_USER_ROLE] {
                    self.storage.remove_item(key)?;
                }
                Ok(None)
            }
        }
    }

    fn persist_session(&self, session: &AuthSession) -> ApiResult<()> {
        self.storage.set_item(KEY_ACCESS_TOKEN, &session.token)?;
        self.storage.set_json(KEY_USER, &session.user)?;
        self.storage.set_item(KEY_USER_ROLE, session.role().as_str())?;
        Ok(())
    }

    fn clear_local_auth(&self) -> ApiResult<()> {
        for key in [KEY_ACCESS_TOKEN, KEY_USER, KEY_USER_ROLE, KEY_PENDING_SIGNUP_ROLE] {
            self.storage.remove_item(key)?;
        }
        self.set_session(None);
        Ok(())
    }

    fn establish(&self, resp: TokenResponse, role: UserRole) -> ApiResult<AuthSession> {
        let mut user = resp.user;
        user.role = role;
        let session = AuthSession {
            token: resp.access_token,
            user,
        };
        self.persist_session(&session)?;
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    // ==========================================
    // 注册与登录
    // ==========================================

    #[instrument(skip(self, password, confirm_password), fields(role = %role))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
        role: UserRole,
    ) -> ApiResult<String> {
        validator::validate_signup(name, email, password, confirm_password)?;

        // 验证邮箱时按此角色选择端点
        self.storage.set_item(KEY_PENDING_SIGNUP_ROLE, role.as_str())?;

        let request = SignupRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            name: name.trim().to_string(),
            role,
        };
        self.backend.signup(&request).await?;
        Ok(t("auth.signup_code_sent"))
    }

    #[instrument(skip(self, code))]
    pub async fn verify_email(&self, email: &str, code: &str) -> ApiResult<AuthSession> {
        validator::validate_code(code)?;
        let role = self
            .storage
            .get_item(KEY_PENDING_SIGNUP_ROLE)?
            .map(|r| UserRole::parse_lenient(&r))
            .unwrap_or_default();

        let resp = self.backend.verify_email(role, email.trim(), code.trim()).await?;
        let session = self.establish(resp, role)?;
        self.storage.remove_item(KEY_PENDING_SIGNUP_ROLE)?;
        info!(user_id = %session.user.id, "邮箱验证成功");
        Ok(session)
    }

    /// 登录: 先试教师端点，失败再试学生端点
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        validator::validate_login(email, password)?;
        let email = email.trim();

        let (resp, role) = match self.backend.login(UserRole::Teacher, email, password).await {
            Ok(resp) => (resp, UserRole::Teacher),
            Err(teacher_err) => match self.backend.login(UserRole::Student, email, password).await {
                Ok(resp) => (resp, UserRole::Student),
                Err(student_err) => {
                    warn!(teacher_error = %teacher_err, student_error = %student_err, "登录失败");
                    return Err(ApiError::Remote {
                        status: student_err.status(),
                        message: t("auth.invalid_credentials"),
                    });
                }
            },
        };

        let session = self.establish(resp, role)?;
        info!(user_id = %session.user.id, role = %role, "登录成功");
        Ok(session)
    }

    pub async fn resend_verification(&self, email: &str) -> ApiResult<String> {
        validator::validate_email(email)?;
        let message = self.backend.resend_verification(email.trim()).await?;
        Ok(non_empty_or(message, "auth.verification_resent"))
    }

    // ==========================================
    // 密码
    // ==========================================

    pub async fn request_password_reset(&self, email: &str) -> ApiResult<String> {
        validator::require_all(&[email])?;
        self.backend.request_password_reset(email.trim()).await?;
        Ok(t("auth.reset_code_sent"))
    }

    #[instrument(skip(self, code, new_password, confirm_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ApiResult<String> {
        validator::require_all(&[email, code, new_password, confirm_password])?;
        validator::validate_new_password(new_password, confirm_password)?;
        self.backend
            .reset_password(email.trim(), code.trim(), new_password)
            .await?;
        Ok(t("auth.password_reset_done"))
    }

    pub async fn request_change_password(&self) -> ApiResult<String> {
        self.require_session()?;
        self.backend.request_change_password().await?;
        Ok(t("auth.change_code_sent"))
    }

    #[instrument(skip(self, code, new_password, confirm_password))]
    pub async fn change_password(
        &self,
        code: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ApiResult<String> {
        self.require_session()?;
        validator::require_all(&[code, new_password, confirm_password])?;
        validator::validate_new_password(new_password, confirm_password)?;
        self.backend.change_password(code.trim(), new_password).await?;
        Ok(t("auth.password_changed"))
    }

    // ==========================================
    // 资料
    // ==========================================

    pub async fn update_profile(&self, name: &str) -> ApiResult<User> {
        let session = self.require_session()?;
        validator::require_all(&[name])?;
        let updated = self.backend.update_profile(name.trim()).await?;
        self.replace_user(session, |user| user.name = updated.name)
    }

    /// 从后端刷新当前用户；角色沿用本地会话
    pub async fn refresh_user(&self) -> ApiResult<User> {
        let session = self.require_session()?;
        let fresh = self.backend.me().await?;
        self.replace_user(session, |user| {
            user.id = fresh.id;
            user.email = fresh.email;
            user.name = fresh.name;
        })
    }

    fn replace_user<F>(&self, mut session: AuthSession, apply: F) -> ApiResult<User>
    where
        F: FnOnce(&mut User),
    {
        apply(&mut session.user);
        self.persist_session(&session)?;
        let user = session.user.clone();
        self.set_session(Some(session));
        Ok(user)
    }

    // ==========================================
    // 注销与删除
    // ==========================================

    /// 注销: 后端调用失败也清除本地状态
    #[instrument(skip(self))]
    pub async fn logout(&self) -> ApiResult<()> {
        if self.is_authenticated() {
            if let Err(e) = self.backend.logout().await {
                warn!(error = %e, "后端注销失败，仍清除本地会话");
            }
        }
        self.clear_local_auth()
    }

    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> ApiResult<String> {
        let session = self.require_session()?;
        self.backend.delete_account(session.role()).await?;
        self.clear_local_auth()?;
        info!(user_id = %session.user.id, "账号已删除");
        Ok(t("auth.account_deleted"))
    }
}

/// 解析本地存储的用户 JSON；缺少角色时使用 fallback_role
fn parse_stored_user(raw: &str, fallback_role: Option<&str>) -> Option<User> {
    let mut value: Value = serde_json::from_str(raw).ok()?;
    let has_role = value
        .get("role")
        .and_then(Value::as_str)
        .map(|r| !r.is_empty())
        .unwrap_or(false);
    if !has_role {
        let role = UserRole::parse_lenient(fallback_role.unwrap_or_default());
        value
            .as_object_mut()?
            .insert("role".to_string(), Value::from(role.as_str()));
    }
    serde_json::from_value(value).ok()
}

fn non_empty_or(message: String, key: &str) -> String {
    if message.trim().is_empty() {
        t(key)
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_user_role_fallback() {
        let user = parse_stored_user(r#"{"id": "1", "email": "s@x.io", "name": "S"}"#, Some("student")).unwrap();
        assert_eq!(user.role, UserRole::Student);

        let user = parse_stored_user(
            r#"{"id": "1", "email": "s@x.io", "name": "S", "role": "teacher"}"#,
            Some("student"),
        )
        .unwrap();
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[test]
    fn test_stored_user_corrupt() {
        assert!(parse_stored_user("{oops", None).is_none());
        assert!(parse_stored_user("[1, 2]", None).is_none());
    }
}
