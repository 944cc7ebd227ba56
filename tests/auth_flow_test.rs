// ==========================================
// 认证与学生端集成测试
// ==========================================
// 测试目标: 注册/验证/登录/会话恢复/注销，学生加入班级，联系表单
// ==========================================

mod helpers;

use async_trait::async_trait;
use attendance_sheets::api::{ApiError, AuthApi, ContactApi, StudentApi};
use attendance_sheets::domain::StatusTier;
use attendance_sheets::i18n;
use attendance_sheets::logging;
use attendance_sheets::remote::{ContactBackend, ContactMessage, RemoteResult};
use attendance_sheets::repository::local_storage::{
    KEY_ACCESS_TOKEN, KEY_PENDING_SIGNUP_ROLE, KEY_USER, KEY_USER_ROLE,
};
use attendance_sheets::repository::LocalStorage;
use attendance_sheets::UserRole;
use helpers::mock_backends::{MockAuthBackend, MockStudentBackend};
use std::sync::{Arc, Mutex};

const PASSWORD: &str = "correct-horse";

fn auth_api(backend: &Arc<MockAuthBackend>, storage: &LocalStorage) -> AuthApi {
    AuthApi::new(backend.clone(), storage.clone())
}

fn backend_with_accounts() -> Arc<MockAuthBackend> {
    Arc::new(
        MockAuthBackend::new()
            .with_account("teacher@school.edu", PASSWORD, "Ms. Rao", UserRole::Teacher)
            .with_account("asha@school.edu", PASSWORD, "Asha", UserRole::Student),
    )
}

// ==========================================
// 注册与验证
// ==========================================

#[tokio::test]
async fn test_signup_then_verify_establishes_session() {
    logging::init_test();
    i18n::set_locale("en");
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = Arc::new(MockAuthBackend::new());
    let api = auth_api(&backend, &storage);

    let message = api
        .signup("Dev", "dev@school.edu", PASSWORD, PASSWORD, UserRole::Student)
        .await
        .unwrap();
    assert_eq!(message, "Verification code sent to your email");
    assert_eq!(
        storage.get_item(KEY_PENDING_SIGNUP_ROLE).unwrap().as_deref(),
        Some("student")
    );

    let session = api
        .verify_email("dev@school.edu", MockAuthBackend::VERIFY_CODE)
        .await
        .unwrap();
    assert_eq!(session.role(), UserRole::Student);
    assert!(api.is_authenticated());
    assert_eq!(backend.current_token(), Some(session.token.clone()));
    assert!(storage.get_item(KEY_PENDING_SIGNUP_ROLE).unwrap().is_none());
    assert_eq!(storage.get_item(KEY_USER_ROLE).unwrap().as_deref(), Some("student"));
}

#[tokio::test]
async fn test_signup_validation_happens_before_network() {
    i18n::set_locale("en");
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = Arc::new(MockAuthBackend::new());
    let api = auth_api(&backend, &storage);

    let err = api
        .signup("Dev", "dev@school.edu", PASSWORD, "different", UserRole::Teacher)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Passwords do not match");

    let err = api
        .signup("Dev", "dev@school.edu", "short", "short", UserRole::Teacher)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(!backend.has_account("dev@school.edu"));
}

// ==========================================
// 登录与会话
// ==========================================

#[tokio::test]
async fn test_login_falls_back_to_student_endpoint() {
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();

    let teacher = auth_api(&backend, &storage)
        .login("teacher@school.edu", PASSWORD)
        .await
        .unwrap();
    assert!(teacher.is_teacher());

    let student = auth_api(&backend, &storage)
        .login("  asha@school.edu ", PASSWORD)
        .await
        .unwrap();
    assert_eq!(student.role(), UserRole::Student);
    assert_eq!(student.user.name, "Asha");
}

#[tokio::test]
async fn test_login_failure_message() {
    i18n::set_locale("en");
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();
    let api = auth_api(&backend, &storage);

    let err = api.login("teacher@school.edu", "wrong-pass").await.unwrap_err();
    match err {
        ApiError::Remote { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Invalid email or password");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!api.is_authenticated());

    assert!(api.login("", "").await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_session_restored_from_storage() {
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();
    let first = auth_api(&backend, &storage);
    let session = first.login("asha@school.edu", PASSWORD).await.unwrap();

    backend.clear_token();
    let second = auth_api(&backend, &storage);
    let restored = second.restore_session().unwrap().expect("应恢复会话");
    assert_eq!(restored, session);
    assert_eq!(backend.current_token(), Some(session.token));
}

#[tokio::test]
async fn test_restore_with_role_fallback_and_corruption() {
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();

    // 用户 JSON 无角色: 使用 userrole
    storage.set_item(KEY_ACCESS_TOKEN, "token-x").unwrap();
    storage
        .set_item(KEY_USER, r#"{"id": 7, "email": "s@school.edu", "name": "S"}"#)
        .unwrap();
    storage.set_item(KEY_USER_ROLE, "student").unwrap();
    let session = auth_api(&backend, &storage).restore_session().unwrap().unwrap();
    assert_eq!(session.user.id, "7");
    assert_eq!(session.role(), UserRole::Student);

    // 损坏: 清除认证键
    storage.set_item(KEY_USER, "{not json").unwrap();
    assert!(auth_api(&backend, &storage).restore_session().unwrap().is_none());
    assert!(storage.get_item(KEY_ACCESS_TOKEN).unwrap().is_none());
    assert!(storage.get_item(KEY_USER).unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();
    let api = auth_api(&backend, &storage);
    api.login("teacher@school.edu", PASSWORD).await.unwrap();

    backend.set_logout_fails(true);
    api.logout().await.unwrap();
    assert_eq!(backend.logout_calls(), 1);
    assert!(!api.is_authenticated());
    assert!(backend.current_token().is_none());
    assert!(storage.get_item(KEY_ACCESS_TOKEN).unwrap().is_none());
    assert!(auth_api(&backend, &storage).restore_session().unwrap().is_none());
}

// ==========================================
// 账户维护
// ==========================================

#[tokio::test]
async fn test_profile_and_refresh_keep_role() {
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();
    let api = auth_api(&backend, &storage);
    api.login("asha@school.edu", PASSWORD).await.unwrap();

    let user = api.update_profile(" Asha K ").await.unwrap();
    assert_eq!(user.name, "Asha K");

    // /auth/me 返回的角色不可靠，保留本地角色
    let refreshed = api.refresh_user().await.unwrap();
    assert_eq!(refreshed.name, "Asha K");
    assert_eq!(refreshed.role, UserRole::Student);
}

#[tokio::test]
async fn test_password_reset_and_change() {
    i18n::set_locale("en");
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();
    let api = auth_api(&backend, &storage);

    assert_eq!(
        api.request_password_reset("teacher@school.edu").await.unwrap(),
        "Reset code sent to your email"
    );
    let done = api
        .reset_password(
            "teacher@school.edu",
            MockAuthBackend::VERIFY_CODE,
            "new-password",
            "new-password",
        )
        .await
        .unwrap();
    assert_eq!(done, "Password reset successfully");
    api.login("teacher@school.edu", "new-password").await.unwrap();

    api.request_change_password().await.unwrap();
    api.change_password(MockAuthBackend::VERIFY_CODE, "third-password", "third-password")
        .await
        .unwrap();
    api.logout().await.unwrap();
    assert!(matches!(
        api.request_change_password().await,
        Err(ApiError::NotAuthenticated)
    ));
    api.login("teacher@school.edu", "third-password").await.unwrap();
}

#[tokio::test]
async fn test_delete_account() {
    i18n::set_locale("en");
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let backend = backend_with_accounts();
    let api = auth_api(&backend, &storage);
    api.login("teacher@school.edu", PASSWORD).await.unwrap();

    assert_eq!(api.delete_account().await.unwrap(), "Account deleted successfully");
    assert!(!api.is_authenticated());
    assert!(!backend.has_account("teacher@school.edu"));
}

// ==========================================
// 学生端
// ==========================================

#[tokio::test]
async fn test_student_enrollment_flow() {
    i18n::set_locale("en");
    let (_db, storage) = test_helpers::create_test_storage().unwrap();
    let auth_backend = backend_with_accounts();
    let session = auth_api(&auth_backend, &storage)
        .login("asha@school.edu", PASSWORD)
        .await
        .unwrap();

    let backend = Arc::new(MockStudentBackend::new().with_class("1700", "Physics"));
    let api = StudentApi::new(backend.clone());

    let verification = api.verify_class(" 1700 ").await.unwrap();
    assert_eq!(verification.class_name, "Physics");
    let err = api.verify_class("9999").await.unwrap_err();
    assert_eq!(err.user_message(), "Class not found. Please check the Class ID");

    assert!(api.enroll(&session.user, "1700", " ").await.unwrap_err().is_validation());
    api.enroll(&session.user, "1700", "R-01").await.unwrap();
    let request = &backend.enrollments()[0];
    assert_eq!(request.name, "Asha");
    assert_eq!(request.email, "asha@school.edu");
    assert_eq!(request.roll_no, "R-01");

    let classes = api.enrolled_classes().await.unwrap();
    assert_eq!(classes.len(), 1);
    let (summary, tier) = api.month_summary(&classes[0], 2026, 10);
    assert_eq!(summary.percentage_text(), "66.667");
    assert_eq!(tier, StatusTier::AtRisk);

    api.unenroll("1700").await.unwrap();
    assert!(api.enrolled_classes().await.unwrap().is_empty());
}

// ==========================================
// 联系表单
// ==========================================

#[derive(Default)]
struct RecordingContact {
    sent: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl ContactBackend for RecordingContact {
    async fn submit_contact(&self, message: &ContactMessage) -> RemoteResult<String> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(String::new())
    }
}

#[tokio::test]
async fn test_contact_form() {
    i18n::set_locale("en");
    let backend = Arc::new(RecordingContact::default());
    let api = ContactApi::new(Arc::clone(&backend) as Arc<dyn ContactBackend>);

    let err = api.submit("Dev", "dev@school.edu", "", "  ").await.unwrap_err();
    assert_eq!(err.user_message(), "Please fill in all required fields");

    let reply = api.submit(" Dev ", "dev@school.edu", "", "Hello").await.unwrap();
    assert_eq!(reply, "Message sent successfully");
    let sent = backend.sent.lock().unwrap();
    assert_eq!(sent[0].name, "Dev");
    assert!(sent[0].subject.is_empty());
}
