// ==========================================
// Mock 后端实现 - 用于集成测试
// ==========================================
// 内存实现各远程 trait，记录调用以便断言
// ==========================================

use async_trait::async_trait;
use attendance_sheets::domain::{
    ClassVerification, EnrolledClass, EnrollmentRequest, QrScanResult, QrSessionInfo,
    QrStopSummary, TokenResponse,
};
use attendance_sheets::remote::{
    AuthBackend, QrBackend, RemoteError, RemoteResult, SignupRequest, StudentBackend,
};
use attendance_sheets::repository::ClassStore;
use attendance_sheets::{Class, User, UserRole};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

fn unavailable() -> RemoteError {
    RemoteError::Api {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

fn not_found(message: &str) -> RemoteError {
    RemoteError::Api {
        status: 404,
        message: message.to_string(),
    }
}

// ==========================================
// MockClassStore
// ==========================================

/// 内存班级存储
///
/// update_class 对不存在的班级返回 404，与后端一致
#[derive(Default)]
pub struct MockClassStore {
    classes: Mutex<Vec<Class>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockClassStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(classes: Vec<Class>) -> Self {
        let store = Self::default();
        *store.classes.lock().unwrap() = classes;
        store
    }

    /// 之后的所有调用均返回 503
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn classes(&self) -> Vec<Class> {
        self.classes.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> RemoteResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl ClassStore for MockClassStore {
    async fn fetch_classes(&self) -> RemoteResult<Vec<Class>> {
        self.record("fetch".to_string())?;
        Ok(self.classes())
    }

    async fn create_class(&self, class: &Class) -> RemoteResult<()> {
        self.record(format!("create:{}", class.id))?;
        let mut classes = self.classes.lock().unwrap();
        classes.retain(|c| c.id != class.id);
        classes.push(class.clone());
        Ok(())
    }

    async fn update_class(&self, class: &Class) -> RemoteResult<()> {
        self.record(format!("update:{}", class.id))?;
        let mut classes = self.classes.lock().unwrap();
        match classes.iter_mut().find(|c| c.id == class.id) {
            Some(existing) => {
                *existing = class.clone();
                Ok(())
            }
            None => Err(not_found("Class not found")),
        }
    }

    async fn delete_class(&self, class_id: &str) -> RemoteResult<()> {
        self.record(format!("delete:{}", class_id))?;
        self.classes.lock().unwrap().retain(|c| c.id != class_id);
        Ok(())
    }
}

// ==========================================
// MockQrBackend
// ==========================================

/// 内存二维码会话；测试通过 rotate / add_scan 模拟后端变化
pub struct MockQrBackend {
    code: Mutex<String>,
    scanned: Mutex<Vec<Value>>,
    rotation_interval: Mutex<u64>,
    active: AtomicBool,
    status_calls: AtomicUsize,
    stopped: AtomicBool,
}

impl MockQrBackend {
    pub const DATE: &'static str = "2026-10-19";

    pub fn new(initial_code: &str) -> Self {
        Self {
            code: Mutex::new(initial_code.to_string()),
            scanned: Mutex::new(Vec::new()),
            rotation_interval: Mutex::new(0),
            active: AtomicBool::new(false),
            status_calls: AtomicUsize::new(0),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn rotate(&self, code: &str) {
        *self.code.lock().unwrap() = code.to_string();
    }

    pub fn add_scan(&self, student_id: i64) {
        self.scanned
            .lock()
            .unwrap()
            .push(json!({"student_id": student_id}));
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    fn info(&self, class_id: &str) -> QrSessionInfo {
        QrSessionInfo {
            class_id: class_id.to_string(),
            current_code: self.code.lock().unwrap().clone(),
            attendance_date: Self::DATE.to_string(),
            started_at: None,
            rotation_interval: *self.rotation_interval.lock().unwrap(),
            scanned_students: self.scanned.lock().unwrap().clone(),
            status: "active".to_string(),
        }
    }
}

#[async_trait]
impl QrBackend for MockQrBackend {
    async fn start_session(&self, class_id: &str, rotation_interval: u64) -> RemoteResult<QrSessionInfo> {
        *self.rotation_interval.lock().unwrap() = rotation_interval;
        self.active.store(true, Ordering::SeqCst);
        Ok(self.info(class_id))
    }

    async fn session_status(&self, class_id: &str) -> RemoteResult<Option<QrSessionInfo>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.active.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(self.info(class_id)))
    }

    async fn stop_session(&self, _class_id: &str) -> RemoteResult<QrStopSummary> {
        self.active.store(false, Ordering::SeqCst);
        self.stopped.store(true, Ordering::SeqCst);
        let scanned = self.scanned.lock().unwrap().len() as u32;
        Ok(QrStopSummary {
            scanned_count: scanned,
            absent_count: 10u32.saturating_sub(scanned),
            date: Self::DATE.to_string(),
        })
    }
}

// ==========================================
// MockAuthBackend
// ==========================================

#[derive(Debug, Clone)]
struct Account {
    id: String,
    name: String,
    password: String,
    role: UserRole,
    verified: bool,
}

/// 内存账户后端；验证码固定为 VERIFY_CODE
#[derive(Default)]
pub struct MockAuthBackend {
    accounts: Mutex<HashMap<String, Account>>,
    token: Mutex<Option<String>>,
    logout_fails: AtomicBool,
    logout_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockAuthBackend {
    pub const VERIFY_CODE: &'static str = "123456";

    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(100),
            ..Self::default()
        }
    }

    /// 添加已验证账户
    pub fn with_account(self, email: &str, password: &str, name: &str, role: UserRole) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                id,
                name: name.to_string(),
                password: password.to_string(),
                role,
                verified: true,
            },
        );
        self
    }

    pub fn set_logout_fails(&self, fails: bool) {
        self.logout_fails.store(fails, Ordering::SeqCst);
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    pub fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }

    pub fn current_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.lock().unwrap().contains_key(email)
    }

    fn token_response(email: &str, account: &Account) -> TokenResponse {
        TokenResponse {
            access_token: format!("token-{}", account.id),
            user: User {
                id: account.id.clone(),
                email: email.to_string(),
                name: account.name.clone(),
                role: account.role,
            },
        }
    }

    fn current_account(&self) -> RemoteResult<(String, Account)> {
        let token = self.current_token().ok_or(RemoteError::NotAuthenticated)?;
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(_, a)| format!("token-{}", a.id) == token)
            .map(|(email, a)| (email.clone(), a.clone()))
            .ok_or(RemoteError::NotAuthenticated)
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    async fn signup(&self, request: &SignupRequest) -> RemoteResult<String> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&request.email) {
            return Err(RemoteError::Api {
                status: 400,
                message: "Email already registered".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        accounts.insert(
            request.email.clone(),
            Account {
                id,
                name: request.name.clone(),
                password: request.password.clone(),
                role: request.role,
                verified: false,
            },
        );
        Ok("Verification code sent".to_string())
    }

    async fn verify_email(&self, role: UserRole, email: &str, code: &str) -> RemoteResult<TokenResponse> {
        if code != Self::VERIFY_CODE {
            return Err(RemoteError::Api {
                status: 400,
                message: "Invalid verification code".to_string(),
            });
        }
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(email)
            .filter(|a| a.role == role)
            .ok_or_else(|| not_found("User not found"))?;
        account.verified = true;
        Ok(Self::token_response(email, account))
    }

    async fn login(&self, role: UserRole, email: &str, password: &str) -> RemoteResult<TokenResponse> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(email) {
            Some(a) if a.role == role && a.password == password && a.verified => {
                Ok(Self::token_response(email, a))
            }
            _ => Err(RemoteError::Api {
                status: 401,
                message: "Incorrect email or password".to_string(),
            }),
        }
    }

    async fn logout(&self) -> RemoteResult<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.logout_fails.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn me(&self) -> RemoteResult<User> {
        let (email, account) = self.current_account()?;
        Ok(User {
            id: account.id,
            email,
            name: account.name,
            // 后端 /auth/me 不区分角色
            role: UserRole::Teacher,
        })
    }

    async fn update_profile(&self, name: &str) -> RemoteResult<User> {
        let (email, mut account) = self.current_account()?;
        account.name = name.to_string();
        self.accounts.lock().unwrap().insert(email.clone(), account.clone());
        Ok(User {
            id: account.id,
            email,
            name: account.name,
            role: account.role,
        })
    }

    async fn delete_account(&self, _role: UserRole) -> RemoteResult<String> {
        let (email, _) = self.current_account()?;
        self.accounts.lock().unwrap().remove(&email);
        Ok("Account deleted".to_string())
    }

    async fn resend_verification(&self, _email: &str) -> RemoteResult<String> {
        Ok(String::new())
    }

    async fn request_password_reset(&self, email: &str) -> RemoteResult<String> {
        if !self.has_account(email) {
            return Err(not_found("User not found"));
        }
        Ok("Reset code sent".to_string())
    }

    async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> RemoteResult<String> {
        if code != Self::VERIFY_CODE {
            return Err(RemoteError::Api {
                status: 400,
                message: "Invalid reset code".to_string(),
            });
        }
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.get_mut(email).ok_or_else(|| not_found("User not found"))?;
        account.password = new_password.to_string();
        Ok("Password reset".to_string())
    }

    async fn request_change_password(&self) -> RemoteResult<String> {
        self.current_account()?;
        Ok("Code sent".to_string())
    }

    async fn change_password(&self, code: &str, new_password: &str) -> RemoteResult<String> {
        if code != Self::VERIFY_CODE {
            return Err(RemoteError::Api {
                status: 400,
                message: "Invalid code".to_string(),
            });
        }
        let (email, mut account) = self.current_account()?;
        account.password = new_password.to_string();
        self.accounts.lock().unwrap().insert(email, account);
        Ok("Password changed".to_string())
    }
}

// ==========================================
// MockStudentBackend
// ==========================================

#[derive(Default)]
pub struct MockStudentBackend {
    known_classes: Mutex<HashMap<String, String>>,
    enrollments: Mutex<Vec<EnrollmentRequest>>,
    scans: Mutex<Vec<(String, String)>>,
}

impl MockStudentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(self, class_id: &str, class_name: &str) -> Self {
        self.known_classes
            .lock()
            .unwrap()
            .insert(class_id.to_string(), class_name.to_string());
        self
    }

    pub fn enrollments(&self) -> Vec<EnrollmentRequest> {
        self.enrollments.lock().unwrap().clone()
    }

    pub fn scans(&self) -> Vec<(String, String)> {
        self.scans.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudentBackend for MockStudentBackend {
    async fn verify_class(&self, class_id: &str) -> RemoteResult<ClassVerification> {
        let known = self.known_classes.lock().unwrap();
        Ok(ClassVerification {
            exists: known.contains_key(class_id),
            class_id: class_id.to_string(),
            class_name: known.get(class_id).cloned().unwrap_or_default(),
            teacher_name: "Ms. Rao".to_string(),
        })
    }

    async fn enroll(&self, request: &EnrollmentRequest) -> RemoteResult<String> {
        if !self.known_classes.lock().unwrap().contains_key(&request.class_id) {
            return Err(not_found("Class not found"));
        }
        self.enrollments.lock().unwrap().push(request.clone());
        Ok("Successfully enrolled".to_string())
    }

    async fn unenroll(&self, class_id: &str) -> RemoteResult<String> {
        self.enrollments.lock().unwrap().retain(|e| e.class_id != class_id);
        Ok("Successfully unenrolled".to_string())
    }

    async fn enrolled_classes(&self) -> RemoteResult<Vec<EnrolledClass>> {
        let known = self.known_classes.lock().unwrap();
        self.enrollments
            .lock()
            .unwrap()
            .iter()
            .map(|e| {
                serde_json::from_value(json!({
                    "class_id": e.class_id,
                    "class_name": known.get(&e.class_id).cloned().unwrap_or_default(),
                    "teacher_name": "Ms. Rao",
                    "student_record": {
                        "id": 1,
                        "name": e.name,
                        "rollNo": e.roll_no,
                        "attendance": {"2026-10-1": "P", "2026-10-2": "A", "2026-10-3": "L"}
                    },
                    "statistics": {
                        "total_classes": 3, "present": 1, "absent": 1, "late": 1,
                        "percentage": 66.667, "status": "Moderate"
                    }
                }))
                .map_err(RemoteError::from)
            })
            .collect()
    }

    async fn scan_qr(&self, class_id: &str, code: &str) -> RemoteResult<QrScanResult> {
        if !self.known_classes.lock().unwrap().contains_key(class_id) {
            return Err(not_found("No active session"));
        }
        self.scans
            .lock()
            .unwrap()
            .push((class_id.to_string(), code.to_string()));
        Ok(QrScanResult {
            message: "Attendance marked".to_string(),
            date: MockQrBackend::DATE.to_string(),
        })
    }
}
