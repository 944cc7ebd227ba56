// ==========================================
// 考勤表客户端 - 输入校验器
// ==========================================
// 职责: 网络调用前的表单校验，失败返回 ApiError::Validation
// 消息走 i18n
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::AttendanceThresholds;
use crate::i18n::{t, t_with_args};
use lazy_static::lazy_static;
use regex::Regex;

/// 密码最短长度
pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

fn fail(key: &str) -> ApiError {
    ApiError::Validation(t(key))
}

/// 所有字段均非空（去除首尾空白后）
pub fn require_all(values: &[&str]) -> ApiResult<()> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(fail("validation.required_fields"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ApiResult<()> {
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(fail("validation.invalid_email"));
    }
    Ok(())
}

/// 新密码: 两次输入一致且长度足够
pub fn validate_new_password(password: &str, confirm: &str) -> ApiResult<()> {
    if password != confirm {
        return Err(fail("validation.password_mismatch"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(t_with_args(
            "validation.password_too_short",
            &[("min", &MIN_PASSWORD_LEN.to_string())],
        )));
    }
    Ok(())
}

pub fn validate_signup(name: &str, email: &str, password: &str, confirm: &str) -> ApiResult<()> {
    require_all(&[name, email, password, confirm])?;
    validate_email(email)?;
    validate_new_password(password, confirm)
}

pub fn validate_login(email: &str, password: &str) -> ApiResult<()> {
    require_all(&[email, password])
}

pub fn validate_code(code: &str) -> ApiResult<()> {
    if code.trim().is_empty() {
        return Err(fail("validation.code_required"));
    }
    Ok(())
}

pub fn validate_class_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(fail("validation.class_name_required"));
    }
    Ok(())
}

pub fn validate_class_id(class_id: &str) -> ApiResult<()> {
    if class_id.trim().is_empty() {
        return Err(fail("validation.class_id_required"));
    }
    Ok(())
}

pub fn validate_roll_no(roll_no: &str) -> ApiResult<()> {
    if roll_no.trim().is_empty() {
        return Err(fail("validation.roll_no_required"));
    }
    Ok(())
}

/// 联系表单: 姓名、邮箱、内容必填，主题可空
pub fn validate_contact(name: &str, email: &str, message: &str) -> ApiResult<()> {
    if [name, email, message].iter().any(|v| v.trim().is_empty()) {
        return Err(fail("validation.contact_required"));
    }
    validate_email(email)
}

pub fn validate_thresholds(thresholds: &AttendanceThresholds) -> ApiResult<()> {
    thresholds
        .validate()
        .map_err(|e| ApiError::Validation(t(e.message_key())))
}
