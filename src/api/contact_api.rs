// ==========================================
// 考勤表客户端 - 联系表单 API
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator;
use crate::i18n::t;
use crate::remote::{ContactBackend, ContactMessage};
use std::sync::Arc;

pub struct ContactApi {
    backend: Arc<dyn ContactBackend>,
}

impl ContactApi {
    pub fn new(backend: Arc<dyn ContactBackend>) -> Self {
        Self { backend }
    }

    /// 提交联系表单；主题可为空
    pub async fn submit(&self, name: &str, email: &str, subject: &str, message: &str) -> ApiResult<String> {
        validator::validate_contact(name, email, message)?;
        let form = ContactMessage {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
        };
        let reply = self.backend.submit_contact(&form).await?;
        Ok(if reply.trim().is_empty() { t("contact.sent") } else { reply })
    }
}
