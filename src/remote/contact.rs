// ==========================================
// 考勤表客户端 - 联系表单接口
// ==========================================

use crate::remote::client::{ApiClient, MessageResponse};
use crate::remote::error::RemoteResult;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[async_trait]
pub trait ContactBackend: Send + Sync {
    async fn submit_contact(&self, message: &ContactMessage) -> RemoteResult<String>;
}

#[async_trait]
impl ContactBackend for ApiClient {
    async fn submit_contact(&self, message: &ContactMessage) -> RemoteResult<String> {
        let resp: MessageResponse = self.post_json("contact", message).await?;
        Ok(resp.message)
    }
}
