// ==========================================
// 考勤表客户端 - 二维码会话接口（教师端）
// ==========================================

use crate::domain::{QrSessionInfo, QrStopSummary};
use crate::remote::client::ApiClient;
use crate::remote::error::{RemoteError, RemoteResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct StartSessionResponse {
    session: QrSessionInfo,
}

#[derive(Debug, Deserialize)]
struct SessionStatusResponse {
    #[serde(default)]
    active: bool,
    #[serde(default)]
    session: Option<QrSessionInfo>,
}

#[async_trait]
pub trait QrBackend: Send + Sync {
    /// 开启会话，返回首个二维码
    async fn start_session(&self, class_id: &str, rotation_interval: u64) -> RemoteResult<QrSessionInfo>;

    /// 读取当前会话；未激活时返回 None
    async fn session_status(&self, class_id: &str) -> RemoteResult<Option<QrSessionInfo>>;

    /// 结束会话，未扫码学生记为缺勤
    async fn stop_session(&self, class_id: &str) -> RemoteResult<QrStopSummary>;
}

#[async_trait]
impl QrBackend for ApiClient {
    async fn start_session(&self, class_id: &str, rotation_interval: u64) -> RemoteResult<QrSessionInfo> {
        let body = json!({ "class_id": class_id, "rotation_interval": rotation_interval });
        let resp: StartSessionResponse = self.post_json("qr/start-session", &body).await?;
        Ok(resp.session)
    }

    async fn session_status(&self, class_id: &str) -> RemoteResult<Option<QrSessionInfo>> {
        let resp: SessionStatusResponse = self.get_json(&format!("qr/session/{}", class_id)).await?;
        if !resp.active {
            return Ok(None);
        }
        resp.session
            .map(Some)
            .ok_or_else(|| RemoteError::Parse("active session without payload".to_string()))
    }

    async fn stop_session(&self, class_id: &str) -> RemoteResult<QrStopSummary> {
        self.post_json("qr/stop-session", &json!({ "class_id": class_id }))
            .await
    }
}
