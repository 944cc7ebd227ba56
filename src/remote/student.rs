// ==========================================
// 考勤表客户端 - 学生端接口
// ==========================================

use crate::domain::{ClassVerification, EnrolledClass, EnrollmentRequest, QrScanResult};
use crate::remote::client::{ApiClient, MessageResponse};
use crate::remote::error::RemoteResult;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EnrolledClassesResponse {
    #[serde(default)]
    classes: Vec<EnrolledClass>,
}

#[async_trait]
pub trait StudentBackend: Send + Sync {
    async fn verify_class(&self, class_id: &str) -> RemoteResult<ClassVerification>;
    async fn enroll(&self, request: &EnrollmentRequest) -> RemoteResult<String>;
    async fn unenroll(&self, class_id: &str) -> RemoteResult<String>;
    async fn enrolled_classes(&self) -> RemoteResult<Vec<EnrolledClass>>;
    async fn scan_qr(&self, class_id: &str, code: &str) -> RemoteResult<QrScanResult>;
}

#[async_trait]
impl StudentBackend for ApiClient {
    async fn verify_class(&self, class_id: &str) -> RemoteResult<ClassVerification> {
        self.get_json(&format!("class/verify/{}", class_id)).await
    }

    async fn enroll(&self, request: &EnrollmentRequest) -> RemoteResult<String> {
        let resp: MessageResponse = self.post_json("student/enroll", request).await?;
        Ok(resp.message)
    }

    async fn unenroll(&self, class_id: &str) -> RemoteResult<String> {
        let resp: Option<MessageResponse> =
            self.delete_json(&format!("student/unenroll/{}", class_id)).await?;
        Ok(resp.map(|r| r.message).unwrap_or_default())
    }

    async fn enrolled_classes(&self) -> RemoteResult<Vec<EnrolledClass>> {
        let resp: EnrolledClassesResponse = self.get_json("student/classes").await?;
        Ok(resp.classes)
    }

    async fn scan_qr(&self, class_id: &str, code: &str) -> RemoteResult<QrScanResult> {
        self.post_query("qr/scan", &[("class_id", class_id), ("qr_code", code)])
            .await
    }
}
