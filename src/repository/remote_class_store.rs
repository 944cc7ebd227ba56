// ==========================================
// 考勤表客户端 - 班级远程存储（HTTP）
// ==========================================
// 端点: GET/POST classes, PUT/DELETE classes/{id}
// 后端的班级 ID 为整数，可解析时以数字发送
// ==========================================

use crate::domain::Class;
use crate::remote::{ApiClient, RemoteResult};
use crate::repository::class_store::ClassStore;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ClassListResponse {
    #[serde(default)]
    classes: Vec<Class>,
}

pub struct RemoteClassStore {
    client: ApiClient,
}

impl RemoteClassStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// 组装请求体: id 可解析为整数时改为数字
pub fn class_request_body(class: &Class) -> RemoteResult<Value> {
    let mut body = serde_json::to_value(class)?;
    if let Ok(numeric) = class.id.parse::<i64>() {
        body["id"] = Value::from(numeric);
    }
    Ok(body)
}

#[async_trait]
impl ClassStore for RemoteClassStore {
    async fn fetch_classes(&self) -> RemoteResult<Vec<Class>> {
        let resp: ClassListResponse = self.client.get_json("classes").await?;
        Ok(resp.classes)
    }

    async fn create_class(&self, class: &Class) -> RemoteResult<()> {
        let body = class_request_body(class)?;
        let _: Value = self.client.post_json("classes", &body).await?;
        Ok(())
    }

    async fn update_class(&self, class: &Class) -> RemoteResult<()> {
        let body = class_request_body(class)?;
        let _: Value = self
            .client
            .put_json(&format!("classes/{}", class.id), &body)
            .await?;
        Ok(())
    }

    async fn delete_class(&self, class_id: &str) -> RemoteResult<()> {
        let _: Value = self.client.delete_json(&format!("classes/{}", class_id)).await?;
        Ok(())
    }
}
