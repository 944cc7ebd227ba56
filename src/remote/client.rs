// ==========================================
// 考勤表客户端 - REST 客户端
// ==========================================
// 统一处理: 基础地址拼接 / Bearer 令牌 / JSON 编解码 / 错误响应
// ==========================================

use crate::remote::error::{RemoteError, RemoteResult};
use crate::remote::http::check_response;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// 只含 message 的通用响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> RemoteResult<T> {
        let resp = self.authorize(builder).send().await?;
        let resp = check_response(resp).await?;
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return serde_json::from_str("null").map_err(RemoteError::from);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        debug!(path, "GET");
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteResult<T> {
        debug!(path, "POST");
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    /// 无请求体的 POST
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        debug!(path, "POST");
        self.send(self.http.post(self.url(path))).await
    }

    /// 参数放在查询串中的 POST
    pub async fn post_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> RemoteResult<T> {
        debug!(path, "POST");
        self.send(self.http.post(self.url(path)).query(query)).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> RemoteResult<T> {
        debug!(path, "PUT");
        self.send(self.http.put(self.url(path)).json(body)).await
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        debug!(path, "DELETE");
        self.send(self.http.delete(self.url(path))).await
    }
}
