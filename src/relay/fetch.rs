//! Fetch 中间件
//!
//! 显式的装饰器：宿主把自己的 Fetch 实现包进 InterceptedFetch。
//! URL 含标记子串的请求在成功后克隆响应体，交给后台任务解析；
//! 调用方拿到的响应与底层 Fetch 产出完全一致。

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, trace};

use super::diagnostics::RelayIssue;
use super::manager::PurchaseEventRelay;
use crate::errors::ClicktraceError;

/// 发起请求所需的最小描述
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: String,
    pub body: Option<Bytes>,
}

impl FetchRequest {
    pub fn get(url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: "GET".to_string(),
            body: None,
        }
    }
}

/// 响应：body 为 Bytes，克隆不消耗调用方可见的数据
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// 网络请求入口的抽象
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> anyhow::Result<FetchResponse>;
}

/// 响应检查中间件
///
/// URL 不含标记子串或底层请求失败时原样透传（传输错误绝不吞掉）；
/// 匹配时在后台解析响应体副本，调用方不等待检查完成。
pub struct InterceptedFetch<F: Fetch> {
    inner: F,
    relay: Arc<PurchaseEventRelay>,
}

impl<F: Fetch> InterceptedFetch<F> {
    pub fn new(inner: F, relay: Arc<PurchaseEventRelay>) -> Self {
        Self { inner, relay }
    }
}

#[async_trait]
impl<F: Fetch> Fetch for InterceptedFetch<F> {
    async fn fetch(&self, request: FetchRequest) -> anyhow::Result<FetchResponse> {
        if !request.url.contains(self.relay.endpoint_marker()) {
            return self.inner.fetch(request).await;
        }

        trace!("Intercepting verification request: {}", request.url);
        let url = request.url.clone();
        let response = self.inner.fetch(request).await?;

        // 后台检查：克隆 body，原始响应立即返回给调用方
        let body = response.body.clone();
        let relay = Arc::clone(&self.relay);
        tokio::spawn(async move {
            inspect_body(relay, url, body).await;
        });

        Ok(response)
    }
}

/// 解析响应体并交给验证处理器；解析失败只记录并上报诊断
async fn inspect_body(relay: Arc<PurchaseEventRelay>, url: String, body: Bytes) {
    match serde_json::from_slice::<Value>(&body).map_err(ClicktraceError::from) {
        Ok(data) => {
            relay.handle_verification_response(data).await;
        }
        Err(e) => {
            debug!(
                "Verification response from \"{}\" is not valid JSON: {}",
                url,
                e.format_simple()
            );
            relay.report(RelayIssue::NonJsonBody {
                url,
                error: e.message().to_string(),
            });
        }
    }
}
