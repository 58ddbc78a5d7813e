//! Pixel Sink
//!
//! 转化事件的出口抽象。挂载与否在每次触发时重新检查，对应
//! SDK 可能晚于页面脚本加载的现实。

use async_trait::async_trait;

use super::event::PurchaseEvent;

/// 转化事件上报 Sink
#[async_trait]
pub trait PixelSink: Send + Sync {
    async fn track(&self, event: &str, payload: &PurchaseEvent) -> anyhow::Result<()>;
}

/// 标准输出 Sink（无真实 Pixel 端点时的手动上报路径）
pub struct StdoutPixel;

#[async_trait]
impl PixelSink for StdoutPixel {
    async fn track(&self, event: &str, payload: &PurchaseEvent) -> anyhow::Result<()> {
        println!("Pixel event {}: {:?}", event, payload);
        Ok(())
    }
}

#[cfg(feature = "http-pixel")]
mod http {
    use std::sync::OnceLock;
    use std::time::Duration;

    use async_trait::async_trait;
    use tracing::trace;
    use ureq::Agent;

    use super::{PixelSink, PurchaseEvent};

    /// HTTP 请求超时时间
    const HTTP_TIMEOUT_SECS: u64 = 2;

    /// 全局 HTTP Agent（ureq 的 Agent 是 Send + Sync）
    static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

    fn get_agent() -> &'static Agent {
        HTTP_AGENT.get_or_init(|| {
            Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
                .build()
                .into()
        })
    }

    /// HTTP Pixel Sink
    ///
    /// 将事件 POST 到 Pixel 端点，请求体为
    /// `{"event": 事件名, "properties": 事件字段}`。
    pub struct HttpPixel {
        endpoint: String,
    }

    impl HttpPixel {
        pub fn new(endpoint: &str) -> Self {
            Self {
                endpoint: endpoint.to_string(),
            }
        }

        /// 同步发送（在 spawn_blocking 中调用）
        fn send_sync(endpoint: String, body: serde_json::Value) -> anyhow::Result<()> {
            let agent = get_agent();
            let resp = agent.post(&endpoint).send_json(&body)?;
            trace!("Pixel endpoint \"{}\" responded {}", endpoint, resp.status());
            Ok(())
        }
    }

    #[async_trait]
    impl PixelSink for HttpPixel {
        async fn track(&self, event: &str, payload: &PurchaseEvent) -> anyhow::Result<()> {
            let endpoint = self.endpoint.clone();
            let body = serde_json::json!({ "event": event, "properties": payload });
            tokio::task::spawn_blocking(move || Self::send_sync(endpoint, body)).await?
        }
    }
}

#[cfg(feature = "http-pixel")]
pub use http::HttpPixel;
