//! 购买事件转发管理器
//!
//! Sink 缺失与调用失败都不会向外抛出，只反映在返回值、日志与
//! 诊断通道里；验证响应的处理是透传语义。

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::diagnostics::{NoopDiagnostics, RelayDiagnostics, RelayIssue};
use super::event::{EVENT_DATA_FIELD, PurchaseEvent, TRIGGER_FIELD};
use super::pixel::PixelSink;
use crate::config::{RelayConfig, get_config};
use crate::errors::ClicktraceError;

pub struct PurchaseEventRelay {
    config: RelayConfig,
    pixel: RwLock<Option<Arc<dyn PixelSink>>>,
    diagnostics: RwLock<Arc<dyn RelayDiagnostics>>,
}

impl PurchaseEventRelay {
    /// 使用全局配置创建
    pub fn new() -> Arc<Self> {
        Self::with_config(get_config().relay.clone())
    }

    /// 使用显式配置创建
    pub fn with_config(config: RelayConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            pixel: RwLock::new(None),
            diagnostics: RwLock::new(Arc::new(NoopDiagnostics)),
        })
    }

    /// 端点匹配用的 URL 标记子串
    pub fn endpoint_marker(&self) -> &str {
        &self.config.endpoint_marker
    }

    /// 挂载 Pixel Sink（SDK 就绪后调用）
    pub fn attach_pixel(&self, sink: Arc<dyn PixelSink>) {
        *self.pixel.write() = Some(sink);
    }

    /// 卸载 Pixel Sink
    pub fn detach_pixel(&self) {
        *self.pixel.write() = None;
    }

    /// 设置诊断 Hook
    pub fn set_diagnostics(&self, hook: Arc<dyn RelayDiagnostics>) {
        *self.diagnostics.write() = hook;
    }

    /// Pixel Sink 是否已挂载（每次触发时重新检查，不缓存）
    pub fn is_pixel_loaded(&self) -> bool {
        self.pixel.read().is_some()
    }

    /// 手动触发购买事件
    ///
    /// 返回 true 表示 Sink 已挂载且调用未出错。
    pub async fn fire_purchase(&self, data: &Value) -> bool {
        let event = PurchaseEvent::from_loose(data, &self.config);
        self.dispatch(event).await
    }

    /// 处理支付验证响应
    ///
    /// 触发标志为 true 且携带事件数据时走上报路径；无论结果如何，
    /// 输入原样返回，绝不修改或拦截。
    pub async fn handle_verification_response(&self, response: Value) -> Value {
        if response.get(TRIGGER_FIELD).and_then(Value::as_bool) == Some(true) {
            debug!("Backend signaled a frontend conversion event");
            match response.get(EVENT_DATA_FIELD) {
                Some(data) if data.is_object() => {
                    let event = PurchaseEvent::from_loose(data, &self.config);
                    self.dispatch(event).await;
                }
                _ => {
                    warn!("Trigger flag set but event data is missing");
                    self.report(RelayIssue::MissingEventData);
                }
            }
        }
        response
    }

    /// 事件分发：Sink 缺失与调用失败都转成 false + 诊断上报
    async fn dispatch(&self, event: PurchaseEvent) -> bool {
        let event_name = self.config.event_name.clone();

        let Some(sink) = self.pixel.read().clone() else {
            warn!("Pixel sink is not attached, dropping event {}", event_name);
            self.report(RelayIssue::PixelMissing { event: event_name });
            return false;
        };

        debug!("Dispatching {} event: {:?}", event_name, event);
        match sink.track(&event_name, &event).await {
            Ok(()) => {
                debug!("Event {} dispatched", event_name);
                true
            }
            Err(e) => {
                let err = ClicktraceError::pixel_dispatch(e.to_string());
                error!("{}", err.format_simple());
                self.report(RelayIssue::PixelCallFailed {
                    event: event_name,
                    error: err.message().to_string(),
                });
                false
            }
        }
    }

    pub(crate) fn report(&self, issue: RelayIssue) {
        // 先克隆再调用，Hook 内部可以安全地替换自己
        let hook = self.diagnostics.read().clone();
        hook.report(&issue);
    }
}
