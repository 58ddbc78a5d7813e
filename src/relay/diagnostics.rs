//! 被抑制失败的诊断通道
//!
//! 转发管线里的失败不能阻断支付流程，但必须可观测：除日志外，
//! 每次被抑制的失败都会上报到诊断 Hook。

/// 被抑制的失败类别
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayIssue {
    /// Pixel Sink 未挂载
    PixelMissing { event: String },
    /// Pixel Sink 调用失败
    PixelCallFailed { event: String, error: String },
    /// 验证响应体不是合法 JSON
    NonJsonBody { url: String, error: String },
    /// 触发标志为 true 但缺少事件数据
    MissingEventData,
}

pub trait RelayDiagnostics: Send + Sync {
    fn report(&self, issue: &RelayIssue);
}

/// 默认实现：不做任何上报
pub struct NoopDiagnostics;

impl RelayDiagnostics for NoopDiagnostics {
    fn report(&self, _issue: &RelayIssue) {}
}
